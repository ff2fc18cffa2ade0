//! Auditor-chosen invoices.

use std::collections::HashSet;
use vouch_core::Dataset;

use crate::error::SamplingError;

/// Positions of every row whose invoice number is in `invoices`, in
/// population order. Ids missing from the population are rejected.
pub fn select(population: &Dataset, invoices: &[String]) -> Result<Vec<usize>, SamplingError> {
    let available: HashSet<&str> = population.iter().map(|t| t.invoice_number.as_str()).collect();

    let mut unknown: Vec<String> = Vec::new();
    for id in invoices {
        if !available.contains(id.as_str()) && !unknown.contains(id) {
            unknown.push(id.clone());
        }
    }
    if !unknown.is_empty() {
        return Err(SamplingError::UnknownInvoiceNumbers(unknown));
    }

    let wanted: HashSet<&str> = invoices.iter().map(String::as_str).collect();
    Ok(population
        .iter()
        .enumerate()
        .filter(|(_, t)| wanted.contains(t.invoice_number.as_str()))
        .map(|(i, _)| i)
        .collect())
}
