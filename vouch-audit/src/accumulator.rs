//! Merge an initial sample with an additive judgmental selection.

use std::collections::HashSet;
use vouch_core::Dataset;

use crate::sample::{MethodKind, Methodology, Sample};

pub struct SampleAccumulator;

impl SampleAccumulator {
    /// Final sample = initial ∪ additional, deduplicated by invoice number.
    ///
    /// Additional ids are resolved against `population`; ids not found there
    /// contribute no rows. The methodology note lists the ids exactly as
    /// supplied, including any that were already in the initial sample.
    /// Without an initial sample the result is a judgmental-only selection.
    pub fn combine(initial: Option<&Sample>, additional: &[String], population: &Dataset) -> Sample {
        let wanted: HashSet<&str> = additional.iter().map(String::as_str).collect();
        let added_rows = population
            .iter()
            .filter(|t| wanted.contains(t.invoice_number.as_str()))
            .cloned();

        let unknown: Vec<&str> = additional
            .iter()
            .map(String::as_str)
            .filter(|id| !population.iter().any(|t| t.invoice_number == *id))
            .collect();
        if !unknown.is_empty() {
            log::warn!("additional invoice number(s) not in population: {}", unknown.join(", "));
        }

        match initial {
            Some(initial) => {
                let mut methodology = initial.methodology.clone();
                methodology.additional = Some(additional.to_vec());
                let rows = initial.rows().iter().cloned().chain(added_rows);
                let merged = Sample::from_rows(rows, methodology);
                log::info!(
                    "added {} judgmental selection(s): sample {} -> {}",
                    additional.len(),
                    initial.len(),
                    merged.len()
                );
                merged
            }
            None => {
                let methodology = Methodology {
                    method: None,
                    description: format!(
                        "**Judgmental Sampling:** The following invoice numbers were selected: {}",
                        additional.join(", ")
                    ),
                    parameters: Vec::new(),
                    additional: Some(additional.to_vec()),
                }
                .with_parameter("selected", additional.len());
                Sample::from_rows(added_rows, methodology)
            }
        }
    }

    /// Invoice numbers to offer for additive selection. When the initial
    /// sample was judgmental its chosen ids are left out of the offer.
    pub fn additional_candidates<'a>(population: &'a Dataset, initial: Option<&Sample>) -> Vec<&'a str> {
        let excluded: HashSet<&str> = match initial {
            Some(s) if s.methodology.method == Some(MethodKind::Judgmental) => {
                s.rows().iter().map(|t| t.invoice_number.as_str()).collect()
            }
            _ => HashSet::new(),
        };

        population
            .iter()
            .map(|t| t.invoice_number.as_str())
            .filter(|id| !excluded.contains(id))
            .collect()
    }
}
