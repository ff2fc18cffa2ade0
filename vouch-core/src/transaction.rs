//! Sales-register transaction types.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// One invoice line from a sales register.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Identifying key used for selection and deduplication
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub customer_name: String,
    /// "Total Amount" column
    pub amount_excl_tax: f64,
    /// "Total Amount (Inc. Tax)" column
    pub amount_incl_tax: f64,
}

impl Transaction {
    pub fn new(
        invoice_number: impl Into<String>,
        invoice_date: NaiveDate,
        customer_name: impl Into<String>,
        amount_excl_tax: f64,
        amount_incl_tax: f64,
    ) -> Self {
        Self {
            invoice_number: invoice_number.into(),
            invoice_date,
            customer_name: customer_name.into(),
            amount_excl_tax,
            amount_incl_tax,
        }
    }

    /// Calendar year of the invoice date
    pub fn year(&self) -> i32 {
        self.invoice_date.year()
    }

    /// Two-digit month label, "01".."12"
    pub fn month_label(&self) -> String {
        format!("{:02}", self.invoice_date.month())
    }
}

/// An ordered, immutable collection of transactions.
///
/// Order is ingestion order. Invoice numbers are expected to be unique but
/// duplicates are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    rows: Vec<Transaction>,
}

impl Dataset {
    pub fn new(rows: Vec<Transaction>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.rows.iter()
    }

    /// Distinct customer names, first-seen order
    pub fn customers(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(|t| t.customer_name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Invoice numbers in dataset order (duplicates included)
    pub fn invoice_numbers(&self) -> Vec<&str> {
        self.rows.iter().map(|t| t.invoice_number.as_str()).collect()
    }

    /// Earliest and latest invoice dates, if any rows exist
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.rows.iter().map(|t| t.invoice_date).min()?;
        let max = self.rows.iter().map(|t| t.invoice_date).max()?;
        Some((min, max))
    }

    /// Largest amount excluding tax
    pub fn max_amount_excl_tax(&self) -> Option<f64> {
        self.rows
            .iter()
            .map(|t| t.amount_excl_tax)
            .fold(None, |acc, a| Some(acc.map_or(a, |m: f64| m.max(a))))
    }

    /// Distinct calendar years present, ascending
    pub fn years(&self) -> BTreeSet<i32> {
        self.rows.iter().map(Transaction::year).collect()
    }

    /// Human-readable period label from the years present: "2024" or "2023-2024".
    pub fn period_label(&self) -> String {
        let years = self.years();
        match (years.first(), years.last()) {
            (Some(first), Some(last)) if first == last => first.to_string(),
            (Some(first), Some(last)) => format!("{first}-{last}"),
            _ => String::new(),
        }
    }

    /// Sum of amount including tax
    pub fn total_incl_tax(&self) -> f64 {
        self.rows.iter().map(|t| t.amount_incl_tax).sum()
    }
}

impl From<Vec<Transaction>> for Dataset {
    fn from(rows: Vec<Transaction>) -> Self {
        Self::new(rows)
    }
}

impl FromIterator<Transaction> for Dataset {
    fn from_iter<I: IntoIterator<Item = Transaction>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
