//! Sample and methodology types.
//!
//! A sample is a set of transactions keyed by invoice number. The
//! methodology narrative travels with it as audit evidence.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use vouch_core::{Dataset, Transaction};

/// Which algorithm produced the initial sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodKind {
    #[serde(rename = "random")]
    Random,
    #[serde(rename = "systematic")]
    Systematic,
    #[serde(rename = "mus")]
    MonetaryUnit,
    #[serde(rename = "judgmental")]
    Judgmental,
    #[serde(rename = "stratified")]
    Stratified,
}

impl MethodKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            MethodKind::Random => "Random",
            MethodKind::Systematic => "Systematic",
            MethodKind::MonetaryUnit => "Monetary Unit Sampling",
            MethodKind::Judgmental => "Judgmental",
            MethodKind::Stratified => "Stratified",
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

/// How a sample came to be.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Methodology {
    /// Initial method; `None` when the sample is an additive judgmental
    /// selection with no initial sample behind it
    pub method: Option<MethodKind>,
    /// Narrative of the initial selection
    pub description: String,
    /// Effective parameters, in the order they were recorded
    pub parameters: Vec<Parameter>,
    /// Invoice numbers supplied as an additive judgmental selection
    pub additional: Option<Vec<String>>,
}

impl Methodology {
    pub fn new(method: MethodKind, description: impl Into<String>) -> Self {
        Self {
            method: Some(method),
            description: description.into(),
            parameters: Vec::new(),
            additional: None,
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.push_parameter(name, value);
        self
    }

    pub fn push_parameter(&mut self, name: impl Into<String>, value: impl ToString) {
        self.parameters.push(Parameter {
            name: name.into(),
            value: value.to_string(),
        });
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Full narrative: the initial description, followed by the additive
    /// selection note when one was made on top of an initial sample.
    pub fn narrative(&self) -> String {
        match (&self.method, &self.additional) {
            (Some(_), Some(added)) => format!(
                "{}  \n\n**Additional Judgmental Selections:** The following invoice numbers were added: {}",
                self.description,
                added.join(", ")
            ),
            _ => self.description.clone(),
        }
    }
}

/// Transactions selected for testing, deduplicated by invoice number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    rows: Vec<Transaction>,
    pub methodology: Methodology,
}

impl Sample {
    /// Build from rows in selection order. Later rows whose invoice number is
    /// already present are dropped.
    pub fn from_rows(
        rows: impl IntoIterator<Item = Transaction>,
        methodology: Methodology,
    ) -> Self {
        let mut seen = HashSet::new();
        let rows = rows
            .into_iter()
            .filter(|t| seen.insert(t.invoice_number.clone()))
            .collect();
        Self { rows, methodology }
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

    pub fn contains(&self, invoice_number: &str) -> bool {
        self.rows.iter().any(|t| t.invoice_number == invoice_number)
    }

    pub fn invoice_numbers(&self) -> Vec<&str> {
        self.rows.iter().map(|t| t.invoice_number.as_str()).collect()
    }

    pub fn narrative(&self) -> String {
        self.methodology.narrative()
    }

    /// The selected rows as a plain dataset (for export / display).
    pub fn to_dataset(&self) -> Dataset {
        Dataset::new(self.rows.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(inv: &str) -> Transaction {
        Transaction::new(inv, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), "A", 1.0, 1.0)
    }

    #[test]
    fn test_from_rows_dedups_by_invoice() {
        let s = Sample::from_rows(
            vec![txn("A"), txn("B"), txn("A")],
            Methodology::new(MethodKind::Random, "x"),
        );
        assert_eq!(s.invoice_numbers(), vec!["A", "B"]);
        assert!(s.contains("B"));
        assert!(!s.contains("C"));
    }

    #[test]
    fn test_narrative_without_additions_is_description() {
        let m = Methodology::new(MethodKind::Random, "**Random Sampling:** picked");
        assert_eq!(m.narrative(), "**Random Sampling:** picked");
    }

    #[test]
    fn test_narrative_appends_additions() {
        let mut m = Methodology::new(MethodKind::Random, "initial");
        m.additional = Some(vec!["X".into(), "Y".into()]);
        let text = m.narrative();
        assert!(text.starts_with("initial"));
        assert!(text.ends_with("were added: X, Y"));
    }

    #[test]
    fn test_parameters_lookup() {
        let m = Methodology::new(MethodKind::Systematic, "s")
            .with_parameter("interval", 3)
            .with_parameter("start", 1);
        assert_eq!(m.parameter("interval"), Some("3"));
        assert_eq!(m.parameter("seed"), None);
    }
}
