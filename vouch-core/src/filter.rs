//! Dataset filtering by date range, customer and amount range.
//!
//! The amount bounds apply to amount *excluding* tax, while trend analysis and
//! sampling work on amount *including* tax. Callers comparing the two should
//! keep that in mind; the filter does not try to reconcile them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::transaction::{Dataset, Transaction};

/// Resolved filter parameters. All bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// `None` keeps every customer
    pub customer: Option<String>,
    pub min_amount: f64,
    pub max_amount: f64,
}

impl FilterCriteria {
    /// Criteria that keep everything between two dates.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            customer: None,
            min_amount: 0.0,
            max_amount: f64::INFINITY,
        }
    }

    /// Default criteria derived from the current-period data: its date span,
    /// all customers, and `0..=max(amount excluding tax)`.
    ///
    /// With no data, falls back to the whole of `fallback_year` and an
    /// unbounded maximum.
    pub fn defaults_for(current: &Dataset, fallback_year: i32) -> Self {
        let (start, end) = current.date_range().unwrap_or_else(|| {
            (
                NaiveDate::from_ymd_opt(fallback_year, 1, 1).unwrap_or(NaiveDate::MIN),
                NaiveDate::from_ymd_opt(fallback_year, 12, 31).unwrap_or(NaiveDate::MAX),
            )
        });

        Self {
            start,
            end,
            customer: None,
            min_amount: 0.0,
            max_amount: current.max_amount_excl_tax().unwrap_or(f64::INFINITY),
        }
    }

    pub fn with_customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = Some(customer.into());
        self
    }

    pub fn with_amount_range(mut self, min: f64, max: f64) -> Self {
        self.min_amount = min;
        self.max_amount = max;
        self
    }

    /// True when `txn` passes every predicate.
    pub fn matches(&self, txn: &Transaction) -> bool {
        if txn.invoice_date < self.start || txn.invoice_date > self.end {
            return false;
        }
        if let Some(customer) = &self.customer {
            if txn.customer_name != *customer {
                return false;
            }
        }
        txn.amount_excl_tax >= self.min_amount && txn.amount_excl_tax <= self.max_amount
    }
}

/// Return a new dataset holding the rows of `dataset` that match `criteria`,
/// in their original order. The input is never modified.
pub fn filter(dataset: &Dataset, criteria: &FilterCriteria) -> Dataset {
    dataset
        .iter()
        .filter(|t| criteria.matches(t))
        .cloned()
        .collect()
}
