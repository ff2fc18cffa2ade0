//! Year-over-year monthly trend reconciliation.
//!
//! Both periods are summed by month (amount including tax), gap-filled to a
//! full 01..12 calendar, joined on month, and each month's percentage change
//! is flagged when it moves more than [`SIGNIFICANT_CHANGE_PCT`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vouch_core::{Currency, Dataset, format_percent};

use crate::error::TrendError;

/// Fixed variance threshold, in percent.
pub const SIGNIFICANT_CHANGE_PCT: f64 = 10.0;

pub const MONTH_LABELS: [&str; 12] = [
    "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12",
];

/// `(current - prior) / prior * 100`, or 0 when there is no prior amount.
pub fn percentage_change(current: f64, prior: f64) -> f64 {
    if prior == 0.0 {
        return 0.0;
    }
    (current - prior) / prior * 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    pub month: String,
    pub current: f64,
    pub prior: f64,
    pub pct_change: f64,
}

impl MonthlyBucket {
    pub fn new(month: impl Into<String>, current: f64, prior: f64) -> Self {
        Self {
            month: month.into(),
            current,
            prior,
            pct_change: percentage_change(current, prior),
        }
    }

    pub fn is_significant(&self) -> bool {
        self.pct_change.abs() > SIGNIFICANT_CHANGE_PCT
    }
}

/// Display row: amounts currency-formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedBucket {
    pub month: String,
    pub current: String,
    pub prior: String,
    pub pct_change: String,
    pub significant: bool,
}

/// One point of a long-format chart series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub period: String,
    pub month: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyComparison {
    pub current_label: String,
    pub prior_label: String,
    /// Always 12 entries, "01".."12"
    pub buckets: Vec<MonthlyBucket>,
}

impl MonthlyComparison {
    pub fn significant(&self) -> Vec<&MonthlyBucket> {
        self.buckets.iter().filter(|b| b.is_significant()).collect()
    }

    pub fn current_total(&self) -> f64 {
        self.buckets.iter().map(|b| b.current).sum()
    }

    pub fn prior_total(&self) -> f64 {
        self.buckets.iter().map(|b| b.prior).sum()
    }

    pub fn formatted_rows(&self, currency: &Currency) -> Vec<FormattedBucket> {
        self.buckets
            .iter()
            .map(|b| FormattedBucket {
                month: b.month.clone(),
                current: currency.format(b.current),
                prior: currency.format(b.prior),
                pct_change: format_percent(b.pct_change),
                significant: b.is_significant(),
            })
            .collect()
    }

    /// Current then prior, 12 points each, for an external chart renderer.
    pub fn plot_series(&self) -> Vec<SeriesPoint> {
        let current = self.buckets.iter().map(|b| SeriesPoint {
            period: self.current_label.clone(),
            month: b.month.clone(),
            amount: b.current,
        });
        let prior = self.buckets.iter().map(|b| SeriesPoint {
            period: self.prior_label.clone(),
            month: b.month.clone(),
            amount: b.prior,
        });
        current.chain(prior).collect()
    }
}

pub struct TrendReconciler;

impl TrendReconciler {
    /// Build the 12-month comparison of two filtered periods.
    ///
    /// Returns [`TrendError::EmptyPeriod`] if either period has no rows, so
    /// "nothing to compare" is distinguishable from "no variance".
    pub fn reconcile(current: &Dataset, prior: &Dataset) -> Result<MonthlyComparison, TrendError> {
        let current_by_month = group_by_month(current);
        let prior_by_month = group_by_month(prior);

        if current_by_month.is_empty() || prior_by_month.is_empty() {
            log::warn!(
                "trend skipped: current has {} rows, prior has {} rows",
                current.len(),
                prior.len()
            );
            return Err(TrendError::EmptyPeriod {
                current_rows: current.len(),
                prior_rows: prior.len(),
            });
        }

        let current_cal = calendar_complete(&current_by_month);
        let prior_cal = calendar_complete(&prior_by_month);

        let buckets: Vec<MonthlyBucket> = MONTH_LABELS
            .iter()
            .map(|m| {
                let cur = current_cal.get(*m).copied().unwrap_or(0.0);
                let pri = prior_cal.get(*m).copied().unwrap_or(0.0);
                MonthlyBucket::new(*m, cur, pri)
            })
            .collect();

        let comparison = MonthlyComparison {
            current_label: current.period_label(),
            prior_label: prior.period_label(),
            buckets,
        };

        log::info!(
            "reconciled {} vs {}: {} significant month(s)",
            comparison.current_label,
            comparison.prior_label,
            comparison.significant().len()
        );

        Ok(comparison)
    }
}

/// Sum of amount including tax per month label present in the data.
fn group_by_month(dataset: &Dataset) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, f64> = BTreeMap::new();
    for t in dataset {
        *sums.entry(t.month_label()).or_insert(0.0) += t.amount_incl_tax;
    }
    sums
}

/// Left-join the grouped sums onto the 12 canonical months, zero-filling gaps.
fn calendar_complete(grouped: &BTreeMap<String, f64>) -> BTreeMap<&'static str, f64> {
    MONTH_LABELS
        .iter()
        .map(|m| (*m, grouped.get(*m).copied().unwrap_or(0.0)))
        .collect()
}
