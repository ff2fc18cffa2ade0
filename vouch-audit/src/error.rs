//! Recoverable failures of trend reconciliation and sample generation.
//!
//! None of these abort the caller: each is reported and prior state
//! (filters, the previous sample) stays as it was.

use std::fmt;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrendError {
    #[error(
        "no data available for trend analysis after filtering (current: {current_rows} rows, prior: {prior_rows} rows)"
    )]
    EmptyPeriod {
        current_rows: usize,
        prior_rows: usize,
    },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SamplingError {
    #[error("sample size must be at least 1")]
    InvalidSampleSize,

    #[error("sample size {size} exceeds the population of {population} transactions")]
    SampleSizeExceedsPopulation { size: usize, population: usize },

    #[error("starting point {start} is outside 1..={population}")]
    InvalidStartOffset { start: usize, population: usize },

    #[error(
        "starting point {start} with interval {interval} overruns the population of {population} for {size} items; reduce the sample size or change the start point"
    )]
    SystematicOutOfBounds {
        start: usize,
        interval: usize,
        size: usize,
        population: usize,
    },

    #[error("population is empty")]
    EmptyPopulation,

    #[error("total amount is {total}; cannot perform monetary unit sampling")]
    ZeroOrNegativeTotal { total: f64 },

    #[error("total amount overflows; cannot perform monetary unit sampling")]
    TotalOverflow,

    #[error("sampling interval is zero; sample size {size} is too large")]
    ZeroInterval { size: usize },

    #[error("invoice number(s) not in the population: {}", .0.join(", "))]
    UnknownInvoiceNumbers(Vec<String>),

    #[error("invalid strata boundaries '{input}': {reason}")]
    StratifiedParseFailure { input: String, reason: String },
}

/// Conditions reported alongside a sample that still got generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SamplingWarning {
    /// Fewer sample items than strata: some strata may go unrepresented.
    StratifiedUnderrepresentation { size: usize, strata: usize },
}

impl fmt::Display for SamplingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingWarning::StratifiedUnderrepresentation { size, strata } => write!(
                f,
                "the sample size ({size}) is smaller than the number of strata ({strata}); some strata may not be represented"
            ),
        }
    }
}
