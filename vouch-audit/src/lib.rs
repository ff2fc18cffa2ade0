//! vouch-audit: monthly trend reconciliation, audit sampling methods, and
//! sample accumulation with methodology narratives.

pub mod accumulator;
pub mod error;
pub mod sample;
pub mod sampling;
pub mod session;
pub mod trend;

pub use accumulator::SampleAccumulator;
pub use error::{SamplingError, SamplingWarning, TrendError};
pub use sample::{MethodKind, Methodology, Parameter, Sample};
pub use sampling::{GeneratedSample, SamplingEngine, SamplingMethod, Stratum};
pub use session::SamplingSession;
pub use trend::{MonthlyBucket, MonthlyComparison, SIGNIFICANT_CHANGE_PCT, TrendReconciler};
