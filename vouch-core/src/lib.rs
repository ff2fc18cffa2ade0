//! vouch-core: sales-register transaction model, dataset filtering and display formatting

pub mod currency;
pub mod filter;
pub mod transaction;

pub use currency::{Currency, format_percent, group_thousands};
pub use filter::{FilterCriteria, filter};
pub use transaction::{Dataset, Transaction};
