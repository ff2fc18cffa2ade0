//! vouch-ingest: sales register CSV loading, column validation and a content-keyed cache.

pub mod cache;
pub mod register;
pub mod types;

pub use cache::RegisterCache;
pub use register::{load_register, parse_register, parse_register_bytes};
pub use types::{LoadReport, LoadedRegister, REQUIRED_COLUMNS};
