//! Data models and configuration.

pub mod bill;
pub mod config;

pub use bill::{ExtractionResult, FailureReason, HeaderInfo, LineItem};
pub use config::BillConfig;
