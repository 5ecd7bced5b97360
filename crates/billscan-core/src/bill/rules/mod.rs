//! Rule-based header field extractors.
//!
//! Each extractor scans the header zone (tokens in reading order) on its
//! own; the fields are never checked against each other.

pub mod dates;
pub mod name;
pub mod patterns;
pub mod serial;

pub use dates::{parse_date, DateExtractor};
pub use name::NameExtractor;
pub use serial::SerialNumberExtractor;

use crate::layout::Token;

/// Trait for header field extractors.
pub trait FieldExtractor {
    /// Extract the field from header-zone tokens in reading order.
    fn extract(&self, zone: &[&Token]) -> Option<String>;
}
