//! Spatial primitives: tokens, reading order, and row grouping.

mod rows;
mod token;

pub use rows::{group_into_rows, Row};
pub use token::{sort_reading_order, BBox, Token};
