//! Bill layout reconstruction: header fields, table location, rows and
//! columns.

pub mod classify;
pub mod columns;
mod parser;
mod pipeline;
pub mod rules;
pub mod table;

pub use classify::{classify_row, RowKind};
pub use columns::{assign_to_columns, split_qty_rate, ColumnAssignment};
pub use parser::BillExtractor;
pub use pipeline::BillPipeline;
pub use table::{find_table_start, table_tokens};
