//! Rule-based bill parser working on positioned tokens.

use std::time::Instant;

use tracing::{debug, info};

use crate::layout::{group_into_rows, sort_reading_order, Token};
use crate::models::bill::{ExtractionResult, FailureReason, HeaderInfo, LineItem};
use crate::models::config::LayoutConfig;

use super::classify::{classify_row, RowKind};
use super::columns::assign_to_columns;
use super::rules::{DateExtractor, FieldExtractor, NameExtractor, SerialNumberExtractor};
use super::table::table_tokens;

/// Reconstructs header fields and line items from OCR tokens.
#[derive(Debug, Clone, Default)]
pub struct BillExtractor {
    config: LayoutConfig,
}

impl BillExtractor {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Extract a bill from tokens in any order.
    ///
    /// Returns a failure only when there are no tokens at all; missing
    /// fields or rows are reported as empty values.
    pub fn extract(&self, mut tokens: Vec<Token>) -> ExtractionResult {
        if tokens.is_empty() {
            return ExtractionResult::failure(FailureReason::NoTextDetected);
        }

        let start = Instant::now();
        sort_reading_order(&mut tokens);

        let header = self.extract_header(&tokens);
        let items = self.extract_items(&tokens);

        info!(
            "Extracted {} items from {} tokens in {}ms",
            items.len(),
            tokens.len(),
            start.elapsed().as_millis()
        );

        ExtractionResult::success(header, items)
    }

    /// Header fields from tokens in reading order.
    pub fn extract_header(&self, tokens: &[Token]) -> HeaderInfo {
        let config = &self.config.header;
        let zone: Vec<&Token> = tokens
            .iter()
            .filter(|t| t.y_center() < config.zone_max_y)
            .collect();

        debug!("Header zone holds {} tokens", zone.len());

        let header = HeaderInfo {
            name: NameExtractor::new(config).extract(&zone).unwrap_or_default(),
            sl_no: SerialNumberExtractor::new(config)
                .extract(&zone)
                .unwrap_or_default(),
            date: DateExtractor::new(config).extract(&zone).unwrap_or_default(),
        };

        debug!(
            "Header: name='{}' sl_no='{}' date='{}'",
            header.name, header.sl_no, header.date
        );

        header
    }

    /// Line items from tokens in reading order.
    pub fn extract_items(&self, tokens: &[Token]) -> Vec<LineItem> {
        let table = &self.config.table;
        let body = table_tokens(tokens, table);
        let rows = group_into_rows(body, table.row_threshold, table.row_anchor);

        debug!("Table body: {} tokens in {} rows", body.len(), rows.len());

        let mut items = Vec::new();

        for (row_idx, row) in rows.iter().enumerate() {
            let text = row.text();
            let kind = classify_row(&text, row_idx, &self.config.rows);
            if kind != RowKind::Data {
                debug!("Row {}: skipped ({:?}) '{}'", row_idx, kind, text);
                continue;
            }

            let columns = assign_to_columns(row, &self.config.columns);
            if columns.particulars.is_empty() && columns.total.is_empty() {
                debug!("Row {}: no item name or amount '{}'", row_idx, text);
                continue;
            }

            items.push(LineItem {
                id: (items.len() + 1).to_string(),
                item_name: columns.particulars,
                quantity: columns.qty,
                rate: columns.rate,
                amount: columns.total,
            });
        }

        items
    }
}
