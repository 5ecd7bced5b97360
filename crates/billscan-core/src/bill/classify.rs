//! Separating item rows from table headers, footers and noise.

use crate::models::config::RowFilterConfig;

/// What a grouped table row represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// The table's own header, re-detected as a row.
    Header,
    /// Grand total or signature line.
    Footer,
    /// Too short to carry data.
    Noise,
    /// Candidate line item.
    Data,
}

/// Classify a row from its joined text and its index among all rows.
///
/// Subtotal rows ("sub" together with "total") are kept as data.
pub fn classify_row(row_text: &str, row_idx: usize, config: &RowFilterConfig) -> RowKind {
    let text = row_text.to_lowercase();

    if row_idx < config.header_row_window
        && config
            .header_keywords
            .iter()
            .any(|kw| text.contains(kw.as_str()))
    {
        return RowKind::Header;
    }

    if text.contains("signature") || (text.contains("total") && !text.contains("sub")) {
        return RowKind::Footer;
    }

    if text.trim().chars().count() < config.min_text_len {
        return RowKind::Noise;
    }

    RowKind::Data
}
