//! Mapping row tokens onto table columns.

use crate::layout::Row;
use crate::models::config::ColumnBands;

use super::rules::patterns::{MULTI_SPACE, QTY_CURRENCY_RATE, QTY_UNIT, QTY_UNIT_RATE};

/// Column values of one table row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnAssignment {
    /// Leftmost column. Assigned so the bands stay symmetric, never output.
    pub mrp: String,
    pub particulars: String,
    pub qty: String,
    pub rate: String,
    pub total: String,
}

/// Assign a row's tokens to columns by their x position.
///
/// Tokens in the same band are joined with single spaces. When nothing lies
/// in the particulars band, the first token of band A is taken as the item
/// name. The rest of band A and all of band B form the quantity/rate text,
/// which is then split with [`split_qty_rate`].
pub fn assign_to_columns(row: &Row<'_>, bands: &ColumnBands) -> ColumnAssignment {
    let mut mrp = Vec::new();
    let mut particulars = Vec::new();
    let mut band_a = Vec::new();
    let mut band_b = Vec::new();
    let mut total = Vec::new();

    for token in row.tokens() {
        let x = token.x_center();
        let text = token.text();

        if x < bands.mrp_max_x {
            mrp.push(text);
        } else if x < bands.particulars_max_x {
            particulars.push(text);
        } else if x < bands.band_a_max_x {
            band_a.push(text);
        } else if x < bands.band_b_max_x {
            band_b.push(text);
        } else {
            total.push(text);
        }
    }

    let mut qty_rate: Vec<&str> = Vec::new();
    if particulars.is_empty() && !band_a.is_empty() {
        particulars.push(band_a[0]);
        qty_rate.extend(&band_a[1..]);
    } else {
        qty_rate.extend(&band_a);
    }
    qty_rate.extend(&band_b);

    let (qty, rate) = split_qty_rate(&qty_rate.join(" "));

    ColumnAssignment {
        mrp: mrp.join(" ").trim().to_string(),
        particulars: particulars.join(" ").trim().to_string(),
        qty,
        rate,
        total: total.join(" ").trim().to_string(),
    }
}

/// Split a combined quantity/rate string.
///
/// Rules in priority order, first match wins:
/// 1. a run of two or more spaces separates quantity from rate;
/// 2. `5kg$20`: a currency symbol glues quantity and rate;
/// 3. `3pcs45`: a unit glues quantity and rate;
/// 4. a single space separates quantity from rate;
/// 5. anything else is all quantity.
pub fn split_qty_rate(text: &str) -> (String, String) {
    let text = text.trim();
    if text.is_empty() {
        return (String::new(), String::new());
    }

    if text.contains("  ") {
        let parts: Vec<&str> = MULTI_SPACE.split(text).collect();
        if parts.len() >= 2 {
            return (parts[0].trim().to_string(), parts[1..].join(" ").trim().to_string());
        }
    }

    if let Some(caps) = QTY_CURRENCY_RATE.captures(text) {
        return (caps[1].to_string(), caps[2].to_string());
    }

    if let Some(caps) = QTY_UNIT_RATE.captures(text) {
        return (caps[1].to_string(), caps[2].to_string());
    }

    if text.contains(' ') {
        let parts: Vec<&str> = text.split_whitespace().collect();
        if parts.len() >= 2 {
            return (parts[0].to_string(), parts[1..].join(" "));
        }
    }

    if QTY_UNIT.is_match(text) {
        return (text.to_string(), String::new());
    }

    (text.to_string(), String::new())
}
