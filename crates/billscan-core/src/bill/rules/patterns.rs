//! Common regex patterns for bill field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Serial numbers are short bare digit runs
    pub static ref SERIAL_NUMBER: Regex = Regex::new(r"^\d{2,6}$").unwrap();

    // Day, month and year separated by |, /, . or whitespace (OCR often
    // reads a slash as a pipe). A stray leading period is tolerated.
    pub static ref DATE_DMY: Regex = Regex::new(
        r"\.?(\d{1,2})[|/.\s]*(\d{1,2})[|/.\s]*(\d{2,4})"
    ).unwrap();

    // Quantity glued to a rate through a currency symbol: 5kg$20
    pub static ref QTY_CURRENCY_RATE: Regex = Regex::new(
        r"^(\d+[a-zA-Z]*)[€$£¥](\d+)$"
    ).unwrap();

    // Quantity with unit glued to a rate: 3pcs45
    pub static ref QTY_UNIT_RATE: Regex = Regex::new(r"^(\d+[a-zA-Z]+)(\d+)$").unwrap();

    // Quantity with unit and no rate: 12pcs
    pub static ref QTY_UNIT: Regex = Regex::new(r"^\d+[a-zA-Z]+$").unwrap();

    pub static ref MULTI_SPACE: Regex = Regex::new(r"\s{2,}").unwrap();
}
