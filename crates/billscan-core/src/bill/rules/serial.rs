//! Bill serial number extraction.

use tracing::debug;

use crate::layout::Token;
use crate::models::config::HeaderConfig;

use super::patterns::SERIAL_NUMBER;
use super::FieldExtractor;

/// Finds the serial number printed next to a "Sl. No." label.
pub struct SerialNumberExtractor<'a> {
    config: &'a HeaderConfig,
}

impl<'a> SerialNumberExtractor<'a> {
    pub fn new(config: &'a HeaderConfig) -> Self {
        Self { config }
    }

    /// Number following a label, within the lookahead window.
    fn after_label(&self, zone: &[&Token], label: usize) -> Option<String> {
        zone.iter()
            .skip(label + 1)
            .take(self.config.sl_no_lookahead)
            .find(|t| SERIAL_NUMBER.is_match(t.text()) && t.x_center() > self.config.sl_no_min_x)
            .map(|t| t.text().to_string())
    }

    /// Number in the top-right corner without a label.
    fn fallback(&self, zone: &[&Token]) -> Option<String> {
        zone.iter()
            .find(|t| {
                t.x_center() > self.config.sl_no_fallback_min_x
                    && t.y_center() < self.config.sl_no_fallback_max_y
                    && SERIAL_NUMBER.is_match(t.text())
            })
            .map(|t| t.text().to_string())
    }
}

impl FieldExtractor for SerialNumberExtractor<'_> {
    fn extract(&self, zone: &[&Token]) -> Option<String> {
        for (i, token) in zone.iter().enumerate() {
            let compact = compact_text(token.text());
            // OCR often splits "Sl. No." into two tokens
            let joined = zone
                .get(i + 1)
                .map(|next| format!("{}{}", compact, compact_text(next.text())));

            if !is_label(&compact) && !joined.as_deref().is_some_and(is_label) {
                continue;
            }

            if let Some(number) = self.after_label(zone, i) {
                debug!("Serial number '{}' found after label '{}'", number, token.text());
                return Some(number);
            }
        }

        self.fallback(zone)
    }
}

/// Lowercase text with spaces and periods removed.
fn compact_text(text: &str) -> String {
    text.to_lowercase().replace([' ', '.'], "")
}

fn is_label(compact: &str) -> bool {
    (compact.contains("sl") || compact.contains("si")) && compact.contains("no")
}
