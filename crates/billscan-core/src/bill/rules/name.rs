//! Customer name extraction.

use tracing::debug;

use crate::layout::Token;
use crate::models::config::HeaderConfig;

use super::FieldExtractor;

/// Picks the most name-like token in the upper left of the bill.
pub struct NameExtractor<'a> {
    config: &'a HeaderConfig,
}

impl<'a> NameExtractor<'a> {
    pub fn new(config: &'a HeaderConfig) -> Self {
        Self { config }
    }

    /// Score a token as a name candidate, returning the cleaned text.
    fn score(&self, token: &Token) -> Option<(String, usize)> {
        let c = self.config;
        let (x, y) = (token.x_center(), token.y_center());

        if !(x < c.name_max_x && y > c.name_min_y && y < c.name_max_y) {
            return None;
        }

        let text = token.text();
        if !text.chars().any(|ch| ch.is_ascii_alphabetic()) || text.chars().count() <= 1 {
            return None;
        }

        let lower = text.to_lowercase();
        if c.noise_keywords.iter().any(|kw| lower.contains(kw.as_str())) {
            return None;
        }

        let clean = text.replace('.', "").trim().to_string();
        let len = clean.chars().count();
        if len < c.name_min_len {
            return None;
        }

        let mut score = len;
        if (c.name_bonus_min_x..=c.name_bonus_max_x).contains(&x) {
            score += c.name_bonus_x;
        }
        if (c.name_bonus_min_y..=c.name_bonus_max_y).contains(&y) {
            score += c.name_bonus_y;
        }

        Some((clean, score))
    }
}

impl FieldExtractor for NameExtractor<'_> {
    fn extract(&self, zone: &[&Token]) -> Option<String> {
        let mut best: Option<(String, usize)> = None;

        for token in zone {
            if let Some((text, score)) = self.score(token) {
                debug!("Name candidate '{}' scored {}", text, score);
                // Strictly greater: ties keep the earlier candidate
                if best.as_ref().is_none_or(|(_, top)| score > *top) {
                    best = Some((text, score));
                }
            }
        }

        best.map(|(text, _)| text)
    }
}
