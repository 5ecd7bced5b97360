//! Bill date extraction.

use tracing::debug;

use crate::layout::Token;
use crate::models::config::HeaderConfig;

use super::patterns::DATE_DMY;
use super::FieldExtractor;

/// Finds the bill date, preferring tokens labelled "date".
pub struct DateExtractor<'a> {
    config: &'a HeaderConfig,
}

impl<'a> DateExtractor<'a> {
    pub fn new(config: &'a HeaderConfig) -> Self {
        Self { config }
    }
}

impl FieldExtractor for DateExtractor<'_> {
    fn extract(&self, zone: &[&Token]) -> Option<String> {
        let labelled = zone
            .iter()
            .filter(|t| {
                t.x_center() > self.config.date_keyword_min_x
                    && t.text().to_lowercase().contains("date")
            })
            .find_map(|t| parse_date(t.text()));

        if labelled.is_some() {
            return labelled;
        }

        let unlabelled = zone
            .iter()
            .filter(|t| {
                t.x_center() > self.config.date_fallback_min_x
                    && t.y_center() < self.config.date_fallback_max_y
            })
            .find_map(|t| parse_date(t.text()));

        if let Some(ref date) = unlabelled {
            debug!("Date '{}' found without label", date);
        }
        unlabelled
    }
}

/// Parse the first day/month/year group in `text` as `d/m/y`.
///
/// Separators may be `|`, `/`, `.` or whitespace. Two-digit years below 50
/// map to 20xx, the rest to 19xx. Day and month are not range-checked.
pub fn parse_date(text: &str) -> Option<String> {
    let caps = DATE_DMY.captures(text)?;
    let (day, month, year) = (&caps[1], &caps[2], &caps[3]);

    Some(format!("{}/{}/{}", day, month, expand_year(year)))
}

fn expand_year(year: &str) -> String {
    if year.len() != 2 {
        return year.to_string();
    }
    match year.parse::<u32>() {
        Ok(y) if y < 50 => (2000 + y).to_string(),
        Ok(y) => (1900 + y).to_string(),
        Err(_) => year.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(tokens: &[Token]) -> Option<String> {
        let config = HeaderConfig::default();
        let zone: Vec<&Token> = tokens.iter().collect();
        DateExtractor::new(&config).extract(&zone)
    }

    #[test]
    fn test_parse_date_separators() {
        assert_eq!(parse_date("Date : 05|06|2024"), Some("05/06/2024".to_string()));
        assert_eq!(parse_date("Date: 5.6.2024"), Some("5/6/2024".to_string()));
        assert_eq!(parse_date(".12/11/23"), Some("12/11/2023".to_string()));
        assert_eq!(parse_date("1 2 99"), Some("1/2/1999".to_string()));
        assert_eq!(parse_date("Date"), None);
    }

    #[test]
    fn test_labelled_date() {
        let tokens = vec![Token::centered("Date : 05|06|2024", 750.0, 100.0, 120.0, 20.0)];
        assert_eq!(extract(&tokens), Some("05/06/2024".to_string()));
    }

    #[test]
    fn test_label_left_of_threshold_uses_fallback() {
        let tokens = vec![
            Token::centered("Date : 01/01/2020", 500.0, 100.0, 120.0, 20.0),
            Token::centered("02/03/21", 760.0, 150.0, 80.0, 20.0),
        ];
        assert_eq!(extract(&tokens), Some("02/03/2021".to_string()));
    }

    #[test]
    fn test_fallback_respects_zone() {
        let tokens = vec![Token::centered("02/03/21", 760.0, 250.0, 80.0, 20.0)];
        assert_eq!(extract(&tokens), None);
    }
}
