//! Locating the start of the item table.

use tracing::debug;

use crate::layout::Token;
use crate::models::config::TableConfig;

/// Index of the first token of the table body in a reading-order stream.
///
/// The table header is recognised by a token containing "particulars", or
/// one containing both "qty" and "rate". The body starts `start_offset`
/// tokens after that token; without a header, at `start_fallback`.
pub fn find_table_start(tokens: &[Token], config: &TableConfig) -> usize {
    let header = tokens.iter().position(|t| {
        let text = t.text().to_lowercase();
        text.contains("particulars") || (text.contains("qty") && text.contains("rate"))
    });

    match header {
        Some(i) => {
            debug!("Table header '{}' at token {}", tokens[i].text(), i);
            i.saturating_add(config.start_offset)
        }
        None => {
            debug!(
                "No table header found, assuming body starts at token {}",
                config.start_fallback
            );
            config.start_fallback
        }
    }
}

/// Tokens of the table body. Empty when the start lies past the end.
pub fn table_tokens<'a>(tokens: &'a [Token], config: &TableConfig) -> &'a [Token] {
    tokens.get(find_table_start(tokens, config)..).unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(texts: &[&str]) -> Vec<Token> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Token::centered(t, 100.0, 10.0 * i as f32, 10.0, 5.0))
            .collect()
    }

    #[test]
    fn test_particulars_header() {
        let tokens = stream(&["Bill", "MRP", "PARTICULARS", "Qty"]);
        assert_eq!(find_table_start(&tokens, &TableConfig::default()), 7);
    }

    #[test]
    fn test_qty_rate_header() {
        let tokens = stream(&["Bill", "Qty/Rate", "x"]);
        assert_eq!(find_table_start(&tokens, &TableConfig::default()), 6);

        // Either word alone is not a header
        let tokens = stream(&["Qty", "Rate"]);
        assert_eq!(find_table_start(&tokens, &TableConfig::default()), 15);
    }

    #[test]
    fn test_start_past_end_is_empty() {
        let tokens = stream(&["a", "b", "Particulars"]);
        assert!(table_tokens(&tokens, &TableConfig::default()).is_empty());
    }

    #[test]
    fn test_slice_after_header() {
        let texts: Vec<String> = (0..10).map(|i| format!("t{}", i)).collect();
        let mut refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        refs[1] = "Particulars";
        let tokens = stream(&refs);

        let body = table_tokens(&tokens, &TableConfig::default());
        assert_eq!(body.first().map(|t| t.text()), Some("t6"));
        assert_eq!(body.len(), 4);
    }

    #[test]
    fn test_huge_offset_gives_empty_body() {
        let tokens = stream(&["Bill", "Particulars", "Plywood"]);
        let config = TableConfig {
            start_offset: usize::MAX,
            ..TableConfig::default()
        };

        assert_eq!(find_table_start(&tokens, &config), usize::MAX);
        assert!(table_tokens(&tokens, &config).is_empty());
    }
}
