//! Grouping of table tokens into horizontal rows.

use tracing::trace;

use crate::models::config::RowAnchor;

use super::token::{cmp_x, cmp_y, Token};

/// Tokens sharing an approximate y-coordinate, ordered left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<'a> {
    tokens: Vec<&'a Token>,
}

impl<'a> Row<'a> {
    fn from_tokens(mut tokens: Vec<&'a Token>) -> Self {
        tokens.sort_by(|a, b| cmp_x(a, b));
        Self { tokens }
    }

    pub fn tokens(&self) -> &[&'a Token] {
        &self.tokens
    }

    /// Token texts joined with single spaces.
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Running state of the row being built.
struct OpenRow<'a> {
    tokens: Vec<&'a Token>,
    anchor_y: f32,
    y_sum: f32,
}

impl<'a> OpenRow<'a> {
    fn seed(token: &'a Token) -> Self {
        Self {
            tokens: vec![token],
            anchor_y: token.y_center(),
            y_sum: token.y_center(),
        }
    }

    fn push(&mut self, token: &'a Token, policy: RowAnchor) {
        self.tokens.push(token);
        self.y_sum += token.y_center();
        match policy {
            RowAnchor::Seed => {}
            RowAnchor::LastToken => self.anchor_y = token.y_center(),
            RowAnchor::Centroid => self.anchor_y = self.y_sum / self.tokens.len() as f32,
        }
    }

    fn close(self) -> Row<'a> {
        Row::from_tokens(self.tokens)
    }
}

/// Cluster tokens into rows by vertical proximity.
///
/// Tokens are sorted by `y_center` first, so the result does not depend on
/// input order. A token joins the open row when its distance to the row's
/// anchor is at most `threshold`; otherwise it opens a new row.
pub fn group_into_rows(tokens: &[Token], threshold: f32, policy: RowAnchor) -> Vec<Row<'_>> {
    let mut sorted: Vec<&Token> = tokens.iter().collect();
    sorted.sort_by(|a, b| cmp_y(a, b));

    let mut iter = sorted.into_iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    let mut open = OpenRow::seed(first);

    for token in iter {
        if (token.y_center() - open.anchor_y).abs() <= threshold {
            open.push(token, policy);
        } else {
            trace!(
                "Closing row of {} tokens at y={:.1}",
                open.tokens.len(),
                open.anchor_y
            );
            rows.push(std::mem::replace(&mut open, OpenRow::seed(token)).close());
        }
    }
    rows.push(open.close());

    rows
}
