//! Raw OCR engine output and its normalization into tokens.
//!
//! Engines report results in one of two layouts: parallel arrays of texts,
//! polygons and scores, or a list of `[polygon, (text, score)]` detections.
//! The shape is resolved once here; everything downstream sees `Token`s.

use serde_json::Value;
use tracing::debug;

use crate::layout::Token;

/// A polygon as a list of `(x, y)` points.
pub type Polygon = Vec<[f32; 2]>;

/// One detection in the list-of-pairs layout.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    pub polygon: Polygon,
    pub text: String,
    pub score: Option<f32>,
}

/// OCR output before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawOcrOutput {
    /// Parallel arrays (`rec_texts`, `dt_polys`, `rec_scores`).
    Columnar {
        texts: Vec<String>,
        polygons: Vec<Polygon>,
        scores: Vec<f32>,
    },
    /// A list of detections.
    Detections(Vec<RawDetection>),
    /// Anything else. Normalizes to zero tokens.
    Unknown,
}

impl RawOcrOutput {
    /// Interpret a JSON dump of engine output.
    ///
    /// Accepted shapes:
    /// - `[{ "rec_texts": [...], "dt_polys": [...], "rec_scores": [...] }]`
    ///   (or the bare object);
    /// - `[[ [polygon, [text, score]], ... ]]` with one list per page, or a
    ///   flat list of such pairs.
    ///
    /// Unrecognised input yields `Unknown` rather than an error.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(_) if value.get("rec_texts").is_some() => columnar_from_json(value),
            Value::Array(entries) => match entries.first() {
                Some(first) if first.get("rec_texts").is_some() => columnar_from_json(first),
                Some(Value::Array(_)) => detections_from_json(entries),
                _ => RawOcrOutput::Unknown,
            },
            _ => RawOcrOutput::Unknown,
        }
    }

    /// Convert into tokens. Detections without points are dropped.
    pub fn into_tokens(self) -> Vec<Token> {
        let mut skipped = 0usize;

        let tokens: Vec<Token> = match self {
            RawOcrOutput::Columnar {
                texts,
                polygons,
                scores,
            } => texts
                .iter()
                .zip(polygons.iter())
                .enumerate()
                .filter_map(|(i, (text, polygon))| {
                    let score = scores.get(i).copied().unwrap_or(1.0);
                    let token = Token::from_polygon(text, score, polygon);
                    if token.is_none() {
                        skipped += 1;
                    }
                    token
                })
                .collect(),
            RawOcrOutput::Detections(detections) => detections
                .into_iter()
                .filter_map(|d| {
                    let token = Token::from_polygon(&d.text, d.score.unwrap_or(1.0), &d.polygon);
                    if token.is_none() {
                        skipped += 1;
                    }
                    token
                })
                .collect(),
            RawOcrOutput::Unknown => {
                debug!("Unrecognised OCR output shape, treating as empty");
                Vec::new()
            }
        };

        if skipped > 0 {
            debug!("Skipped {} detections without polygon points", skipped);
        }

        tokens
    }
}

fn columnar_from_json(value: &Value) -> RawOcrOutput {
    let texts = value
        .get("rec_texts")
        .and_then(Value::as_array)
        .map(|a| a.iter().map(value_to_text).collect())
        .unwrap_or_default();

    let polygons = value
        .get("dt_polys")
        .and_then(Value::as_array)
        .map(|a| a.iter().map(|p| parse_polygon(p).unwrap_or_default()).collect())
        .unwrap_or_default();

    let scores = value
        .get("rec_scores")
        .and_then(Value::as_array)
        .map(|a| a.iter().map(|s| s.as_f64().unwrap_or(1.0) as f32).collect())
        .unwrap_or_default();

    RawOcrOutput::Columnar {
        texts,
        polygons,
        scores,
    }
}

fn detections_from_json(entries: &[Value]) -> RawOcrOutput {
    // A flat list starts with a detection; otherwise it is a list of pages.
    let flat = entries.first().and_then(parse_detection).is_some();

    let detections = if flat {
        entries.iter().filter_map(parse_detection).collect()
    } else {
        entries
            .iter()
            .filter_map(Value::as_array)
            .flat_map(|page| page.iter().filter_map(parse_detection))
            .collect()
    };

    RawOcrOutput::Detections(detections)
}

/// Parse `[polygon, [text, score]]` or `[polygon, text]`.
fn parse_detection(value: &Value) -> Option<RawDetection> {
    let pair = value.as_array()?;
    if pair.len() < 2 {
        return None;
    }

    let polygon = parse_polygon(&pair[0])?;
    let (text, score) = match &pair[1] {
        Value::Array(info) if info.len() >= 2 => {
            (value_to_text(&info[0]), info[1].as_f64().map(|s| s as f32))
        }
        other => (value_to_text(other), None),
    };

    Some(RawDetection {
        polygon,
        text,
        score,
    })
}

fn parse_polygon(value: &Value) -> Option<Polygon> {
    value
        .as_array()?
        .iter()
        .map(|point| {
            let coords = point.as_array()?;
            let x = coords.first()?.as_f64()?;
            let y = coords.get(1)?.as_f64()?;
            Some([x as f32, y as f32])
        })
        .collect()
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
