//! Canonical OCR token with an axis-aligned bounding box.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

impl BBox {
    /// Bounding box enclosing every point of a polygon.
    ///
    /// Returns `None` for a polygon without points.
    pub fn from_points(points: &[[f32; 2]]) -> Option<Self> {
        let (first, rest) = points.split_first()?;

        let mut bbox = Self {
            x_min: first[0],
            x_max: first[0],
            y_min: first[1],
            y_max: first[1],
        };
        for [x, y] in rest {
            bbox.x_min = bbox.x_min.min(*x);
            bbox.x_max = bbox.x_max.max(*x);
            bbox.y_min = bbox.y_min.min(*y);
            bbox.y_max = bbox.y_max.max(*y);
        }

        Some(bbox)
    }

    /// The same box with swapped edges put back in order.
    pub fn normalized(self) -> Self {
        Self {
            x_min: self.x_min.min(self.x_max),
            x_max: self.x_min.max(self.x_max),
            y_min: self.y_min.min(self.y_max),
            y_max: self.y_min.max(self.y_max),
        }
    }

    pub fn x_center(&self) -> f32 {
        (self.x_min + self.x_max) / 2.0
    }

    pub fn y_center(&self) -> f32 {
        (self.y_min + self.y_max) / 2.0
    }

    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }
}

/// One recognized text fragment.
///
/// Tokens are immutable once normalized; every layout stage works on
/// borrowed tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    text: String,
    confidence: f32,
    bbox: BBox,
}

impl Token {
    /// Create a token. Text is trimmed, confidence clamped to [0, 1] and
    /// the box edges reordered so that `min <= max` on both axes.
    pub fn new(text: impl AsRef<str>, confidence: f32, bbox: BBox) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };

        Self {
            text: text.as_ref().trim().to_string(),
            confidence,
            bbox: bbox.normalized(),
        }
    }

    /// Create a token from an OCR polygon.
    pub fn from_polygon(text: impl AsRef<str>, confidence: f32, polygon: &[[f32; 2]]) -> Option<Self> {
        BBox::from_points(polygon).map(|bbox| Self::new(text, confidence, bbox))
    }

    /// Create a token whose box is centered on `(x, y)`.
    pub fn centered(text: impl AsRef<str>, x: f32, y: f32, width: f32, height: f32) -> Self {
        let bbox = BBox {
            x_min: x - width / 2.0,
            x_max: x + width / 2.0,
            y_min: y - height / 2.0,
            y_max: y + height / 2.0,
        };
        Self::new(text, 1.0, bbox)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    pub fn x_center(&self) -> f32 {
        self.bbox.x_center()
    }

    pub fn y_center(&self) -> f32 {
        self.bbox.y_center()
    }

    pub fn width(&self) -> f32 {
        self.bbox.width()
    }

    pub fn height(&self) -> f32 {
        self.bbox.height()
    }
}

/// Sort tokens into reading order: top to bottom, then left to right.
///
/// The sort is stable, so tokens with identical centers keep the order the
/// engine reported them in.
pub fn sort_reading_order(tokens: &mut [Token]) {
    tokens.sort_by(|a, b| {
        a.y_center()
            .total_cmp(&b.y_center())
            .then_with(|| a.x_center().total_cmp(&b.x_center()))
    });
}

pub(crate) fn cmp_x(a: &Token, b: &Token) -> Ordering {
    a.x_center().total_cmp(&b.x_center())
}

pub(crate) fn cmp_y(a: &Token, b: &Token) -> Ordering {
    a.y_center().total_cmp(&b.y_center())
}
