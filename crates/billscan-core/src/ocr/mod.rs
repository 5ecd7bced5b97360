//! OCR engine seam, raw output normalization, and image preprocessing.

mod preprocessing;
mod raw;
mod recorded;

#[cfg(feature = "native")]
mod pure_engine;

pub use preprocessing::ImagePreprocessor;
pub use raw::{Polygon, RawDetection, RawOcrOutput};
pub use recorded::RecordedOcrEngine;

#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use image::DynamicImage;

use crate::error::OcrError;

/// A text recognition engine.
///
/// The engine is created once and shared by every request, so
/// implementations must tolerate concurrent calls through `&self`.
pub trait OcrEngine: Send + Sync {
    /// Recognize text in an image.
    fn recognize(&self, image: &DynamicImage) -> Result<RawOcrOutput, OcrError>;

    /// Short engine name for logs.
    fn name(&self) -> &str;
}

impl<E: OcrEngine + ?Sized> OcrEngine for std::sync::Arc<E> {
    fn recognize(&self, image: &DynamicImage) -> Result<RawOcrOutput, OcrError> {
        (**self).recognize(image)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
