//! Core library for retail bill OCR.
//!
//! This crate provides:
//! - normalization of OCR engine output into positioned tokens
//! - reading-order sorting and row grouping
//! - header field extraction (customer name, serial number, date)
//! - item table location and column assignment
//! - an image pipeline around an injectable OCR engine

pub mod bill;
pub mod error;
pub mod layout;
pub mod models;
pub mod ocr;

pub use bill::{BillExtractor, BillPipeline};
pub use error::{BillError, ConfigError, OcrError, Result};
pub use layout::{BBox, Token};
pub use models::{BillConfig, ExtractionResult, FailureReason, HeaderInfo, LineItem};
pub use ocr::{ImagePreprocessor, OcrEngine, RawOcrOutput, RecordedOcrEngine};

#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
