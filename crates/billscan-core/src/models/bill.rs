//! Bill data models and the extraction result returned to callers.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Header fields found in the upper part of a bill.
///
/// Every field is best effort; an empty string means "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderInfo {
    /// Customer name.
    #[serde(rename = "customerName")]
    pub name: String,

    /// Bill serial number.
    #[serde(rename = "slNo")]
    pub sl_no: String,

    /// Bill date as `day/month/year`.
    pub date: String,
}

/// A single row of the bill's item table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// 1-based position among the kept items.
    pub id: String,
    pub item_name: String,
    pub quantity: String,
    pub rate: String,
    pub amount: String,
}

/// Why an extraction produced no data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The input could not be decoded as an image.
    UnreadableImage,
    /// OCR ran but found no text.
    NoTextDetected,
    /// The extraction did not finish within the configured time.
    Timeout { secs: u64 },
    /// The OCR engine failed.
    Ocr(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::UnreadableImage => write!(f, "Could not read image"),
            FailureReason::NoTextDetected => write!(f, "No text detected in image"),
            FailureReason::Timeout { secs } => {
                write!(f, "Processing timed out after {} seconds", secs)
            }
            FailureReason::Ocr(msg) => write!(f, "OCR error: {}", msg),
        }
    }
}

/// Outcome of processing one bill.
///
/// Serializes to `{ success, header, items, error? }`. A failed result has
/// an empty `header` object and no items.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    pub success: bool,

    #[serde(serialize_with = "serialize_header")]
    pub header: Option<HeaderInfo>,

    pub items: Vec<LineItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Failure classification, not part of the wire format.
    #[serde(skip)]
    pub failure: Option<FailureReason>,
}

impl ExtractionResult {
    /// A successful extraction.
    pub fn success(header: HeaderInfo, items: Vec<LineItem>) -> Self {
        Self {
            success: true,
            header: Some(header),
            items,
            error: None,
            failure: None,
        }
    }

    /// A failed extraction.
    pub fn failure(reason: FailureReason) -> Self {
        Self {
            success: false,
            header: None,
            items: Vec::new(),
            error: Some(reason.to_string()),
            failure: Some(reason),
        }
    }

    /// Header fields, empty for failed results.
    pub fn header_or_default(&self) -> HeaderInfo {
        self.header.clone().unwrap_or_default()
    }
}

fn serialize_header<S>(header: &Option<HeaderInfo>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match header {
        Some(header) => header.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_success_wire_format() {
        let header = HeaderInfo {
            name: "RAJESH KUMAR".to_string(),
            sl_no: "4521".to_string(),
            date: "05/06/2024".to_string(),
        };
        let items = vec![LineItem {
            id: "1".to_string(),
            item_name: "Plywood".to_string(),
            quantity: "2".to_string(),
            rate: "500".to_string(),
            amount: "1000".to_string(),
        }];

        let value = serde_json::to_value(ExtractionResult::success(header, items)).unwrap();

        assert_eq!(
            value,
            json!({
                "success": true,
                "header": { "customerName": "RAJESH KUMAR", "slNo": "4521", "date": "05/06/2024" },
                "items": [
                    { "id": "1", "itemName": "Plywood", "quantity": "2", "rate": "500", "amount": "1000" }
                ]
            })
        );
    }

    #[test]
    fn test_failure_wire_format() {
        let result = ExtractionResult::failure(FailureReason::NoTextDetected);
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(
            value,
            json!({
                "success": false,
                "error": "No text detected in image",
                "header": {},
                "items": []
            })
        );
        assert_eq!(result.failure, Some(FailureReason::NoTextDetected));
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(FailureReason::UnreadableImage.to_string(), "Could not read image");
        assert_eq!(
            FailureReason::Timeout { secs: 25 }.to_string(),
            "Processing timed out after 25 seconds"
        );
    }
}
