use billscan_core::bill::BillExtractor;
use billscan_core::models::config::{BillConfig, RowAnchor};
use billscan_core::{BillPipeline, RawOcrOutput, RecordedOcrEngine, Token};
use image::{DynamicImage, GrayImage, Luma};
use pretty_assertions::assert_eq;
use serde_json::json;

fn tok(text: &str, x: f32, y: f32) -> Token {
    Token::centered(text, x, y, 60.0, 20.0)
}

fn sample_bill() -> Vec<Token> {
    vec![
        tok("Sl", 600.0, 100.0),
        tok("No", 650.0, 100.0),
        tok("4521", 750.0, 100.0),
        tok("Date : 05|06|2024", 750.0, 130.0),
        tok("RAJESH KUMAR", 100.0, 150.0),
        tok("MRP", 50.0, 350.0),
        tok("Particulars", 250.0, 350.0),
        tok("Qty", 550.0, 350.0),
        tok("Rate", 700.0, 350.0),
        tok("Amount", 880.0, 350.0),
        tok("Rs", 950.0, 350.0),
        tok("Plywood", 300.0, 400.0),
        tok("2", 550.0, 400.0),
        tok("500", 750.0, 400.0),
        tok("1000", 900.0, 400.0),
        tok("Total", 300.0, 450.0),
        tok("1000", 900.0, 450.0),
    ]
}

#[test]
fn test_end_to_end_bill() {
    let mut tokens = sample_bill();
    tokens.reverse();

    let result = BillExtractor::default().extract(tokens);
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(
        value,
        json!({
            "success": true,
            "header": {
                "customerName": "RAJESH KUMAR",
                "slNo": "4521",
                "date": "05/06/2024"
            },
            "items": [
                { "id": "1", "itemName": "Plywood", "quantity": "2", "rate": "500", "amount": "1000" }
            ]
        })
    );
}

#[test]
fn test_anchor_policies_agree_on_straight_rows() {
    for anchor in [RowAnchor::Seed, RowAnchor::LastToken, RowAnchor::Centroid] {
        let mut config = BillConfig::default();
        config.layout.table.row_anchor = anchor;

        let result = BillExtractor::new(config.layout).extract(sample_bill());
        assert_eq!(result.items.len(), 1, "anchor {:?}", anchor);
    }
}

#[test]
fn test_columnar_dump_through_pipeline() {
    let dump = json!([{
        "rec_texts": ["RAJESH KUMAR", "Date : 05|06|2024"],
        "rec_scores": [0.98, 0.91],
        "dt_polys": [
            [[40, 140], [160, 140], [160, 160], [40, 160]],
            [[690, 120], [810, 120], [810, 140], [690, 140]]
        ]
    }]);
    let engine = RecordedOcrEngine::new(RawOcrOutput::from_json(&dump));
    let pipeline = BillPipeline::from_config(engine, &BillConfig::default());

    let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(64, 64, Luma([255])));
    let result = pipeline.process_image(&image);

    assert!(result.success);
    let header = result.header_or_default();
    assert_eq!(header.name, "RAJESH KUMAR");
    assert_eq!(header.date, "05/06/2024");
    assert_eq!(header.sl_no, "");
    assert!(result.items.is_empty());
}

#[test]
fn test_unreadable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bill.png");
    std::fs::write(&path, b"definitely not a png").unwrap();

    let engine = RecordedOcrEngine::new(RawOcrOutput::Unknown);
    let result = BillPipeline::from_config(engine, &BillConfig::default()).process_path(&path);

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Could not read image"));
    assert_eq!(
        serde_json::to_value(&result).unwrap()["header"],
        json!({})
    );
}

#[test]
fn test_unknown_engine_output_is_no_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blank.png");
    GrayImage::from_pixel(16, 16, Luma([255])).save(&path).unwrap();

    let engine = RecordedOcrEngine::new(RawOcrOutput::Unknown);
    let result = BillPipeline::from_config(engine, &BillConfig::default()).process_path(&path);

    assert_eq!(result.error.as_deref(), Some("No text detected in image"));
}
