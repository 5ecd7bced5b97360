//! Rendering of extraction results.

use billscan_core::ExtractionResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

/// Header fields on the first line, a blank line, then the item table.
fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let header = result.header_or_default();

    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(vec![]);
    wtr.write_record([
        format!("Name: {}", header.name),
        String::new(),
        String::new(),
        format!("Sl. No: {}", header.sl_no),
        String::new(),
        String::new(),
        format!("Date: {}", header.date),
    ])?;

    let mut buf = wtr.into_inner()?;
    buf.push(b'\n');

    let mut wtr = csv::Writer::from_writer(buf);
    wtr.write_record(["Particulars", "Qty", "Rate", "Amount"])?;
    for item in &result.items {
        wtr.write_record([&item.item_name, &item.quantity, &item.rate, &item.amount])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    if !result.success {
        output.push_str(&format!(
            "Extraction failed: {}\n",
            result.error.as_deref().unwrap_or("unknown error")
        ));
        return output;
    }

    let header = result.header_or_default();
    output.push_str(&format!("Customer: {}\n", header.name));
    output.push_str(&format!("Sl. No:   {}\n", header.sl_no));
    output.push_str(&format!("Date:     {}\n", header.date));
    output.push('\n');

    if result.items.is_empty() {
        output.push_str("No items found\n");
        return output;
    }

    output.push_str("Items:\n");
    for item in &result.items {
        output.push_str(&format!(
            "  {:>3}. {}  qty {}  rate {}  amount {}\n",
            item.id, item.item_name, item.quantity, item.rate, item.amount
        ));
    }

    output
}
