use std::io::Write;

use anyhow::Context;
use csv::WriterBuilder;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::processor::Receipt;

#[derive(Debug, Serialize)]
pub struct ReceiptRow {
    pub line: u64,
    pub success: bool,
    pub message: String,
    pub balance: Option<Decimal>,
    /// History records joined with `; `, empty unless the row viewed history.
    pub records: String,
}

impl ReceiptRow {
    pub fn new(line: u64, receipt: Receipt) -> Self {
        let records = receipt
            .records
            .iter()
            .flatten()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Self {
            line,
            success: receipt.success(),
            message: receipt.message,
            balance: receipt.balance,
            records,
        }
    }
}

/// Column names of [`ReceiptRow`], written even when no row follows.
pub const RECEIPT_HEADER: [&str; 5] = ["line", "success", "message", "balance", "records"];

pub fn print_receipts<W>(
    output: &mut W,
    receipts: impl Iterator<Item = ReceiptRow>,
) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(output);
    writer
        .write_record(RECEIPT_HEADER)
        .context("Failed to write the receipt header")?;
    for row in receipts {
        let line = row.line;
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write the receipt for script line {line}"))?;
    }
    writer.flush().context("Failed to flush script receipts")?;
    Ok(())
}
