//! Drives the pipeline: batch partition, retrieval, parsing, reporting.

use crate::batch::{self, DateRange};
use crate::decode;
use crate::error::SkipReason;
use crate::extract::{self, InventoryRecord};
use crate::gmail::RawMessage;
use crate::report;
use crate::retrieve::{self, Mailbox};
use anyhow::Result;
use chrono::DateTime;
use std::path::Path;
use tracing::warn;

/// Processes every batch of `range` in order, writing one CSV per batch
/// that produced records. Message-level failures are logged and skipped;
/// a failing search or report write ends the run.
pub fn run(
    mailbox: &dyn Mailbox,
    range: DateRange,
    months_per_batch: u32,
    cap: Option<usize>,
    out_dir: &Path,
    quiet: bool,
) -> Result<()> {
    for batch in batch::partition(&range, months_per_batch) {
        println!(
            "\nProcessing batch {}: {} - {}",
            batch.seq,
            batch.range.start.format("%d/%m/%Y"),
            batch.range.end.format("%d/%m/%Y"),
        );
        let messages = retrieve::search_messages(mailbox, &batch.range, cap, quiet)?;

        let mut records = Vec::new();
        for message in &messages {
            match records_from_message(message) {
                Ok(message_records) => records.extend(message_records),
                Err(reason) => warn!("skipping message {}: {}", message.id, reason),
            }
        }

        if records.is_empty() {
            println!("No messages found in this date range.");
            continue;
        }
        let path = report::write(&records, &batch.range, out_dir)?;
        println!("Saved {} records to {}", records.len(), path.display());
    }
    println!("\nDone.");
    Ok(())
}

/// Decodes and parses one message; every resulting record is stamped
/// with the message's internal timestamp as `fecha`.
fn records_from_message(message: &RawMessage) -> Result<Vec<InventoryRecord>, SkipReason> {
    let (body, is_structured) = decode::decode(message)?;
    let fecha = format_fecha(message);
    let mut records = extract::parse(&body, is_structured);
    for record in &mut records {
        record.fecha = fecha.clone();
    }
    Ok(records)
}

/// Internal timestamp (milliseconds since epoch) at second precision,
/// UTC. A message without a usable timestamp leaves `fecha` empty.
fn format_fecha(message: &RawMessage) -> String {
    message
        .internal_date
        .as_deref()
        .and_then(|ms| ms.parse::<i64>().ok())
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}
