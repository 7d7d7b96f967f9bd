//! Transactions command - list operation history

use anyhow::{Context, Result};
use chrono::NaiveDate;
use colored::Colorize;
use yamoney_core::TransactionRecord;

use super::{credential, date_range, get_context, spinner};
use crate::output::{self, create_table};

pub async fn run(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    token: Option<String>,
    json: bool,
) -> Result<()> {
    let (from, till) = date_range(from, to)?;
    let ctx = get_context()?;
    let credential = credential(&ctx, token).await?;

    let progress = spinner("Fetching operation history...");
    let records = ctx.client.fetch_transactions(&credential, from, till).await;
    progress.finish_and_clear();
    let records = records.context("Failed to fetch operation history")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        output::warning("No operations in this period.");
        return Ok(());
    }

    println!("{}", table(&records));
    println!("{} operations", records.len().to_string().bold());
    Ok(())
}

fn table(records: &[TransactionRecord]) -> comfy_table::Table {
    let mut table = create_table();
    table.set_header(vec!["Date", "Amount", "Title", "Status", "ID"]);

    for record in records {
        table.add_row(vec![
            record
                .datetime()
                .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
            output::format_amount(record.signed_amount(), None),
            record.title().unwrap_or("").to_string(),
            record.status().unwrap_or("").to_string(),
            record.operation_id().unwrap_or("").to_string(),
        ]);
    }
    table
}
