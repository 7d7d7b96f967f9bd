//! Sync command - sign in, then fetch the account and operation history

use anyhow::Result;
use chrono::NaiveDate;
use colored::Colorize;

use super::{date_range, get_context, spinner};
use crate::output;

pub async fn run(from: Option<NaiveDate>, to: Option<NaiveDate>, json: bool) -> Result<()> {
    let (from, till) = date_range(from, to)?;
    let ctx = get_context()?;

    let credential = ctx.client.login().await?;
    let progress = spinner("Syncing...");
    let result = ctx
        .sync_service
        .sync_with_credential(&credential, from, till)
        .await;
    progress.finish_and_clear();
    let result = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let currency = result.account.currency_code();
    println!("{} {}", "Synced:".green(), result.provider);
    println!("  Account: {}", result.account.account().unwrap_or("-"));
    println!(
        "  Balance: {}",
        output::format_amount(result.account.balance(), currency.as_deref())
    );
    match &result.end_date {
        Some(end) => println!("  Date range: {} to {}", result.start_date, end),
        None => println!("  Operations since {}", result.start_date),
    }
    println!("  Transaction breakdown:");
    println!("    Discovered: {}", result.transaction_stats.discovered);
    println!(
        "    Inflow: {}",
        output::format_amount(Some(result.transaction_stats.inflow), currency.as_deref())
    );
    println!(
        "    Outflow: {}",
        output::format_amount(Some(result.transaction_stats.outflow), currency.as_deref())
    );

    Ok(())
}
