//! Account command - show the account snapshot

use anyhow::{Context, Result};
use colored::Colorize;

use super::{credential, get_context, spinner};
use crate::output::{self, create_table};

pub async fn run(token: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let credential = credential(&ctx, token).await?;

    let progress = spinner("Fetching account info...");
    let account = ctx.client.fetch_account(&credential).await;
    progress.finish_and_clear();
    let account = account.context("Failed to fetch account info")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&account)?);
        return Ok(());
    }

    println!("{}", "Yandex.Money Account".bold());
    println!();

    let currency = account.currency_code();
    let mut table = create_table();
    table.add_row(vec!["Account", account.account().unwrap_or("-")]);
    table.add_row(vec![
        "Balance".to_string(),
        output::format_amount(account.balance(), currency.as_deref()),
    ]);
    table.add_row(vec!["Type", account.account_type().unwrap_or("-")]);
    table.add_row(vec!["Status", account.account_status().unwrap_or("-")]);

    println!("{}", table);
    Ok(())
}
