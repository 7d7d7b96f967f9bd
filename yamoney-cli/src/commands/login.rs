//! Login command - authorize through the browser

use anyhow::Result;
use serde_json::json;

use super::get_context;
use crate::output;

pub async fn run(show_token: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let credential = ctx.client.login().await?;

    if json {
        let token = show_token.then(|| credential.access_token());
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({ "authenticated": true, "access_token": token }))?
        );
        return Ok(());
    }

    output::success("Signed in to Yandex.Money");
    if show_token {
        println!("{}", credential.access_token());
    } else {
        println!("Tokens are not stored. Re-run with --show-token and pass it via --token or YAMONEY_ACCESS_TOKEN.");
    }
    Ok(())
}
