//! Yamoney CLI - Yandex.Money accounts and operation history in your terminal

use std::process::ExitCode;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};

mod commands;
mod output;
mod web_view;

use commands::{account, login, setup, sync, transactions};

/// Environment variable holding an access token from `ym login --show-token`
const ACCESS_TOKEN_ENV: &str = "YAMONEY_ACCESS_TOKEN";

/// Yamoney - Yandex.Money in your terminal
#[derive(Parser)]
#[command(name = "ym", version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure the OAuth application
    Setup {
        /// OAuth client id of the registered application
        #[arg(long)]
        client_id: Option<String>,
        /// Redirect URI registered for the application
        #[arg(long)]
        redirect_uri: Option<String>,
        /// Gate base URL (defaults to https://money.yandex.ru)
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Sign in through the browser and obtain an access token
    Login {
        /// Print the access token
        #[arg(long)]
        show_token: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the account snapshot
    Account {
        /// Access token (signs in interactively when omitted)
        #[arg(long, env = ACCESS_TOKEN_ENV, hide_env_values = true)]
        token: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List operation history
    Transactions {
        /// First day of the history window (YYYY-MM-DD, defaults to 90 days ago)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day of the history window (YYYY-MM-DD, open-ended by default)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Access token (signs in interactively when omitted)
        #[arg(long, env = ACCESS_TOKEN_ENV, hide_env_values = true)]
        token: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign in, then fetch the account and its operation history
    Sync {
        /// First day of the history window (YYYY-MM-DD, defaults to 90 days ago)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day of the history window (YYYY-MM-DD, open-ended by default)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    yamoney_core::services::init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            if commands::is_auth_failure(&e) {
                output::warning("The access token was rejected. Run 'ym login' to sign in again.");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Setup { client_id, redirect_uri, base_url } => {
            setup::run(client_id, redirect_uri, base_url)
        }
        Commands::Login { show_token, json } => login::run(show_token, json).await,
        Commands::Account { token, json } => account::run(token, json).await,
        Commands::Transactions { from, to, token, json } => {
            transactions::run(from, to, token, json).await
        }
        Commands::Sync { from, to, json } => sync::run(from, to, json).await,
    }
}
