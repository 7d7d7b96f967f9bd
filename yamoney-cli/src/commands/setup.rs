//! Setup command - configure the OAuth application

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::Input;
use yamoney_core::config::Config;

use super::get_app_dir;

pub fn run(
    client_id: Option<String>,
    redirect_uri: Option<String>,
    base_url: Option<String>,
) -> Result<()> {
    let app_dir = get_app_dir()?;
    std::fs::create_dir_all(&app_dir)
        .with_context(|| format!("Failed to create yamoney directory: {:?}", app_dir))?;

    let mut config = Config::load_file(&app_dir)?;

    let client_id = match client_id {
        Some(id) => id,
        None => {
            let mut prompt = Input::<String>::new().with_prompt("OAuth client id");
            if let Some(current) = config.client_id.clone() {
                prompt = prompt.default(current);
            }
            prompt.interact_text()?
        }
    };
    let redirect_uri = match redirect_uri {
        Some(uri) => uri,
        None => {
            let mut prompt = Input::<String>::new().with_prompt("Redirect URI");
            if let Some(current) = config.redirect_uri.clone() {
                prompt = prompt.default(current);
            }
            prompt.interact_text()?
        }
    };

    config.client_id = Some(client_id);
    config.redirect_uri = Some(redirect_uri);
    if base_url.is_some() {
        config.base_url = base_url;
    }

    // Refuse to save something login would reject
    config.gate_config()?;
    config.save(&app_dir)?;

    println!("{} Yandex.Money application configured", "Success!".green());
    println!("Run 'ym login' to sign in.");
    Ok(())
}
