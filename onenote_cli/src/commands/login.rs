use crate::cli::Cli;
use crate::commands::{spinner, Result};
use onenote_core::config::Config;
use onenote_core::oauth;
use onenote_core::token_store::TokenChain;
use owo_colors::OwoColorize;

pub async fn run(_cli: &Cli, tenant: Option<&str>, client_id: Option<&str>) -> Result<()> {
    let config = Config::from_env();
    let chain = TokenChain::from_config(&config);

    let tenant = tenant.unwrap_or("common");
    let client_id = client_id.unwrap_or(&config.client_id);

    let scopes = config.scopes.join(" ");
    let start = oauth::device_authorize(tenant, client_id, &scopes).await?;

    println!();
    println!("{}", start.verification_message().bold());
    println!();

    let pb = spinner("Waiting for sign-in to complete...");
    let tokens = oauth::device_poll_until_complete(tenant, client_id, &start).await;
    pb.finish_and_clear();
    let tokens = tokens?;

    match chain.write(&tokens.access_token) {
        Ok(outcome) => {
            println!(
                "{} Signed in. Token saved to {}.",
                "✓".green().bold(),
                outcome.destination.cyan()
            );
            if let Some(warning) = outcome.warning {
                println!("{} {}", "Warning:".yellow().bold(), warning);
            }
        }
        Err(e) => {
            println!(
                "{} Signed in, but the token could not be saved: {}",
                "Warning:".yellow().bold(),
                e
            );
            println!("Export it for this shell instead:");
            println!("  export {}='{}'", config.token_env_var, tokens.access_token);
        }
    }

    Ok(())
}
