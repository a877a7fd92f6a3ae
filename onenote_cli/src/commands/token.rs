use std::io::Write;

use crate::cli::{Cli, OutputFormat, TokenAction};
use crate::commands::{CommandError, Result};
use crate::output::{format_output, OutputData};
use onenote_core::config::{Config, StorageMode};
use onenote_core::token_store::{FileTokenStore, KeyringTokenStore, TokenChain, TokenStore};
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn run(cli: &Cli, action: TokenAction) -> Result<()> {
    match action {
        TokenAction::Show { full } => show(full),
        TokenAction::Set { token } => set(token),
        TokenAction::Status => status(cli),
    }
}

fn show(full: bool) -> Result<()> {
    let config = Config::from_env();
    let chain = TokenChain::from_config(&config);
    let token = chain.read(true).ok_or(CommandError::NotAuthenticated)?;

    if full {
        println!("{}", token);
    } else {
        let head: String = token.chars().take(12).collect();
        println!(
            "{}... {}",
            head,
            "(--full prints the whole token)".dimmed()
        );
    }
    Ok(())
}

fn set(value: Option<String>) -> Result<()> {
    let token = match value {
        Some(value) => value.trim().to_string(),
        None => {
            print!("Paste access token: ");
            std::io::stdout().flush()?;
            read_secret()?
        }
    };
    if token.is_empty() {
        return Err(CommandError::InvalidInput("no token provided".to_string()));
    }

    let config = Config::from_env();
    let chain = TokenChain::from_config(&config);
    let outcome = chain.write(&token)?;

    println!(
        "{} Token saved to {}.",
        "✓".green().bold(),
        outcome.destination.cyan()
    );
    if let Some(warning) = outcome.warning {
        println!("{} {}", "Warning:".yellow().bold(), warning);
    }
    Ok(())
}

fn status(cli: &Cli) -> Result<()> {
    let config = Config::from_env();
    let chain = TokenChain::from_config(&config);
    let (token, source) = token_source(&config);

    let status = json!({
        "storage_mode": config.storage.as_str(),
        "secure_store_available": chain.secure_store_available(),
        "token_file": config.token_file.display().to_string(),
        "env_var": config.token_env_var,
        "env_token_set": config.env_token_set(),
        "token_present": token.is_some(),
        "token_source": source,
    });

    match cli.output {
        OutputFormat::Pretty => {
            println!("{}", "Token Status".bold().cyan());
            println!();
            println!("  {} {}", "storage mode:".dimmed(), config.storage.as_str());
            let secure = if chain.secure_store_available() {
                "available".green().to_string()
            } else {
                "unavailable".yellow().to_string()
            };
            println!("  {} {}", "secure store:".dimmed(), secure);
            println!(
                "  {} {}",
                "token file:".dimmed(),
                config.token_file.display()
            );
            println!(
                "  {} {} {}",
                "env override:".dimmed(),
                config.token_env_var,
                if config.env_token_set() {
                    "(set)".green().to_string()
                } else {
                    "(unset)".dimmed().to_string()
                }
            );
            println!();
            match token {
                Some(_) => println!(
                    "  {} Token resolves from {}",
                    "●".green().bold(),
                    source.cyan()
                ),
                None => println!(
                    "  {} No token found - run {}",
                    "●".yellow().bold(),
                    "onenote login".cyan()
                ),
            }
        }
        _ => {
            format_output(&OutputData::TokenStatus(status), &cli.output)?;
        }
    }
    Ok(())
}

/// Probe the same order `TokenChain::read` uses, but report which backend
/// the token came from.
fn token_source(config: &Config) -> (Option<String>, &'static str) {
    if config.env_token_set() {
        return (std::env::var(&config.token_env_var).ok(), "env");
    }
    if config.storage == StorageMode::Keychain {
        let keyring = KeyringTokenStore::new(&config.keychain_service, &config.keychain_account);
        if let Ok(Some(token)) = keyring.read() {
            return (Some(token), "keychain");
        }
    }
    if config.storage != StorageMode::Env {
        let file = FileTokenStore::new(config.token_file.clone());
        if let Ok(Some(token)) = file.read() {
            return (Some(token), "file");
        }
    }
    (None, "none")
}

/// Hidden-input prompt, falling back to a plain stdin line when no TTY is
/// attached (piped input, CI).
fn read_secret() -> Result<String> {
    match rpassword::read_password() {
        Ok(secret) => Ok(secret.trim().to_string()),
        Err(_) => {
            let mut line = String::new();
            std::io::stdin().read_line(&mut line)?;
            Ok(line.trim().to_string())
        }
    }
}
