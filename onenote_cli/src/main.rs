use clap::Parser;
use owo_colors::OwoColorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use commands::*;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over -v
    let default_filter = match cli.verbose {
        0 => "onenote_cli=info",
        1 => "onenote_cli=debug,onenote_core=debug",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let result = match &cli.command {
        None => {
            // No command provided - show quick overview
            show_overview().await
        }
        Some(Commands::Login { tenant, client_id }) => {
            login::run(&cli, tenant.as_deref(), client_id.as_deref()).await
        }
        Some(Commands::Token { action }) => token::run(&cli, action.clone()).await,
        Some(Commands::Notebooks) => notebooks::run(&cli).await,
        Some(Commands::Sections { notebook }) => sections::run(&cli, notebook.as_deref()).await,
        Some(Commands::Pages {
            section,
            notebook,
            section_id,
        }) => {
            pages::run(
                &cli,
                notebook.as_deref(),
                section.as_deref(),
                section_id.as_deref(),
            )
            .await
        }
        Some(Commands::Page { query, out }) => {
            page::run(&cli, query.as_deref(), out.as_deref()).await
        }
        Some(Commands::Create {
            notebook,
            section,
            section_id,
            title,
            html,
            html_file,
        }) => {
            create::run(
                &cli,
                notebook.as_deref(),
                section.as_deref(),
                section_id.as_deref(),
                title.as_deref(),
                html.as_deref(),
                html_file.as_deref(),
            )
            .await
        }
        Some(Commands::Search { query }) => search::run(&cli, query).await,
        Some(Commands::Groups) => groups::run(&cli).await,
        Some(Commands::Info) => info::run(&cli).await,
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(1);
    }
}

async fn show_overview() -> commands::Result<()> {
    use onenote_core::config::Config;
    use onenote_core::token_store::TokenChain;

    println!();
    println!(
        "{}  {}",
        "OneNote".bold().cyan(),
        "- Microsoft OneNote CLI".dimmed()
    );
    println!();

    let config = Config::from_env();
    let chain = TokenChain::from_config(&config);
    let signed_in = chain.read(true).is_some();

    if signed_in {
        println!(
            "  {} Signed in (token storage: {})",
            "●".green().bold(),
            config.storage.as_str().cyan()
        );
    } else {
        println!(
            "  {} Not signed in - run {} to get started",
            "●".yellow().bold(),
            "onenote login".cyan()
        );
    }
    println!();

    // Quick start section
    println!("{}", "Quick Start:".bold().cyan());
    println!(
        "  {}{}",
        "onenote notebooks".cyan(),
        "             List your notebooks".dimmed()
    );
    println!(
        "  {}{}",
        "onenote pages --notebook Work".cyan(),
        " List pages in a notebook".dimmed()
    );
    println!(
        "  {}{}",
        "onenote search \"budget\"".cyan(),
        "       Search page titles".dimmed()
    );
    println!();

    println!(
        "{} Use {} for full help",
        "Tip:".dimmed(),
        "onenote --help".cyan()
    );
    println!();

    Ok(())
}
