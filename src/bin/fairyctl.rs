//! Command-line companion for the URL Fairy relay.
//!
//! Runs pieces of the pipeline locally against the same environment
//! configuration as the server, without Telegram.
//!
//! # Usage
//!
//! ```bash
//! # Run the whole pipeline for a URL, as a direct message would
//! cargo run --bin fairyctl -- process "https://x.com/user/status/1"
//!
//! # Same, with group-chat semantics (silence instead of refusals)
//! cargo run --bin fairyctl -- process --group "https://example.com/page"
//!
//! # Show the embed-friendly alternate for a URL
//! cargo run --bin fairyctl -- rewrite "https://youtu.be/abc123"
//!
//! # Show the allow-list verdict for a URL
//! cargo run --bin fairyctl -- check "https://www.vk.com/video1"
//! ```
//!
//! # Environment Variables
//!
//! Same as the server (see `url_fairy::config`), except that `BOT_TOKEN` is
//! not required.

use url_fairy::application::services::{DomainPolicy, LinkRewriter};
use url_fairy::config::Config;
use url_fairy::domain::entities::ProcessingOutcome;
use url_fairy::server::build_relay;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::EnvFilter;

/// CLI tool for the URL Fairy relay.
#[derive(Parser)]
#[command(name = "fairyctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline for a URL and print the reply
    Process {
        url: String,

        /// Use group-chat semantics
        #[arg(short, long)]
        group: bool,
    },

    /// Print the rewritten link for a URL (no network access)
    Rewrite { url: String },

    /// Print the download allow-list verdict for a URL (no network access)
    Check { url: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    config.validate_pipeline()?;

    match cli.command {
        Commands::Process { url, group } => handle_process(&config, url, group).await?,
        Commands::Rewrite { url } => handle_rewrite(&url),
        Commands::Check { url } => handle_check(&config, &url),
    }

    Ok(())
}

/// Runs the orchestrator once; pipeline logs go to stderr.
async fn handle_process(config: &Config, url: String, group: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .with_writer(std::io::stderr)
        .init();

    let relay = build_relay(config).await?;

    let context = if group { "group" } else { "direct" };
    println!(
        "{} {} ({})",
        "🧚 Processing".bright_blue().bold(),
        url.cyan(),
        context.bright_black()
    );
    println!();

    let outcomes = relay.orchestrator.process_all(&[url], group).await;

    for outcome in outcomes {
        let label = match &outcome {
            ProcessingOutcome::Downloaded { .. } => outcome.kind().green(),
            ProcessingOutcome::Error(_) => outcome.kind().red(),
            ProcessingOutcome::Silent => outcome.kind().bright_black(),
            _ => outcome.kind().yellow(),
        };

        println!("  Outcome: {}", label.bold());

        match outcome.text() {
            Some(text) => {
                println!();
                for line in text.lines() {
                    println!("  {line}");
                }
            }
            None => println!("  {}", "(no reply would be sent)".bright_black()),
        }
    }

    println!();
    Ok(())
}

fn handle_rewrite(url: &str) {
    let rewriter = LinkRewriter::new();

    println!("{}", "🔗 Rewrite".bright_blue().bold());
    println!();
    println!("  Input:    {}", url.cyan());

    if let Some(alternative) = rewriter.youtube_alternative(url) {
        println!("  YouTube:  {}", alternative.green());
    }

    let rewritten = rewriter.rewrite(url);
    if rewritten == url {
        println!("  Rewrite:  {}", "no matching rule".bright_black());
    } else {
        println!("  Rewrite:  {}", rewritten.green());
    }

    println!();
}

fn handle_check(config: &Config, url: &str) {
    let policy = DomainPolicy::new(&config.download_allowed_domains);
    let decision = policy.evaluate(url);

    println!("{}", "🛂 Domain check".bright_blue().bold());
    println!();
    println!("  URL:      {}", url.cyan());
    println!(
        "  Host:     {}",
        if decision.host.is_empty() {
            "(none)".bright_black()
        } else {
            decision.host.as_str().normal()
        }
    );
    println!(
        "  Verdict:  {}",
        if decision.allowed {
            "ALLOWED".green().bold()
        } else {
            "DENIED".red().bold()
        }
    );

    if policy.is_empty() {
        println!();
        println!(
            "{}",
            "⚠️  DOWNLOAD_ALLOWED_DOMAINS is empty, nothing is downloadable".yellow()
        );
    } else {
        let entries: Vec<&str> = policy.entries().collect();
        println!("  Allowed:  {}", entries.join(", ").bright_black());
    }

    println!();
}
