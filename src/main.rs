//! linktree CLI
//!
//! Prints a Linktree profile and its links, sensitive-content links included.

use anyhow::{Context, Result};
use clap::Parser;
use linktree_scraper::client::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use linktree_scraper::output::{render, Format};
use linktree_scraper::{Linktree, LinktreeConfig, LinktreeError, Target};
use std::path::PathBuf;
use tokio::fs;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

#[derive(Parser)]
#[command(name = "linktree")]
#[command(version)]
#[command(about = "Scrape a Linktree profile and its links")]
#[command(long_about = "Scrape a Linktree profile and its links.\n\nLinks hidden behind the sensitive-content warning are unlocked automatically.")]
struct Cli {
    /// Linktree username, or a profile URL
    #[arg(value_name = "USERNAME_OR_URL")]
    target: Option<String>,

    /// Parse a saved profile page instead of fetching it
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: Format,

    /// Service root used for profile and unlock requests
    #[arg(long, env = "LINKTREE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: Url,

    /// User agent sent with unlock requests
    #[arg(long, env = "LINKTREE_USER_AGENT", default_value = DEFAULT_USER_AGENT, hide_default_value = true)]
    user_agent: String,

    /// Debug logging to stderr (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let client = Linktree::with_config(LinktreeConfig {
        base_url: cli.base_url.clone(),
        user_agent: cli.user_agent.clone(),
    });

    let target = cli.target.as_deref().map(Target::parse);
    let (url, username) = match &target {
        Some(Target::Url(url)) => (Some(url.as_str()), None),
        Some(Target::Username(name)) => (None, Some(name.as_str())),
        None => (None, None),
    };

    let result = match &cli.html {
        Some(path) => {
            let source = fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
            client.user_info_from_source(&source, url).await
        }
        None => client.user_info(url, username).await,
    };

    let user = match result {
        Ok(user) => user,
        Err(LinktreeError::MissingIdentifier) => {
            eprintln!("Username or url is needed!");
            eprintln!("Usage:");
            eprintln!("  linktree <username>            Scrape linktr.ee/<username>");
            eprintln!("  linktree <url>                 Scrape a profile URL");
            eprintln!("  linktree --html <file.html>    Parse a saved profile page");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", render(&user, cli.format)?);

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "linktree_scraper=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
