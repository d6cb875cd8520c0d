//! letterboxd-trakt main entry point
//!
//! This is the command-line interface for exporting a Letterboxd watch history
//! and importing it into Trakt.

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use letterboxd_trakt::config::{load_config_with_hash, Config, Credentials, ACCESS_TOKEN_VAR};
use letterboxd_trakt::crawler::{build_http_client, Crawler, HttpFetcher};
use letterboxd_trakt::output::{
    aggregate_records, print_export_summary, print_import_summary, write_csv,
};
use letterboxd_trakt::trakt::{authorize_url, exchange_code, Importer, TraktClient};
use letterboxd_trakt::url::validate_username;
use letterboxd_trakt::MigrationError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// letterboxd-trakt: move a Letterboxd watch history into Trakt
///
/// Exports the watched films of a public Letterboxd profile to CSV, resolving
/// each film to its TMDb identifier, and imports such a CSV into a Trakt
/// account's watch history.
#[derive(Parser, Debug)]
#[command(name = "letterboxd-trakt")]
#[command(version)]
#[command(about = "Move a Letterboxd watch history into Trakt", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape a profile's watched films into a CSV file
    Export {
        /// Letterboxd username (prompted for when omitted)
        username: Option<String>,

        /// Where to write the CSV (defaults to the configured path)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Also crawl the ratings listing and fill the Rating column
        #[arg(long)]
        with_ratings: bool,
    },

    /// Add the films of a watch history CSV to Trakt
    Import {
        /// CSV to import (prompted for when omitted)
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// Report what would be added without writing to Trakt
        #[arg(long)]
        dry_run: bool,
    },

    /// Obtain a Trakt access token through the manual-code OAuth flow
    Auth,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_ref())?;
    let credentials = Credentials::from_env();
    tracing::debug!("Credentials: {:?}", credentials);

    let result = match cli.command {
        Command::Export {
            username,
            output,
            with_ratings,
        } => handle_export(&config, username, output, with_ratings).await,
        Command::Import { file, dry_run } => {
            handle_import(&config, &credentials, file, dry_run).await
        }
        Command::Auth => handle_auth(&config, &credentials).await,
    };

    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }
    result
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("letterboxd_trakt=info,warn"),
            1 => EnvFilter::new("letterboxd_trakt=debug,info"),
            2 => EnvFilter::new("letterboxd_trakt=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file when one was given, defaults otherwise
fn load_configuration(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok(config)
}

fn theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

/// Handles `export`: crawl, aggregate, write the CSV
async fn handle_export(
    config: &Config,
    username: Option<String>,
    output: Option<PathBuf>,
    with_ratings: bool,
) -> anyhow::Result<()> {
    let crawler = Crawler::from_config(config)?;
    let username = match username {
        Some(name) => validate_username(&name)?.to_string(),
        None => prompt_username(&crawler).await?,
    };
    let csv_path = output.unwrap_or_else(|| PathBuf::from(&config.output.csv_path));

    println!(
        "{} Exporting watched films of {}",
        style("→").cyan(),
        style(&username).bold()
    );

    let report = crawler
        .export(&username, with_ratings)
        .await
        .with_context(|| format!("Export of '{}' failed", username))?;

    let today = Local::now().date_naive();
    let records = aggregate_records(&report.details, report.ratings.as_ref(), today);
    write_csv(&csv_path, &records)
        .with_context(|| format!("Failed to write {}", csv_path.display()))?;

    print_export_summary(&report, &csv_path);
    Ok(())
}

/// Asks for a username until it names a readable profile
async fn prompt_username(crawler: &Crawler<HttpFetcher>) -> anyhow::Result<String> {
    loop {
        let name: String = Input::with_theme(&theme())
            .with_prompt("Letterboxd username")
            .interact_text()?;

        match crawler.check_profile(&name).await {
            Ok(_) => return Ok(name.trim().to_string()),
            Err(e @ MigrationError::InvalidUsername(_)) => {
                println!("{} {}", style("✗").red(), e);
            }
            Err(e) if e.is_network() => {
                println!(
                    "{} Cannot open the profile of '{}' ({}). Please try again.",
                    style("✗").red(),
                    name.trim(),
                    e
                );
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Handles `import`: read the CSV, resolve films, write or report
async fn handle_import(
    config: &Config,
    credentials: &Credentials,
    file: Option<PathBuf>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let (path, dry_run) = match file {
        Some(path) => (path, dry_run),
        None => {
            let path: String = Input::with_theme(&theme())
                .with_prompt("Watch history CSV")
                .default(config.output.csv_path.clone())
                .interact_text()?;
            let dry_run = dry_run
                || Confirm::with_theme(&theme())
                    .with_prompt("Dry run (nothing is sent to Trakt)?")
                    .default(false)
                    .interact()?;
            (PathBuf::from(path.trim()), dry_run)
        }
    };

    let trakt = if dry_run {
        None
    } else {
        let auth = credentials.require_api()?;
        Some(TraktClient::new(&config.trakt, &auth)?)
    };

    println!(
        "{} Importing {}{}",
        style("→").cyan(),
        style(path.display()).bold(),
        if dry_run { " (dry run)" } else { "" }
    );

    let importer = Importer::new(Crawler::from_config(config)?, trakt);
    let report = importer
        .import_file(&path, dry_run)
        .await
        .with_context(|| format!("Import of {} failed", path.display()))?;

    print_import_summary(&report);
    Ok(())
}

/// Handles `auth`: walk the operator through the manual-code OAuth flow
async fn handle_auth(config: &Config, credentials: &Credentials) -> anyhow::Result<()> {
    let oauth = credentials.require_oauth()?;
    let url = authorize_url(&config.trakt, &oauth.client_id)?;

    println!("{}", style("Trakt authorization").bold());
    println!("\nOpen this URL, approve the application and copy the code shown:\n");
    println!("  {}\n", style(&url).underlined());

    let code: String = Input::with_theme(&theme())
        .with_prompt("Authorization code")
        .interact_text()?;

    let http = build_http_client(&config.user_agent, &config.scraper)?;
    let token = exchange_code(&http, &config.trakt, &oauth, &code)
        .await
        .context("Token exchange failed")?;

    println!("\n{} Access token obtained", style("✓").green());
    println!("  {}", token.access_token);
    if let Some(refresh) = &token.refresh_token {
        println!("  Refresh token: {}", refresh);
    }
    println!(
        "\nSet {}={} in your environment or .env file before importing.",
        ACCESS_TOKEN_VAR, token.access_token
    );

    Ok(())
}
