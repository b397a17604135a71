use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use base64::Engine;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use cinnabar::analysis::result::AnalysisResult;
use cinnabar::analysis::scanner;
use cinnabar::config::Config;
use cinnabar::gemini::client::GeminiClient;
use cinnabar::news;
use cinnabar::output::terminal;
use cinnabar::stats::ScanStats;
use cinnabar::store::{JsonFileStore, Store};

/// Cinnabar: AI-assisted risk scanning for URLs and QR codes.
///
/// Paste a link or point at a QR image; the analysis engine returns a
/// risk verdict before you click.
#[derive(Parser)]
#[command(name = "cinnabar", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a URL for phishing, malware, and scam signals
    Scan {
        /// The link to analyze (scheme optional, e.g. bit.ly/promo)
        url: String,
    },

    /// Extract the URL from a QR code image and scan it
    ScanQr {
        /// Path to the QR image file (JPEG or PNG)
        image: PathBuf,
    },

    /// Show today's security tips
    Tips,

    /// Show or edit the scam-news feed
    News {
        #[command(subcommand)]
        action: NewsAction,
    },

    /// Show usage counters
    Stats,
}

#[derive(Subcommand)]
enum NewsAction {
    /// List published scam alerts
    List,

    /// Publish a new scam alert (requires the admin password)
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        password: String,
    },

    /// Remove a scam alert by id (requires the admin password)
    Remove {
        id: String,

        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cinnabar=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { url } => {
            let config = Config::load()?;
            config.require_api_key()?;
            let client = create_client(&config)?;
            let store = open_store(&config)?;

            let result = with_spinner("Querying threat intelligence...", async {
                scanner::scan_url(&client, &url).await
            })
            .await?;

            record_scan(store.as_ref(), &result).await?;
            terminal::display_result(&result);
        }

        Commands::ScanQr { image } => {
            let config = Config::load()?;
            config.require_api_key()?;
            let client = create_client(&config)?;
            let store = open_store(&config)?;

            let bytes = std::fs::read(&image)
                .with_context(|| format!("Failed to read image file {}", image.display()))?;
            let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);

            let result = with_spinner("Reading QR code...", async {
                scanner::scan_qr_image(&client, &encoded).await
            })
            .await?;

            record_scan(store.as_ref(), &result).await?;
            terminal::display_result(&result);
        }

        Commands::Tips => {
            let config = Config::load()?;
            config.require_api_key()?;
            let client = create_client(&config)?;

            let tips = with_spinner("Fetching today's tips...", async {
                scanner::daily_tips(&client).await
            })
            .await;
            terminal::display_tips(&tips);
        }

        Commands::News { action } => {
            let config = Config::load()?;
            let store = open_store(&config)?;

            match action {
                NewsAction::List => {
                    let entries = news::load_news(store.as_ref()).await?;
                    terminal::display_news(&entries);
                }
                NewsAction::Add {
                    title,
                    description,
                    author,
                    password,
                } => {
                    config.require_admin(&password)?;
                    let entry = news::add_entry(
                        store.as_ref(),
                        &title,
                        &description,
                        author.as_deref(),
                    )
                    .await?;
                    println!("Published alert \"{}\" (id {})", entry.title, entry.id);
                }
                NewsAction::Remove { id, password } => {
                    config.require_admin(&password)?;
                    if news::remove_entry(store.as_ref(), &id).await? {
                        println!("Removed alert {id}");
                    } else {
                        println!("No alert with id {id}");
                    }
                }
            }
        }

        Commands::Stats => {
            let config = Config::load()?;
            let store = open_store(&config)?;
            let stats = ScanStats::load(store.as_ref()).await?;
            terminal::display_stats(&stats);
        }
    }

    Ok(())
}

fn create_client(config: &Config) -> Result<GeminiClient> {
    GeminiClient::new(
        config.gemini_api_key.clone(),
        &config.api_url,
        &config.model,
    )
}

fn open_store(config: &Config) -> Result<Box<dyn Store>> {
    Ok(Box::new(JsonFileStore::open(&config.store_path)?))
}

/// Update the usage counters after a completed scan. Counting is the CLI's
/// job — the orchestrator stays side-effect free.
async fn record_scan(store: &dyn Store, result: &AnalysisResult) -> Result<()> {
    let mut stats = ScanStats::load(store).await?;
    stats.record(result.risk_level);
    stats.save(store).await
}

/// Run a future behind a terminal spinner.
async fn with_spinner<T>(message: &str, fut: impl std::future::Future<Output = T>) -> T {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let output = fut.await;

    spinner.finish_and_clear();
    output
}
