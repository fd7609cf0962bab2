//! Listing Scraper CLI
//!
//! Local execution entry point. For AWS Lambda, use `listing-scraper-lambda`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use listing_scraper::{
    config::load_config,
    error::Result,
    indexing::IndexingBackend,
    models::Config,
    pipeline::{self, ErrorPayload, ListingRequest},
    services::{IndexingDispatcher, ListingScraper},
};

/// Listing Scraper - real-estate search results to indexed listings
#[derive(Parser, Debug)]
#[command(
    name = "listing-scraper",
    version,
    about = "Scrapes real-estate search results and indexes each listing"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape a page and print its listings without indexing them
    Scrape {
        url: String,

        /// Base URL for relative links (default: the page URL)
        #[arg(long)]
        base_url: Option<String>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Scrape a page and index every listing
    Index {
        url: String,

        /// Owner of the created container
        #[arg(long)]
        owner: String,

        /// Agent the listings belong to
        #[arg(long)]
        agent: String,

        /// Base URL for relative links (default: the page URL)
        #[arg(long)]
        base_url: Option<String>,
    },

    /// List the active layouts in priority order
    Layouts,

    /// Validate configuration files
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli.config)?;
    log::debug!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Scrape {
            url,
            base_url,
            json,
        } => {
            let scraper = ListingScraper::new(&config)?;
            let base_url = base_url.unwrap_or_else(|| url.clone());
            let batch = scraper
                .scrape_with_base(&url, &base_url)
                .await
                .inspect_err(|e| log::error!("Error scraping {}: {}", url, e))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&batch)?);
            } else {
                for record in &batch {
                    println!("{}\n", record.description());
                }
            }
            log::info!("{} properties found", batch.len());
        }

        Command::Index {
            url,
            owner,
            agent,
            base_url,
        } => {
            let request = ListingRequest {
                owner_id: owner,
                agent_id: agent,
                url,
                base_url,
            };
            run_index(&config, &request).await?;
        }

        Command::Layouts => {
            for (position, layout) in config.catalog().iter().enumerate() {
                println!("{}. {}", position + 1, layout.name);
                println!("   card:       {}", layout.card_selector);
                println!("   title:      {}", layout.title_selector);
                println!("   price:      {}", layout.price_selector);
                println!("   currency:   {}", layout.currency().unwrap_or("-"));
                println!("   address:    {}", layout.address_selector);
                println!("   attributes: {}", layout.attributes_selector);
                println!("   link:       {}", layout.link_selector);
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            ListingScraper::new(&config)?;
            log::info!(
                "✓ Config OK ({} layouts, indexing {})",
                config.catalog().len(),
                config
                    .indexing
                    .endpoint
                    .as_deref()
                    .unwrap_or("to local storage")
            );
        }
    }

    Ok(())
}

/// Run the full pipeline and wait for the background dispatch to settle.
async fn run_index(config: &Config, request: &ListingRequest) -> Result<()> {
    let scraper = ListingScraper::new(config)?;
    let backend = IndexingBackend::from_config(&config.indexing, scraper.client().clone())?;
    let dispatcher = IndexingDispatcher::with_limit(config.indexing.max_concurrent);

    let run = match pipeline::run_listing(&scraper, backend, dispatcher, request).await {
        Ok(run) => run,
        Err(e) => {
            log::error!("Listing run failed: {}", e);
            println!("{}", serde_json::to_string_pretty(&ErrorPayload::from(&e))?);
            return Err(e);
        }
    };

    println!("{}", serde_json::to_string_pretty(&run.accepted)?);

    // The process would exit under a detached task, so wait here.
    match run.dispatch.await {
        Ok(outcome) if outcome.is_complete_success() => log::info!(
            "Indexing finished for source {}: all {} properties indexed",
            run.container_id,
            outcome.total
        ),
        Ok(outcome) => log::warn!(
            "Indexing finished for source {}: {} of {} properties failed",
            run.container_id,
            outcome.failed(),
            outcome.total
        ),
        Err(e) => log::error!("Indexing task for source {} failed: {}", run.container_id, e),
    }

    Ok(())
}
