use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use dnd_monster_scrape::config::Settings;
use dnd_monster_scrape::utils::format_elapsed;
use dnd_monster_scrape::{
    EnrichOptions, FixedDelay, ListingOptions, MonsterCrawler, enrich_details, logger,
    scrape_listing,
};

/// Scrapes the aidedd.org monster table into a CSV file.
#[derive(Parser)]
#[command(name = "monster-scrape", version)]
struct Cli {
    /// Settings file (TOML). Defaults to ./monster_scrape.toml if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the monster listing and write the table, replacing any previous one.
    Listing {
        /// Where to write the table.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Listing page to fetch.
        #[arg(long)]
        url: Option<String>,
        /// Drop ability scores gathered by earlier runs.
        #[arg(long)]
        fresh: bool,
    },
    /// Fill in ability scores from each monster's detail page.
    Details {
        /// Table written by `listing`.
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Seconds to wait after each detail page.
        #[arg(short, long)]
        delay: Option<u64>,
        /// Attempt at most this many monsters.
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logger::init();
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    let start = Instant::now();

    match cli.command {
        Command::Listing { output, url, fresh } => {
            if let Some(output) = output {
                settings.table_path = output;
            }
            if let Some(url) = url {
                settings.listing_url = url;
            }
            if fresh {
                settings.merge_existing = false;
            }

            let crawler = MonsterCrawler::new(&settings)?;
            let report = scrape_listing(&crawler, &ListingOptions::from(&settings))
                .await
                .context("listing scrape failed, table left unchanged")?;
            if !report.skipped.is_empty() {
                warn!("{} rows skipped", report.skipped.len());
            }
        }
        Command::Details {
            input,
            delay,
            limit,
        } => {
            if let Some(input) = input {
                settings.table_path = input;
            }
            if let Some(delay) = delay {
                settings.delay_secs = delay;
            }

            let crawler = MonsterCrawler::new(&settings)?;
            let options = EnrichOptions {
                limit,
                ..EnrichOptions::from(&settings)
            };
            let mut pacing = FixedDelay::new(settings.delay());
            let report = enrich_details(&crawler, &options, &mut pacing)
                .await
                .context("detail scrape aborted")?;
            for failure in &report.failures {
                warn!("not enriched: {} ({})", failure.row, failure.reason);
            }
        }
    }

    info!("finished in {}", format_elapsed(start.elapsed()));
    Ok(())
}
