use std::path::PathBuf;

use tokio::fs;
use tracing::{info, instrument, warn};

use crate::config::Settings;
use crate::crawler::MonsterCrawler;
use crate::error::{Result, RowFailure, ScrapeError};
use crate::table::{carry_forward, read_table, write_table};

#[derive(Debug, Clone)]
pub struct ListingOptions {
    pub url: String,
    pub output: PathBuf,
    pub merge_existing: bool,
}

impl From<&Settings> for ListingOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            url: settings.listing_url.clone(),
            output: settings.table_path.clone(),
            merge_existing: settings.merge_existing,
        }
    }
}

#[derive(Debug, Default)]
pub struct ListingReport {
    pub written: usize,
    pub skipped: Vec<RowFailure>,
    pub carried_forward: usize,
}

/// Fetches the listing page and replaces the table at `options.output`.
///
/// Nothing is written unless the page was fetched and yielded at least one
/// row. Malformed rows are left out and listed in the report.
#[instrument(skip_all, fields(url = %options.url))]
pub async fn scrape_listing(crawler: &MonsterCrawler, options: &ListingOptions) -> Result<ListingReport> {
    info!("fetching monster listing");
    let page = crawler.listing(&options.url).await?;

    for failure in &page.failures {
        warn!(row = %failure.row, reason = %failure.reason, "skipping malformed row");
    }
    if page.records.is_empty() {
        return Err(ScrapeError::parse("listing contained no usable monster rows"));
    }

    let mut records = page.records;
    let mut carried_forward = 0;
    if options.merge_existing && fs::try_exists(&options.output).await.unwrap_or(false) {
        match read_table(&options.output).await {
            Ok(prior) => carried_forward = carry_forward(&mut records, &prior),
            Err(e) => warn!("previous table not merged: {}", e),
        }
    }

    write_table(&options.output, &records).await?;
    info!(
        "wrote {} monsters to {} ({} with carried-over scores)",
        records.len(),
        options.output.display(),
        carried_forward
    );

    Ok(ListingReport {
        written: records.len(),
        skipped: page.failures,
        carried_forward,
    })
}
