pub mod downloader;
pub mod pacing;
pub mod parser;

use tracing::instrument;
use url::Url;

use crate::config::Settings;
use crate::error::{Result, ScrapeError};
use crate::record::AbilityScores;

pub use downloader::Downloader;
pub use pacing::{FixedDelay, Pacing};
pub use parser::{ListingPage, Parser};

/// Fetches site pages and hands them to the parser.
pub struct MonsterCrawler {
    parser: Parser,
    downloader: Downloader,
}

impl MonsterCrawler {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            parser: Parser,
            downloader: Downloader::new(&settings.user_agent, settings.timeout())?,
        })
    }

    #[instrument(skip(self))]
    pub async fn listing(&self, listing_url: &str) -> Result<ListingPage> {
        let base = Url::parse(listing_url)
            .map_err(|e| ScrapeError::transport(listing_url, format!("invalid url: {}", e)))?;
        let html = self.downloader.html(listing_url).await?;
        Ok(self.parser.listing(&html, &base))
    }

    #[instrument(skip(self))]
    pub async fn ability_scores(&self, detail_url: &str) -> Result<AbilityScores> {
        let html = self.downloader.html(detail_url).await?;
        self.parser.ability_scores(&html)
    }
}
