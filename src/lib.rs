pub mod config;
pub mod crawler;
pub mod enricher;
pub mod error;
pub mod listing;
pub mod logger;
pub mod record;
pub mod table;
pub mod utils;

pub use crawler::{FixedDelay, MonsterCrawler, Pacing};
pub use enricher::{EnrichOptions, EnrichReport, enrich_details};
pub use error::{RowFailure, ScrapeError};
pub use listing::{ListingOptions, ListingReport, scrape_listing};
pub use record::{AbilityScores, MonsterRecord};
