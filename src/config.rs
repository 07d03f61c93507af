use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

pub const DEFAULT_LISTING_URL: &str = "https://www.aidedd.org/dnd-filters/monsters.php";
pub const DEFAULT_TABLE_PATH: &str = "data/dnd_data.csv";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_DELAY_SECS: u64 = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Looked up in the working directory when no `--config` is given.
static CONFIG_FILE_NAME: &str = "monster_scrape";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub listing_url: String,
    pub table_path: PathBuf,
    pub user_agent: String,
    pub delay_secs: u64,
    pub timeout_secs: u64,
    /// Keep ability scores from the previous table when re-running the listing.
    pub merge_existing: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            table_path: PathBuf::from(DEFAULT_TABLE_PATH),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            delay_secs: DEFAULT_DELAY_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            merge_existing: true,
        }
    }
}

impl Settings {
    /// Defaults, overlaid by `monster_scrape.toml` if present, or by `path`
    /// (which then must exist).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path)
                .format(config::FileFormat::Toml)
                .required(true),
            None => config::File::with_name(CONFIG_FILE_NAME)
                .format(config::FileFormat::Toml)
                .required(false),
        };

        config::Config::builder()
            .set_default("listing_url", DEFAULT_LISTING_URL)?
            .set_default("table_path", DEFAULT_TABLE_PATH)?
            .set_default("user_agent", DEFAULT_USER_AGENT)?
            .set_default("delay_secs", DEFAULT_DELAY_SECS)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("merge_existing", true)?
            .add_source(file)
            .build()?
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("failed to read settings: {}", e))
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
