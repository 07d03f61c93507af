use std::path::PathBuf;

use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

use crate::config::Settings;
use crate::crawler::{MonsterCrawler, Pacing};
use crate::error::{Result, RowFailure, ScrapeError};
use crate::record::MonsterRecord;
use crate::table::{read_table, write_table};

#[derive(Debug, Clone)]
pub struct EnrichOptions {
    pub table: PathBuf,
    /// Stop after this many eligible records have been attempted.
    pub limit: Option<usize>,
}

impl From<&Settings> for EnrichOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            table: settings.table_path.clone(),
            limit: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct EnrichReport {
    pub attempted: usize,
    pub enriched: usize,
    pub failures: Vec<RowFailure>,
}

/// Fills in ability scores for every record that has a detail link and no
/// `str` value yet.
///
/// The table is rewritten after each enriched record, so the run can be
/// stopped between records and resumed later. A failed record is reported
/// and left untouched; only a missing table or a failed write aborts the run.
#[instrument(skip_all, fields(table = %options.table.display()))]
pub async fn enrich_details<P: Pacing>(
    crawler: &MonsterCrawler,
    options: &EnrichOptions,
    pacing: &mut P,
) -> Result<EnrichReport> {
    let mut records = read_table(&options.table).await?;
    let pending = records.iter().filter(|r| r.is_enrichment_eligible()).count();
    info!("{} of {} monsters need details", pending, records.len());

    let mut report = EnrichReport::default();

    for index in 0..records.len() {
        let Some(url) = eligible_url(&records[index]) else {
            continue;
        };
        if options.limit.is_some_and(|limit| report.attempted >= limit) {
            info!("limit of {} reached, stopping", report.attempted);
            break;
        }
        report.attempted += 1;

        let name = records[index].name.clone();
        match crawler.ability_scores(&url).await {
            Ok(scores) => {
                records[index].set_ability_scores(scores);
                write_table(&options.table, &records).await?;
                report.enriched += 1;
                info!(monster = %name, "enriched");
            }
            Err(e @ ScrapeError::Transport { .. }) => {
                warn!(monster = %name, "connection error: {}", e);
                report.failures.push(RowFailure::new(name, &e));
            }
            Err(e) => {
                error!(monster = %name, "could not read detail page: {}", e);
                report.failures.push(RowFailure::new(name, &e));
            }
        }

        let delay = pacing.next_delay();
        if !delay.is_zero() {
            debug!("sleeping {:?}", delay);
            sleep(delay).await;
        }
    }

    info!(
        "details done: {} attempted, {} enriched, {} failed",
        report.attempted,
        report.enriched,
        report.failures.len()
    );
    Ok(report)
}

fn eligible_url(record: &MonsterRecord) -> Option<String> {
    if record.is_enrichment_eligible() {
        record.detail_url().map(str::to_owned)
    } else {
        None
    }
}
