use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, instrument};

use crate::error::{Result, ScrapeError};
use crate::record::{ABILITY_COLUMNS, AbilityScores, BASE_COLUMNS, MonsterRecord};

/// Reads the persisted table.
///
/// Missing file, unreadable rows or a header without one of the base columns
/// are all `ScrapeError::State`. The ability-score columns are optional so
/// that tables written before any enrichment still load.
#[instrument(skip_all, fields(path = %path.display()))]
pub async fn read_table(path: &Path) -> Result<Vec<MonsterRecord>> {
    let bytes = fs::read(path)
        .await
        .map_err(|e| ScrapeError::state(path, e))?;

    let mut reader = csv::Reader::from_reader(bytes.as_slice());
    let headers = reader
        .headers()
        .map_err(|e| ScrapeError::state(path, e))?
        .clone();

    let missing: Vec<&str> = BASE_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h.trim() == *col))
        .collect();
    if !missing.is_empty() {
        return Err(ScrapeError::state(
            path,
            format!("missing columns: {}", missing.join(", ")),
        ));
    }

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<MonsterRecord>().enumerate() {
        let record = row.map_err(|e| ScrapeError::state(path, format!("row {}: {}", index + 1, e)))?;
        records.push(record);
    }

    debug!("read {} records", records.len());
    Ok(records)
}

/// Replaces the table at `path` with `records`.
///
/// The rows go to a sibling temp file first, which is then renamed over the
/// target, so readers only ever see a complete table.
#[instrument(skip_all, fields(path = %path.display(), rows = records.len()))]
pub async fn write_table(path: &Path, records: &[MonsterRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(BASE_COLUMNS.iter().chain(ABILITY_COLUMNS.iter()))?;
    for record in records {
        writer.serialize(record)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ScrapeError::Io(e.into_error()))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let tmp = temp_path(path);
    fs::write(&tmp, &bytes).await?;
    fs::rename(&tmp, path).await?;

    debug!("table written");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("table"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Copies ability scores from `prior` onto `fresh` rows with the same name.
///
/// Names are not guaranteed unique; the first prior row with a given name
/// wins. Rows that already carry scores are left alone. Returns how many rows
/// received scores.
pub fn carry_forward(fresh: &mut [MonsterRecord], prior: &[MonsterRecord]) -> usize {
    let mut known: HashMap<&str, AbilityScores> = HashMap::new();
    for record in prior {
        if let Some(scores) = record.ability_scores().filter(|_| record.is_enriched()) {
            known.entry(record.name.as_str()).or_insert(scores);
        }
    }

    let mut carried = 0;
    for record in fresh.iter_mut().filter(|r| !r.is_enriched()) {
        if let Some(scores) = known.get(record.name.as_str()) {
            record.set_ability_scores(scores.clone());
            carried += 1;
        }
    }
    carried
}
