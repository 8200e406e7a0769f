//! Max-score merge of record stores.
//!
//! # Responsibility
//! - Combine stores so each name keeps its highest score.
//! - Persist the result as a new sorted store file and return a store
//!   bound to it.
//!
//! # Invariants
//! - Inputs are read-only; their files and caches are never modified.
//! - Output names are deterministic: `combined_{a}_{b}.txt` for pairs,
//!   `multi_combined_{base}.txt` for folds.
//! - The result does not depend on input order.

use crate::model::record::{Record, RecordMap};
use crate::repo::record_store::{RecordStore, StoreError, StoreResult};
use log::{error, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Writes merged stores into one output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMerger {
    output_dir: PathBuf,
}

impl RecordMerger {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Merger writing next to `path` (its parent directory, or `.`).
    pub fn beside(path: &Path) -> Self {
        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Self::new(dir)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Merges two stores into `combined_{a}_{b}.txt`.
    pub fn merge(&self, a: &RecordStore, b: &RecordStore) -> StoreResult<RecordStore> {
        let file_name = format!("combined_{}_{}.txt", a.subject(), b.subject());
        self.merge_into(&file_name, a, &[b])
    }

    /// Folds `base` and every store in `others` into
    /// `multi_combined_{base}.txt`.
    pub fn merge_all(&self, base: &RecordStore, others: &[&RecordStore]) -> StoreResult<RecordStore> {
        let file_name = format!("multi_combined_{}.txt", base.subject());
        self.merge_into(&file_name, base, others)
    }

    fn merge_into(
        &self,
        file_name: &str,
        base: &RecordStore,
        others: &[&RecordStore],
    ) -> StoreResult<RecordStore> {
        let started_at = Instant::now();
        let mut maps = Vec::with_capacity(others.len() + 1);
        maps.push(base.records()?);
        for other in others {
            maps.push(other.records()?);
        }

        let merged = merge_maps(maps);
        let target = self.output_dir.join(file_name);
        if let Err(err) = write_records(&target, &merged) {
            error!(
                "event=store_merge module=service status=error error_code=write_failed path={} error={}",
                target.display(),
                err
            );
            return Err(err);
        }

        info!(
            "event=store_merge module=service status=ok inputs={} records={} path={} duration_ms={}",
            others.len() + 1,
            merged.len(),
            target.display(),
            started_at.elapsed().as_millis()
        );
        Ok(RecordStore::new(target))
    }
}

/// Combines record maps, keeping the maximum score for every name.
pub fn merge_maps<'a>(maps: impl IntoIterator<Item = &'a RecordMap>) -> RecordMap {
    let mut merged = RecordMap::new();
    for map in maps {
        for (name, &score) in map {
            merged
                .entry(name.clone())
                .and_modify(|best| *best = (*best).max(score))
                .or_insert(score);
        }
    }
    merged
}

fn write_records(path: &Path, records: &RecordMap) -> StoreResult<()> {
    let file = File::create(path).map_err(|err| StoreError::io(path, err))?;
    let mut writer = BufWriter::new(file);
    for (name, score) in records {
        writeln!(writer, "{}", Record::new(name.clone(), *score).to_line())
            .map_err(|err| StoreError::io(path, err))?;
    }
    writer.flush().map_err(|err| StoreError::io(path, err))
}
