//! File-backed record store.
//!
//! # Responsibility
//! - Own one `name, score` text file and expose its records read-only.
//! - Load the file at most once per bound path and cache the result.
//!
//! # Invariants
//! - The cache is cleared whenever the backing path changes.
//! - A failed load is never cached; the next read retries from disk.
//! - Stores are never mutated in place. Merges write a new file and return
//!   a new store bound to it.

use crate::model::record::{Record, RecordMap};
use crate::service::merge_service::RecordMerger;
use log::{debug, error, info};
use once_cell::unsync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

const SUBJECT_FALLBACK: &str = "records";

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for record store loading, rebinding and merging.
#[derive(Debug)]
pub enum StoreError {
    /// Path rebinding targeted a file that does not exist.
    NotFound(PathBuf),
    /// A non-blank line could not be read as `name, score`.
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "file `{}` does not exist", path.display()),
            Self::Parse { path, line, reason } => {
                write!(f, "{}:{line}: {reason}", path.display())
            }
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::NotFound(_) => None,
            Self::Parse { .. } => None,
        }
    }
}

/// Student record store bound to one text file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    records: OnceCell<RecordMap>,
}

impl RecordStore {
    /// Binds a store to `path` without touching the file system.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: OnceCell::new(),
        }
    }

    /// Binds a store to `{dir}/{subject}.txt`.
    pub fn from_subject(dir: impl AsRef<Path>, subject: &str) -> Self {
        Self::new(dir.as_ref().join(format!("{subject}.txt")))
    }

    /// Returns whether `path` names an existing regular file.
    pub fn file_exists(path: impl AsRef<Path>) -> bool {
        path.as_ref().is_file()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Subject label derived from the file stem (`math.txt` -> `math`).
    pub fn subject(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| SUBJECT_FALLBACK.to_string())
    }

    /// Rebinds the store to another existing file and drops the cache.
    ///
    /// # Errors
    /// - `StoreError::NotFound` when `new_path` does not exist. The store
    ///   keeps its previous path and cache in that case.
    pub fn set_path(&mut self, new_path: impl Into<PathBuf>) -> StoreResult<()> {
        let new_path = new_path.into();
        if !new_path.exists() {
            error!(
                "event=store_rebind module=repo status=error error_code=not_found path={}",
                new_path.display()
            );
            return Err(StoreError::NotFound(new_path));
        }

        info!(
            "event=store_rebind module=repo status=ok from={} to={}",
            self.path.display(),
            new_path.display()
        );
        self.path = new_path;
        self.records = OnceCell::new();
        Ok(())
    }

    /// Returns the cached records, loading the backing file on first use.
    pub fn records(&self) -> StoreResult<&RecordMap> {
        self.records.get_or_try_init(|| load_records(&self.path))
    }

    /// Returns whether the records have already been loaded.
    pub fn is_loaded(&self) -> bool {
        self.records.get().is_some()
    }

    pub fn get(&self, name: &str) -> StoreResult<Option<i64>> {
        Ok(self.records()?.get(name).copied())
    }

    pub fn contains(&self, name: &str) -> StoreResult<bool> {
        Ok(self.records()?.contains_key(name))
    }

    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.records()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.records()?.is_empty())
    }

    /// Returns the records as owned values, ordered by name.
    pub fn to_records(&self) -> StoreResult<Vec<Record>> {
        Ok(self
            .records()?
            .iter()
            .map(|(name, score)| Record::new(name.clone(), *score))
            .collect())
    }

    /// Merges with `other` into `combined_{self}_{other}.txt` beside this
    /// store's file, keeping the higher score per name.
    pub fn merge(&self, other: &RecordStore) -> StoreResult<RecordStore> {
        RecordMerger::beside(&self.path).merge(self, other)
    }

    /// Merges with every store in `others` into
    /// `multi_combined_{self}.txt` beside this store's file.
    pub fn merge_all(&self, others: &[&RecordStore]) -> StoreResult<RecordStore> {
        RecordMerger::beside(&self.path).merge_all(self, others)
    }
}

fn load_records(path: &Path) -> StoreResult<RecordMap> {
    debug!(
        "event=store_load module=repo status=start path={}",
        path.display()
    );

    let file = File::open(path).map_err(|err| {
        error!(
            "event=store_load module=repo status=error error_code=open_failed path={} error={}",
            path.display(),
            err
        );
        StoreError::io(path, err)
    })?;

    let mut records = RecordMap::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|err| StoreError::io(path, err))?;
        let Some(record) = parse_record_line(&line).map_err(|reason| {
            error!(
                "event=store_load module=repo status=error error_code=parse_failed path={} line={}",
                path.display(),
                index + 1
            );
            StoreError::Parse {
                path: path.to_path_buf(),
                line: index + 1,
                reason,
            }
        })?
        else {
            continue;
        };
        records.insert(record.name, record.score);
    }

    info!(
        "event=store_load module=repo status=ok path={} records={}",
        path.display(),
        records.len()
    );
    Ok(records)
}

/// Parses one store line. Blank lines yield `Ok(None)`.
fn parse_record_line(line: &str) -> Result<Option<Record>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let (name, score) = trimmed
        .rsplit_once(',')
        .ok_or_else(|| format!("expected `name, score`, found `{trimmed}`"))?;
    let score = score.trim();
    let score = score
        .parse::<i64>()
        .map_err(|_| format!("score `{score}` is not an integer"))?;

    Ok(Some(Record::new(name.trim(), score)))
}
