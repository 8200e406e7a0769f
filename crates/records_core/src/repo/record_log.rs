//! Append-only `name,subject,score` log.
//!
//! # Responsibility
//! - Validate and append single entries to a flat log file.
//! - Stream the log back as raw lines, parsed entries or subject matches.
//!
//! # Invariants
//! - Validation runs before the file is opened; rejected writes leave the
//!   log byte-identical.
//! - Reads never cache; every call re-opens the file.
//! - A log file that does not exist yet reads as empty.

use crate::model::record::{EntryValidationError, GradeStatus, LogEntry};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

pub type LogResult<T> = Result<T, LogError>;

/// Error for log writes and reads.
#[derive(Debug)]
pub enum LogError {
    Validation(EntryValidationError),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for LogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
        }
    }
}

impl Error for LogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<EntryValidationError> for LogError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Log of graded entries backed by one text file.
#[derive(Debug, Clone)]
pub struct ManagedRecordLog {
    path: PathBuf,
}

impl ManagedRecordLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validates and appends one `name,subject,score` line.
    ///
    /// Creates the log file when absent.
    ///
    /// # Errors
    /// - `LogError::Validation` when the score is outside `0..=100` or a
    ///   field is empty. Nothing is written.
    /// - `LogError::Io` when the file cannot be opened or written.
    pub fn append(&self, name: &str, subject: &str, score: i64) -> LogResult<LogEntry> {
        let entry = LogEntry::new(name, subject, score).inspect_err(|err| {
            error!(
                "event=log_append module=repo status=error error_code=validation path={} error={}",
                self.path.display(),
                err
            );
        })?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|err| self.io_error(err))?;
        file.write_all(format!("{}\n", entry.to_line()).as_bytes())
            .map_err(|err| self.io_error(err))?;

        info!(
            "event=log_append module=repo status=ok path={}",
            self.path.display()
        );
        Ok(entry)
    }

    /// Streams every raw line of the log, re-reading the file on each call.
    pub fn read_all(&self) -> LogResult<impl Iterator<Item = LogResult<String>> + '_> {
        let lines = match File::open(&self.path) {
            Ok(file) => Some(BufReader::new(file).lines()),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => return Err(self.io_error(err)),
        };

        Ok(lines
            .into_iter()
            .flatten()
            .map(move |line| line.map_err(|err| self.io_error(err))))
    }

    /// Streams parsed entries, skipping malformed lines.
    pub fn entries(&self) -> LogResult<impl Iterator<Item = LogResult<LogEntry>> + '_> {
        Ok(self.read_all()?.filter_map(|line| match line {
            Ok(line) => LogEntry::parse_line(&line).map(Ok),
            Err(err) => Some(Err(err)),
        }))
    }

    /// Streams raw lines whose subject matches `subject` case-insensitively.
    ///
    /// Malformed lines are skipped rather than reported.
    pub fn filter_by_subject<'a>(
        &'a self,
        subject: &'a str,
    ) -> LogResult<impl Iterator<Item = LogResult<String>> + 'a> {
        Ok(self.read_all()?.filter(move |line| match line {
            Ok(line) => LogEntry::parse_line(line).is_some_and(|entry| entry.is_subject(subject)),
            Err(_) => true,
        }))
    }

    /// Classifies a score as `"Pass"` (>= 50) or `"Fail"`.
    pub fn grade_status(score: i64) -> &'static str {
        GradeStatus::from_score(score).as_str()
    }

    fn io_error(&self, source: std::io::Error) -> LogError {
        LogError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
