//! Record and log entry domain model.
//!
//! # Responsibility
//! - Define the `name -> score` record shape loaded from store files.
//! - Define the validated `name,subject,score` entry written to the log.
//! - Classify scores into pass/fail.
//!
//! # Invariants
//! - `LogEntry` can only be constructed (or deserialized) with a score in
//!   `MIN_SCORE..=MAX_SCORE`, non-empty single-line name/subject, and a
//!   subject without commas, so `to_line` always parses back to itself.
//! - `RecordMap` iteration order is name ascending.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lowest score accepted by the append log.
pub const MIN_SCORE: i64 = 0;
/// Highest score accepted by the append log.
pub const MAX_SCORE: i64 = 100;
/// Scores at or above this value pass.
pub const PASS_THRESHOLD: i64 = 50;

/// Ordered `name -> score` mapping loaded from one store file.
pub type RecordMap = BTreeMap<String, i64>;

/// One `name, score` line of a store file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub score: i64,
}

impl Record {
    pub fn new(name: impl Into<String>, score: i64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }

    /// Renders the record in store file format (`name, score`).
    pub fn to_line(&self) -> String {
        format!("{}, {}", self.name, self.score)
    }
}

/// Validation errors for log entry writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    EmptyName,
    EmptySubject,
    /// A field holds `\n` or `\r` and would span several log lines.
    LineBreak { field: &'static str },
    /// Subjects cannot hold the `,` field separator.
    InvalidSubject(String),
    ScoreOutOfRange { score: i64 },
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "student name cannot be empty"),
            Self::EmptySubject => write!(f, "subject cannot be empty"),
            Self::LineBreak { field } => write!(f, "{field} cannot contain line breaks"),
            Self::InvalidSubject(subject) => {
                write!(f, "subject `{subject}` cannot contain `,`")
            }
            Self::ScoreOutOfRange { score } => write!(
                f,
                "score {score} is outside the accepted range {MIN_SCORE}..={MAX_SCORE}"
            ),
        }
    }
}

impl Error for EntryValidationError {}

/// One validated `name,subject,score` line of the append log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLogEntry")]
pub struct LogEntry {
    name: String,
    subject: String,
    score: i64,
}

#[derive(Deserialize)]
struct RawLogEntry {
    name: String,
    subject: String,
    score: i64,
}

impl TryFrom<RawLogEntry> for LogEntry {
    type Error = EntryValidationError;

    fn try_from(raw: RawLogEntry) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.subject, raw.score)
    }
}

impl LogEntry {
    /// Builds a log entry, rejecting out-of-range scores and fields that
    /// would not read back as the same single line.
    ///
    /// Name and subject are trimmed before validation. Names may contain
    /// commas; subjects may not.
    pub fn new(
        name: impl Into<String>,
        subject: impl Into<String>,
        score: i64,
    ) -> Result<Self, EntryValidationError> {
        let name = name.into().trim().to_string();
        let subject = subject.into().trim().to_string();

        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(EntryValidationError::ScoreOutOfRange { score });
        }
        if name.is_empty() {
            return Err(EntryValidationError::EmptyName);
        }
        if subject.is_empty() {
            return Err(EntryValidationError::EmptySubject);
        }
        if has_line_break(&name) {
            return Err(EntryValidationError::LineBreak { field: "name" });
        }
        if has_line_break(&subject) {
            return Err(EntryValidationError::LineBreak { field: "subject" });
        }
        if subject.contains(',') {
            return Err(EntryValidationError::InvalidSubject(subject));
        }

        Ok(Self {
            name,
            subject,
            score,
        })
    }

    /// Parses one raw log line.
    ///
    /// Returns `None` for anything that would not pass [`LogEntry::new`].
    /// Subject and score are taken from the last two comma-separated fields,
    /// so a name may itself contain commas.
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut fields = line.rsplitn(3, ',');
        let score = fields.next()?.trim().parse::<i64>().ok()?;
        let subject = fields.next()?;
        let name = fields.next()?;
        Self::new(name, subject, score).ok()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    /// Case-insensitive subject comparison.
    pub fn is_subject(&self, subject: &str) -> bool {
        self.subject.to_lowercase() == subject.trim().to_lowercase()
    }

    /// Renders the entry in log file format (`name,subject,score`).
    pub fn to_line(&self) -> String {
        format!("{},{},{}", self.name, self.subject, self.score)
    }

    pub fn grade(&self) -> GradeStatus {
        GradeStatus::from_score(self.score)
    }
}

fn has_line_break(value: &str) -> bool {
    value.contains(['\n', '\r'])
}

/// Pass/fail classification of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradeStatus {
    Pass,
    Fail,
}

impl GradeStatus {
    pub fn from_score(score: i64) -> Self {
        if score >= PASS_THRESHOLD {
            Self::Pass
        } else {
            Self::Fail
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "Pass",
            Self::Fail => "Fail",
        }
    }
}

impl Display for GradeStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
