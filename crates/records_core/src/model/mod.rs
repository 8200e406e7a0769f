//! Domain model for student record files.
//!
//! # Responsibility
//! - Define the record, log entry and grading shapes shared by stores,
//!   merges, reports and the append log.
//!
//! # Invariants
//! - Names are unique inside one `RecordMap`.
//! - A `LogEntry` score always lies in `MIN_SCORE..=MAX_SCORE`.

pub mod record;
