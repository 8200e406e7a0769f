//! Core logic for student record files.
//! This crate owns the file formats, merge and report rules, and the
//! append log; the CLI only wires them together.

pub mod display;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use display::{colorize, describe_store, render_report, render_report_row, DisplayMode};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::record::{
    EntryValidationError, GradeStatus, LogEntry, Record, RecordMap, MAX_SCORE, MIN_SCORE,
    PASS_THRESHOLD,
};
pub use repo::record_log::{LogError, LogResult, ManagedRecordLog};
pub use repo::record_store::{RecordStore, StoreError, StoreResult};
pub use service::merge_service::{merge_maps, RecordMerger};
pub use service::report_service::{RecordReporter, ReportRow, Tier};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
