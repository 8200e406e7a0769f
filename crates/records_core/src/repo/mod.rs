//! File-backed persistence for record stores and the append log.
//!
//! # Responsibility
//! - Own the on-disk formats (`name, score` stores, `name,subject,score`
//!   logs) and keep parsing details out of services.
//!
//! # Invariants
//! - Every file handle is scoped to one operation.
//! - Repository APIs return semantic errors (`NotFound`, `Parse`,
//!   `Validation`) in addition to I/O errors.

pub mod record_log;
pub mod record_store;
