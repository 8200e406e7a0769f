//! Use-case services over record stores.
//!
//! # Responsibility
//! - Combine several stores into merged files or read-only reports.
//! - Keep merge/report rules independent of file parsing.

pub mod merge_service;
pub mod report_service;
