//! Cross-store appearance report.
//!
//! # Responsibility
//! - Count, per name, how many stores contain it and average its scores.
//!
//! # Invariants
//! - Read-only: stores may load their cache, nothing is written.
//! - Rows are ordered by name ascending.
//! - `average_score` is floor division of the score sum by
//!   `appearance_count`.

use crate::repo::record_store::{RecordStore, StoreResult};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Visual emphasis tier derived from appearance count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Present in exactly one store.
    Single,
    /// Present in two stores.
    Double,
    /// Present in three or more stores.
    Many,
}

impl Tier {
    pub fn from_count(count: usize) -> Self {
        match count {
            0 | 1 => Self::Single,
            2 => Self::Double,
            _ => Self::Many,
        }
    }
}

/// One report line for a student name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub name: String,
    pub appearance_count: usize,
    pub average_score: i64,
}

impl ReportRow {
    pub fn tier(&self) -> Tier {
        Tier::from_count(self.appearance_count)
    }
}

/// Builds appearance reports over record stores.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordReporter;

impl RecordReporter {
    pub fn report(&self, stores: &[&RecordStore]) -> StoreResult<Vec<ReportRow>> {
        // Summed in i128 so large i64 scores cannot overflow.
        let mut totals: BTreeMap<&str, (usize, i128)> = BTreeMap::new();
        for store in stores.iter().copied() {
            for (name, &score) in store.records()? {
                let total = totals.entry(name.as_str()).or_insert((0, 0));
                total.0 += 1;
                total.1 += i128::from(score);
            }
        }

        debug!(
            "event=store_report module=service status=ok stores={} names={}",
            stores.len(),
            totals.len()
        );

        Ok(totals
            .into_iter()
            .map(|(name, (count, sum))| ReportRow {
                name: name.to_string(),
                appearance_count: count,
                average_score: floor_average(sum, count),
            })
            .collect())
    }
}

/// Floor of `sum / count`. The mean of i64 values lies within i64 bounds.
fn floor_average(sum: i128, count: usize) -> i64 {
    let average = sum.div_euclid(count as i128);
    i64::try_from(average).unwrap_or(if average < 0 { i64::MIN } else { i64::MAX })
}
