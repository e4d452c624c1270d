//! Completion analytics derived from an owner's task collection.
//!
//! # Invariants
//! - `completed + pending` always equals the number of input tasks.
//! - The daily histogram only has keys for dates with at least one task.
//! - Nothing is persisted; every summary is recomputed from a fresh load.

use crate::model::task::Task;
use crate::repo::task_store::{StoreResult, TaskStore};
use chrono::{DateTime, Duration, NaiveDate, Offset, TimeZone};
use log::{debug, warn};
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate counts for one owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub completed: usize,
    pub pending: usize,
    /// Tasks created per calendar date in the viewer's time zone.
    pub daily_created: BTreeMap<NaiveDate, usize>,
}

impl TaskStats {
    /// Tallies `tasks`, bucketing creation dates in `tz`.
    pub fn from_tasks<Tz: TimeZone>(tasks: &[Task], tz: &Tz) -> Self {
        let mut stats = Self::default();
        for task in tasks {
            if task.completed {
                stats.completed += 1;
            } else {
                stats.pending += 1;
            }

            match created_date(task.created_at, tz) {
                Some(date) => *stats.daily_created.entry(date).or_insert(0) += 1,
                None => warn!(
                    "event=analytics_bucket module=analytics status=skipped task_id={} created_at={}",
                    task.id, task.created_at
                ),
            }
        }
        stats
    }

    pub fn total(&self) -> usize {
        self.completed + self.pending
    }

    /// `completed / total`, or `0.0` for an empty collection.
    pub fn completion_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.completed as f64 / total as f64
    }

    /// Completion rate as a one-decimal percentage, e.g. `40.0%`.
    pub fn completion_rate_label(&self) -> String {
        format!("{:.1}%", self.completion_rate() * 100.0)
    }
}

/// Local calendar date of `created_at_ms` in `tz`.
///
/// `None` when the instant, or the instant shifted by the zone offset, falls
/// outside chrono's representable range.
fn created_date<Tz: TimeZone>(created_at_ms: i64, tz: &Tz) -> Option<NaiveDate> {
    let utc = DateTime::from_timestamp_millis(created_at_ms)?.naive_utc();
    let offset_secs = tz.offset_from_utc_datetime(&utc).fix().local_minus_utc();
    utc.checked_add_signed(Duration::seconds(i64::from(offset_secs)))
        .map(|local| local.date())
}

/// Computes `TaskStats` from owner-scoped store reads.
///
/// Loads independently of any controller so analytics never depend on a
/// possibly re-sorted or stale in-memory collection.
pub struct AnalyticsAggregator<S: TaskStore> {
    store: S,
}

impl<S: TaskStore> AnalyticsAggregator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn summarize<Tz: TimeZone>(&self, owner_id: &str, tz: &Tz) -> StoreResult<TaskStats> {
        let tasks = self.store.query(owner_id)?;
        let stats = TaskStats::from_tasks(&tasks, tz);
        debug!(
            "event=analytics_summarize module=analytics status=ok completed={} pending={} days={}",
            stats.completed,
            stats.pending,
            stats.daily_created.len()
        );
        Ok(stats)
    }
}
