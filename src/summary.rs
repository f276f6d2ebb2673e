use crate::store::{AttendanceRecord, FeeRecord, RecordStore};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

pub const DEFAULT_RECENT_LIMIT: usize = 10;

pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

impl Timestamped for FeeRecord {
    fn timestamp(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}

impl Timestamped for AttendanceRecord {
    fn timestamp(&self) -> DateTime<Utc> {
        self.verified_at
    }
}

/// Newest-first copy of at most `limit` records. The source slice is left in
/// insertion order; records sharing a timestamp come out later-inserted first.
pub fn recent_first<T: Timestamped + Clone>(records: &[T], limit: usize) -> Vec<T> {
    let mut snapshot: Vec<T> = records.iter().rev().cloned().collect();
    // Stable sort over the reversed copy keeps the tie order.
    snapshot.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
    snapshot.truncate(limit);
    snapshot
}

/// Reads a `limit` query value. Anything that is not a positive integer
/// falls back to the default.
pub fn parse_limit(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_RECENT_LIMIT)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_teachers: usize,
    pub total_fee_records: usize,
    pub today_collection: f64,
    pub today_attendance_count: usize,
}

impl DashboardSummary {
    /// "Today" is the calendar day of `now` in `now`'s own timezone; record
    /// timestamps are converted into that zone before comparing days.
    pub fn compute<Tz: TimeZone>(store: &RecordStore, now: &DateTime<Tz>) -> Self {
        let zone = now.timezone();
        let today = now.date_naive();
        let is_today = |ts: DateTime<Utc>| ts.with_timezone(&zone).date_naive() == today;

        let today_collection: f64 = store
            .fees()
            .iter()
            .filter(|f| is_today(f.submitted_at))
            .fold(0.0, |acc, f| acc + f.amount);
        let today_attendance_count = store
            .attendance()
            .iter()
            .filter(|a| is_today(a.verified_at))
            .count();

        Self {
            total_teachers: store.teachers().len(),
            total_fee_records: store.fees().len(),
            today_collection,
            today_attendance_count,
        }
    }
}
