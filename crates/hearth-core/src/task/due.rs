//! Due-date normalization and calendar classification.
//!
//! Due dates carry date-only semantics: a task due at 23:59 and one due at
//! 00:01 of the same local day are both "due today". All comparisons strip
//! the time of day by converting to the local calendar date first.
//!
//! The reference day is always passed in explicitly so the predicates stay
//! pure; only the outermost engine entry points read the wall clock.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A timestamp value as it may arrive from the hosted document store.
///
/// Store documents are written by several client generations, so a due date
/// can show up as a native timestamp wrapper, an RFC 3339 string, or a raw
/// epoch value. Each accepted shape is a variant with its own conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawTimestamp {
    /// Already-parsed value (in-process callers).
    DateTime(DateTime<Utc>),
    /// RFC 3339 / ISO-ish text, with or without a time component.
    Rfc3339(String),
    /// Milliseconds since the Unix epoch.
    EpochMillis(i64),
    /// Document-store timestamp wrapper (`{seconds, nanos}`).
    Document { seconds: i64, nanos: u32 },
}

impl RawTimestamp {
    /// Map a raw JSON value onto an accepted timestamp shape.
    ///
    /// Returns `None` for `null` and for shapes the store never produces
    /// (booleans, arrays, objects without a `seconds` field).
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(RawTimestamp::Rfc3339(s.clone())),
            serde_json::Value::Number(n) => n.as_i64().map(RawTimestamp::EpochMillis),
            serde_json::Value::Object(obj) => {
                let seconds = obj.get("seconds")?.as_i64()?;
                let nanos = obj.get("nanos").and_then(|n| n.as_u64()).unwrap_or(0) as u32;
                Some(RawTimestamp::Document { seconds, nanos })
            }
            _ => None,
        }
    }

    /// Convert to a UTC timestamp.
    ///
    /// Total: unparseable text, out-of-range epochs, and invalid wrapper
    /// fields all map to `None`. Never panics.
    pub fn normalize(&self) -> Option<DateTime<Utc>> {
        match self {
            RawTimestamp::DateTime(dt) => Some(*dt),
            RawTimestamp::Rfc3339(s) => parse_text(s),
            RawTimestamp::EpochMillis(ms) => Utc.timestamp_millis_opt(*ms).single(),
            RawTimestamp::Document { seconds, nanos } => {
                Utc.timestamp_opt(*seconds, *nanos).single()
            }
        }
    }
}

impl From<DateTime<Utc>> for RawTimestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        RawTimestamp::DateTime(dt)
    }
}

fn parse_text(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    // Date-only payloads land on midnight UTC; classification only looks at
    // the calendar day anyway.
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// The local calendar day a timestamp falls on.
pub fn due_day(due: DateTime<Utc>) -> NaiveDate {
    due.with_timezone(&Local).date_naive()
}

/// The local calendar day of "now".
pub fn local_day(now: DateTime<Utc>) -> NaiveDate {
    due_day(now)
}

/// True iff the task is incomplete and its due day is strictly before `today`.
pub fn is_overdue(due: Option<DateTime<Utc>>, completed: bool, today: NaiveDate) -> bool {
    if completed {
        return false;
    }
    match due {
        Some(d) => due_day(d) < today,
        None => false,
    }
}

/// True iff the task is incomplete and due on or before tomorrow.
///
/// The window covers today and tomorrow inclusively, so it overlaps both
/// [`is_overdue`] and [`is_due_today`]; callers combining predicates must
/// check in cascade order (see [`DueStatus::classify`]).
pub fn is_due_soon(due: Option<DateTime<Utc>>, completed: bool, today: NaiveDate) -> bool {
    if completed {
        return false;
    }
    let tomorrow = match today.succ_opt() {
        Some(d) => d,
        None => return false,
    };
    match due {
        Some(d) => due_day(d) <= tomorrow,
        None => false,
    }
}

/// True iff the due day equals `today`.
///
/// Does not consult completion; callers needing "incomplete and due today"
/// must additionally check `completed == false`.
pub fn is_due_today(due: Option<DateTime<Utc>>, today: NaiveDate) -> bool {
    match due {
        Some(d) => due_day(d) == today,
        None => false,
    }
}

/// Temporal state of an incomplete task, assigned by ordered cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    Overdue,
    DueToday,
    DueSoon,
    Upcoming,
    Unscheduled,
}

impl DueStatus {
    /// Classify a task's temporal state against `today`.
    ///
    /// Completed tasks are outside the classification entirely and return
    /// `None`. The predicate windows overlap, so the checks run as an
    /// ordered cascade: overdue, then due-today, then due-soon.
    pub fn classify(
        due: Option<DateTime<Utc>>,
        completed: bool,
        today: NaiveDate,
    ) -> Option<DueStatus> {
        if completed {
            return None;
        }
        let due = match due {
            Some(d) => d,
            None => return Some(DueStatus::Unscheduled),
        };
        let day = due_day(due);
        let status = if day < today {
            DueStatus::Overdue
        } else if day == today {
            DueStatus::DueToday
        } else if today.succ_opt() == Some(day) {
            DueStatus::DueSoon
        } else {
            DueStatus::Upcoming
        };
        Some(status)
    }

    /// Display label for the status.
    pub fn label(&self) -> &'static str {
        match self {
            DueStatus::Overdue => "overdue",
            DueStatus::DueToday => "due today",
            DueStatus::DueSoon => "due soon",
            DueStatus::Upcoming => "upcoming",
            DueStatus::Unscheduled => "unscheduled",
        }
    }
}
