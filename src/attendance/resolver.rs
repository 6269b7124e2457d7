use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AttendanceError;
use crate::model::record::{DayShape, TimeRecord};

/// Status label shown next to a worker's name. A completed normal day
/// reverts to `Absent` rather than a distinct "done" label, matching the
/// behaviour of the screens this replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum AttendanceStatus {
    Absent,
    #[serde(rename = "Absent-Marked")]
    AbsentMarked,
    Late,
    Present,
}

impl AttendanceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::AbsentMarked => "Absent-Marked",
            AttendanceStatus::Late => "Late",
            AttendanceStatus::Present => "Present",
        }
    }
}

/// Derived view of a worker's day: status plus which of the three actions
/// are currently allowed.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DaySnapshot {
    pub status: AttendanceStatus,
    pub is_today: bool,
    pub can_check_in: bool,
    pub can_check_out: bool,
    pub can_mark_absent: bool,
    pub last_record: Option<TimeRecord>,
}

/// Year/month/day comparison only; time of day and timezone play no part.
pub fn same_calendar_day(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

/// Most recent record by effective date. Stable, so among records sharing a
/// day the earliest-listed one wins, as the screens this replaces had it.
pub fn last_record(records: &[TimeRecord]) -> Option<&TimeRecord> {
    let mut sorted: Vec<&TimeRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.effective_date().cmp(&a.effective_date()));
    sorted.first().copied()
}

/// Pure derivation over an in-memory snapshot of records; no I/O, safe to
/// call repeatedly. Fails only when the most recent record does not
/// classify (leave time without entry time).
pub fn resolve(records: &[TimeRecord], now: NaiveDateTime) -> Result<DaySnapshot, AttendanceError> {
    let Some(last) = last_record(records) else {
        return Ok(DaySnapshot {
            status: AttendanceStatus::Absent,
            is_today: false,
            can_check_in: true,
            can_check_out: false,
            can_mark_absent: true,
            last_record: None,
        });
    };

    let shape = last.shape()?;

    if !same_calendar_day(now.date(), last.effective_date()) {
        return Ok(DaySnapshot {
            status: AttendanceStatus::Absent,
            is_today: false,
            can_check_in: true,
            can_check_out: false,
            can_mark_absent: true,
            last_record: Some(last.clone()),
        });
    }

    let status = match shape {
        DayShape::Absence => AttendanceStatus::AbsentMarked,
        DayShape::LateArrival { .. } => AttendanceStatus::Late,
        DayShape::Open { .. } => AttendanceStatus::Present,
        DayShape::Closed { .. } | DayShape::Blank => AttendanceStatus::Absent,
    };

    // An unamended absence keeps check-in available so it can become a late
    // arrival; an arrival without a clock-out, and a completed normal day,
    // hold the slot.
    let can_check_in = match shape {
        DayShape::Open { .. } | DayShape::Closed { .. } => false,
        DayShape::LateArrival { leave, .. } => leave.is_some(),
        DayShape::Absence | DayShape::Blank => true,
    };

    Ok(DaySnapshot {
        status,
        is_today: true,
        can_check_in,
        can_check_out: matches!(shape, DayShape::Open { .. }),
        can_mark_absent: false,
        last_record: Some(last.clone()),
    })
}
