use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AttendanceError;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "worker_id": 1001,
        "date": "2024-03-01",
        "entry_time": "2024-03-01T09:00:00",
        "leave_time": null,
        "is_absent": false,
        "created_at": "2024-03-01T09:00:00"
    })
)]
pub struct TimeRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1001)]
    pub worker_id: u64,

    /// Logical calendar day the record applies to.
    #[schema(example = "2024-03-01", value_type = String, format = "date")]
    pub date: Option<NaiveDate>,

    #[schema(example = "2024-03-01T09:00:00", value_type = String, format = "date-time")]
    pub entry_time: Option<NaiveDateTime>,

    #[schema(example = "2024-03-01T17:30:00", value_type = String, format = "date-time")]
    pub leave_time: Option<NaiveDateTime>,

    #[schema(example = false)]
    pub is_absent: bool,

    #[schema(example = "2024-03-01T09:00:00", value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
}

/// Creation payload; the store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewTimeRecord {
    pub worker_id: u64,
    pub date: NaiveDate,
    pub entry_time: Option<NaiveDateTime>,
    pub leave_time: Option<NaiveDateTime>,
    pub is_absent: bool,
}

/// Fields a record update may touch. `None` leaves the column as-is.
#[derive(Debug, Clone, Default)]
pub struct RecordPatch {
    pub entry_time: Option<NaiveDateTime>,
    pub leave_time: Option<NaiveDateTime>,
}

/// What a single record amounts to for its day, classified once so the rest
/// of the code never re-derives it from the optional columns. A leave time
/// without an entry time does not classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayShape {
    /// Marked absent, never arrived.
    Absence,
    /// Absence later amended with an arrival; clock-out may still be missing.
    LateArrival {
        entry: NaiveDateTime,
        leave: Option<NaiveDateTime>,
    },
    /// Clocked in, not yet clocked out.
    Open { entry: NaiveDateTime },
    /// Full entry/leave cycle on a normal day.
    Closed {
        entry: NaiveDateTime,
        leave: NaiveDateTime,
    },
    /// Neither an arrival nor an absence mark. Not produced here, but rows
    /// written by external tooling can look like this; such a row only
    /// blocks re-marking the day absent.
    Blank,
}

impl TimeRecord {
    /// Calendar day this record is grouped under: `entry_time`'s day, else
    /// `date`, else `created_at`'s day.
    pub fn effective_date(&self) -> NaiveDate {
        self.entry_time
            .map(|t| t.date())
            .or(self.date)
            .unwrap_or_else(|| self.created_at.date())
    }

    pub fn shape(&self) -> Result<DayShape, AttendanceError> {
        match (self.is_absent, self.entry_time, self.leave_time) {
            (_, None, Some(_)) => Err(AttendanceError::Validation(format!(
                "record {} has a leave time without an entry time",
                self.id
            ))),
            (true, None, None) => Ok(DayShape::Absence),
            (true, Some(entry), leave) => Ok(DayShape::LateArrival { entry, leave }),
            (false, Some(entry), None) => Ok(DayShape::Open { entry }),
            (false, Some(entry), Some(leave)) => Ok(DayShape::Closed { entry, leave }),
            (false, None, None) => Ok(DayShape::Blank),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.shape(), Ok(DayShape::Open { .. }))
    }
}

impl NewTimeRecord {
    /// Same precedence as [`TimeRecord::effective_date`], before the store
    /// has stamped `created_at`.
    pub fn effective_date(&self) -> NaiveDate {
        self.entry_time.map(|t| t.date()).unwrap_or(self.date)
    }
}
