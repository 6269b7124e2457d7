use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::AttendanceError;
use crate::model::record::{DayShape, NewTimeRecord, RecordPatch, TimeRecord};

#[cfg(test)]
pub mod memory;
pub mod mysql;

/// Backing store for time records. One record per worker per effective day;
/// a create against an occupied day fails with [`AttendanceError::Duplicate`].
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Records whose effective day falls inside the inclusive `from..=to`
    /// window, in insertion order. Empty when there are none.
    async fn list_records(
        &self,
        worker_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<TimeRecord>, AttendanceError>;

    async fn create_record(&self, new: NewTimeRecord) -> Result<TimeRecord, AttendanceError>;

    async fn update_record(
        &self,
        id: u64,
        patch: RecordPatch,
    ) -> Result<TimeRecord, AttendanceError>;
}

/// Precondition checks every store runs before applying a patch:
/// the patch must touch something, must not leave the record with a leave
/// time and no entry time, and must not reopen a completed normal day.
pub(crate) fn validate_patch(
    existing: &TimeRecord,
    patch: &RecordPatch,
) -> Result<(), AttendanceError> {
    if patch.entry_time.is_none() && patch.leave_time.is_none() {
        return Err(AttendanceError::Validation(
            "no fields provided for update".to_string(),
        ));
    }

    if let Ok(DayShape::Closed { .. }) = existing.shape() {
        return Err(AttendanceError::Validation(format!(
            "record {} is already closed",
            existing.id
        )));
    }

    let entry = patch.entry_time.or(existing.entry_time);
    let leave = patch.leave_time.or(existing.leave_time);
    if leave.is_some() && entry.is_none() {
        return Err(AttendanceError::Validation(
            "a leave time requires an entry time".to_string(),
        ));
    }

    Ok(())
}
