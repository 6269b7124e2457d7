use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::info;

use crate::attendance::resolver;
use crate::error::AttendanceError;
use crate::model::record::{DayShape, NewTimeRecord, RecordPatch, TimeRecord};
use crate::store::RecordStore;

/// How far back check-out scans for a record left open. Anything older is
/// treated as nothing open and falls into the same-instant fallback.
pub const OPEN_RECORD_LOOKBACK_DAYS: u64 = 31;

fn start_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

fn end_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_hms_opt(23, 59, 59).unwrap_or_else(|| start_of_day(day))
}

/// Clock a worker in. An unamended absence for today is updated in place
/// into a late arrival; otherwise a fresh record is created. The store
/// re-validates day uniqueness, so the loser of a concurrent create gets
/// [`AttendanceError::Duplicate`].
pub async fn check_in(
    store: &dyn RecordStore,
    worker_id: u64,
    now: NaiveDateTime,
) -> Result<TimeRecord, AttendanceError> {
    let today = now.date();
    let records = store.list_records(worker_id, today, today).await?;
    let snapshot = resolver::resolve(&records, now)?;

    if let Some(last) = &snapshot.last_record {
        if snapshot.is_today && last.shape()? == DayShape::Absence {
            info!(worker_id, record_id = last.id, "amending absence into a late arrival");
            return store
                .update_record(
                    last.id,
                    RecordPatch {
                        entry_time: Some(now),
                        leave_time: None,
                    },
                )
                .await;
        }
    }

    if !snapshot.can_check_in {
        return Err(AttendanceError::Validation(
            "worker already has an attendance record for today".to_string(),
        ));
    }

    info!(worker_id, "checking in");
    store
        .create_record(NewTimeRecord {
            worker_id,
            date: today,
            entry_time: Some(now),
            leave_time: None,
            is_absent: false,
        })
        .await
}

/// Clock a worker out of the most recent open record.
///
/// An open record from an earlier day is closed at 23:59:59 of its own day
/// and the remainder booked on a new record for today, so no record ever
/// crosses midnight. With nothing open at all, a same-instant in/out record
/// is written instead of failing.
pub async fn check_out(
    store: &dyn RecordStore,
    worker_id: u64,
    now: NaiveDateTime,
) -> Result<TimeRecord, AttendanceError> {
    let today = now.date();
    let from = today
        .checked_sub_days(Days::new(OPEN_RECORD_LOOKBACK_DAYS))
        .unwrap_or(today);
    let records = store.list_records(worker_id, from, today).await?;

    let open = records
        .iter()
        .filter(|r| r.is_open())
        .max_by_key(|r| (r.effective_date(), r.created_at, r.id));

    let Some(open) = open else {
        info!(worker_id, "check-out with nothing open, writing a same-instant day");
        return store
            .create_record(NewTimeRecord {
                worker_id,
                date: today,
                entry_time: Some(now),
                leave_time: Some(now),
                is_absent: false,
            })
            .await;
    };

    let entry_day = open.effective_date();
    if resolver::same_calendar_day(entry_day, today) {
        info!(worker_id, record_id = open.id, "checking out");
        return store
            .update_record(
                open.id,
                RecordPatch {
                    entry_time: None,
                    leave_time: Some(now),
                },
            )
            .await;
    }

    // Never clocked out before midnight: close the stale record on its own
    // day, book the remainder on today's.
    info!(
        worker_id,
        record_id = open.id,
        %entry_day,
        "closing an overnight record and splitting at midnight"
    );
    store
        .update_record(
            open.id,
            RecordPatch {
                entry_time: None,
                leave_time: Some(end_of_day(entry_day)),
            },
        )
        .await?;

    store
        .create_record(NewTimeRecord {
            worker_id,
            date: today,
            entry_time: Some(start_of_day(today)),
            leave_time: Some(now),
            is_absent: false,
        })
        .await
}

/// Mark a worker absent for today. Refused once any record exists for the
/// day, whatever its shape.
pub async fn mark_absent(
    store: &dyn RecordStore,
    worker_id: u64,
    now: NaiveDateTime,
) -> Result<TimeRecord, AttendanceError> {
    let today = now.date();
    let records = store.list_records(worker_id, today, today).await?;
    if !records.is_empty() {
        return Err(AttendanceError::Validation(
            "worker already has an attendance record for today".to_string(),
        ));
    }

    info!(worker_id, "marking absent");
    store
        .create_record(NewTimeRecord {
            worker_id,
            date: today,
            entry_time: None,
            leave_time: None,
            is_absent: true,
        })
        .await
}
