use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use crate::error::AttendanceError;
use crate::model::record::{NewTimeRecord, RecordPatch, TimeRecord};
use crate::store::{RecordStore, validate_patch};

/// In-memory store with the same rules as the SQL one, for exercising the
/// action flows without a database.
pub struct InMemoryRecordStore {
    records: Mutex<Vec<TimeRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn dump(&self) -> Vec<TimeRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn list_records(
        &self,
        worker_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<TimeRecord>, AttendanceError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| r.worker_id == worker_id)
            .filter(|r| {
                let day = r.effective_date();
                from <= day && day <= to
            })
            .cloned()
            .collect())
    }

    async fn create_record(&self, new: NewTimeRecord) -> Result<TimeRecord, AttendanceError> {
        let mut records = self.records.lock().unwrap();

        let day = new.effective_date();
        if records
            .iter()
            .any(|r| r.worker_id == new.worker_id && r.effective_date() == day)
        {
            return Err(AttendanceError::Duplicate);
        }

        let id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let record = TimeRecord {
            id,
            worker_id: new.worker_id,
            date: Some(new.date),
            entry_time: new.entry_time,
            leave_time: new.leave_time,
            is_absent: new.is_absent,
            created_at: new
                .entry_time
                .unwrap_or_else(|| new.date.and_time(NaiveTime::MIN)),
        };

        records.push(record.clone());
        Ok(record)
    }

    async fn update_record(
        &self,
        id: u64,
        patch: RecordPatch,
    ) -> Result<TimeRecord, AttendanceError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AttendanceError::Validation(format!("record {id} not found")))?;

        validate_patch(record, &patch)?;

        if let Some(entry) = patch.entry_time {
            record.entry_time = Some(entry);
        }
        if let Some(leave) = patch.leave_time {
            record.leave_time = Some(leave);
        }

        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn new_record(entry: Option<&str>, is_absent: bool) -> NewTimeRecord {
        NewTimeRecord {
            worker_id: 1001,
            date: "2024-03-01".parse().unwrap(),
            entry_time: entry.map(datetime),
            leave_time: None,
            is_absent,
        }
    }

    #[actix_web::test]
    async fn create_rejects_a_second_record_for_the_same_day() {
        let store = InMemoryRecordStore::new();
        store
            .create_record(new_record(Some("2024-03-01T09:00:00"), false))
            .await
            .unwrap();

        let err = store
            .create_record(new_record(Some("2024-03-01T10:00:00"), false))
            .await
            .unwrap_err();
        assert!(matches!(err, AttendanceError::Duplicate));
    }

    #[actix_web::test]
    async fn update_rejects_unknown_record() {
        let store = InMemoryRecordStore::new();
        let err = store
            .update_record(
                42,
                RecordPatch {
                    entry_time: Some(datetime("2024-03-01T09:00:00")),
                    leave_time: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AttendanceError::Validation(_)));
    }

    #[actix_web::test]
    async fn update_rejects_closed_record_and_empty_patch() {
        let store = InMemoryRecordStore::new();
        let open = store
            .create_record(new_record(Some("2024-03-01T09:00:00"), false))
            .await
            .unwrap();

        let err = store
            .update_record(open.id, RecordPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AttendanceError::Validation(_)));

        store
            .update_record(
                open.id,
                RecordPatch {
                    entry_time: None,
                    leave_time: Some(datetime("2024-03-01T17:00:00")),
                },
            )
            .await
            .unwrap();

        // Closed now; a further patch must not reopen it.
        let err = store
            .update_record(
                open.id,
                RecordPatch {
                    entry_time: None,
                    leave_time: Some(datetime("2024-03-01T18:00:00")),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AttendanceError::Validation(_)));
    }

    #[actix_web::test]
    async fn update_rejects_leave_without_entry() {
        let store = InMemoryRecordStore::new();
        let absence = store.create_record(new_record(None, true)).await.unwrap();

        let err = store
            .update_record(
                absence.id,
                RecordPatch {
                    entry_time: None,
                    leave_time: Some(datetime("2024-03-01T17:00:00")),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AttendanceError::Validation(_)));
    }
}
