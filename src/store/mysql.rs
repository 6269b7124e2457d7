use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;
use tracing::error;

use crate::error::AttendanceError;
use crate::model::record::{NewTimeRecord, RecordPatch, TimeRecord};
use crate::store::{RecordStore, validate_patch};

const SELECT_COLUMNS: &str = "id, worker_id, date, entry_time, leave_time, is_absent, created_at";

/// `time_records`-backed store. Day uniqueness is a `(worker_id, date)`
/// unique key; the losing side of a race surfaces as SQLSTATE 23000.
pub struct MySqlRecordStore {
    pool: MySqlPool,
}

impl MySqlRecordStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch_record(&self, id: u64) -> Result<Option<TimeRecord>, AttendanceError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM time_records WHERE id = ?");
        let record = sqlx::query_as::<_, TimeRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }
}

#[async_trait]
impl RecordStore for MySqlRecordStore {
    async fn list_records(
        &self,
        worker_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<TimeRecord>, AttendanceError> {
        // Window filter mirrors TimeRecord::effective_date.
        let sql = format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM time_records
            WHERE worker_id = ?
              AND COALESCE(DATE(entry_time), date, DATE(created_at)) BETWEEN ? AND ?
            ORDER BY created_at, id
            "#
        );

        let records = sqlx::query_as::<_, TimeRecord>(&sql)
            .bind(worker_id)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, worker_id, "failed to list time records");
                AttendanceError::Transport(e)
            })?;

        Ok(records)
    }

    async fn create_record(&self, new: NewTimeRecord) -> Result<TimeRecord, AttendanceError> {
        let result = sqlx::query(
            r#"
            INSERT INTO time_records (worker_id, date, entry_time, leave_time, is_absent)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.worker_id)
        .bind(new.date)
        .bind(new.entry_time)
        .bind(new.leave_time)
        .bind(new.is_absent)
        .execute(&self.pool)
        .await;

        let done = match result {
            Ok(done) => done,
            Err(e) => {
                // Duplicate day for this worker
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.code().as_deref() == Some("23000") {
                        return Err(AttendanceError::Duplicate);
                    }
                }

                error!(error = %e, worker_id = new.worker_id, "time record insert failed");
                return Err(AttendanceError::Transport(e));
            }
        };

        let id = done.last_insert_id();
        self.fetch_record(id).await?.ok_or_else(|| {
            AttendanceError::Validation(format!("record {id} missing after insert"))
        })
    }

    async fn update_record(
        &self,
        id: u64,
        patch: RecordPatch,
    ) -> Result<TimeRecord, AttendanceError> {
        let existing = self
            .fetch_record(id)
            .await?
            .ok_or_else(|| AttendanceError::Validation(format!("record {id} not found")))?;

        validate_patch(&existing, &patch)?;

        sqlx::query(
            r#"
            UPDATE time_records
            SET entry_time = COALESCE(?, entry_time),
                leave_time = COALESCE(?, leave_time)
            WHERE id = ?
            "#,
        )
        .bind(patch.entry_time)
        .bind(patch.leave_time)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, record_id = id, "time record update failed");
            AttendanceError::Transport(e)
        })?;

        self.fetch_record(id)
            .await?
            .ok_or_else(|| AttendanceError::Validation(format!("record {id} missing after update")))
    }
}
