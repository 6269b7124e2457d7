use actix_web::{HttpResponse, web};
use chrono::{Days, Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use crate::attendance::history::DayGroup;
use crate::attendance::resolver::DaySnapshot;
use crate::attendance::{actions, history, resolver};
use crate::config::Config;
use crate::error::AttendanceError;
use crate::store::RecordStore;

#[derive(Deserialize, ToSchema)]
pub struct AttendanceActionRequest {
    #[schema(example = 1001)]
    pub worker_id: u64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AttendanceQuery {
    /// Worker whose records to read
    #[param(example = 1001)]
    pub worker_id: u64,
    /// Window start, inclusive; defaults to the configured trailing window
    #[param(example = "2024-02-01", value_type = String, format = "date")]
    pub from: Option<NaiveDate>,
    /// Window end, inclusive; defaults to today
    #[param(example = "2024-03-01", value_type = String, format = "date")]
    pub to: Option<NaiveDate>,
}

fn window(query: &AttendanceQuery, today: NaiveDate, trailing_days: u64) -> (NaiveDate, NaiveDate) {
    let to = query.to.unwrap_or(today);
    let from = query
        .from
        .unwrap_or_else(|| to.checked_sub_days(Days::new(trailing_days)).unwrap_or(to));
    (from, to)
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    request_body = AttendanceActionRequest,
    responses(
        (status = 200, description = "Checked in successfully", body = Object, example = json!({
            "message": "Checked in successfully"
        })),
        (status = 400, description = "Already checked in today", body = Object, example = json!({
            "message": "worker already has an attendance record for today"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    store: web::Data<dyn RecordStore>,
    payload: web::Json<AttendanceActionRequest>,
) -> Result<HttpResponse, AttendanceError> {
    let now = Local::now().naive_local();
    let record = actions::check_in(store.get_ref(), payload.worker_id, now).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Checked in successfully",
        "record": record
    })))
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-out",
    request_body = AttendanceActionRequest,
    responses(
        (status = 200, description = "Checked out successfully", body = Object, example = json!({
            "message": "Checked out successfully"
        })),
        (status = 400, description = "Conflicting record for today", body = Object),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    store: web::Data<dyn RecordStore>,
    payload: web::Json<AttendanceActionRequest>,
) -> Result<HttpResponse, AttendanceError> {
    let now = Local::now().naive_local();
    let record = actions::check_out(store.get_ref(), payload.worker_id, now).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Checked out successfully",
        "record": record
    })))
}

/// Mark-absent endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/absent",
    request_body = AttendanceActionRequest,
    responses(
        (status = 200, description = "Marked absent", body = Object, example = json!({
            "message": "Marked absent"
        })),
        (status = 400, description = "A record already exists for today", body = Object),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn mark_absent(
    store: web::Data<dyn RecordStore>,
    payload: web::Json<AttendanceActionRequest>,
) -> Result<HttpResponse, AttendanceError> {
    let now = Local::now().naive_local();
    let record = actions::mark_absent(store.get_ref(), payload.worker_id, now).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Marked absent",
        "record": record
    })))
}

/// Resolved day snapshot: status label plus the three action gates
#[utoipa::path(
    get,
    path = "/api/v1/attendance/status",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Current attendance snapshot", body = DaySnapshot),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn status(
    store: web::Data<dyn RecordStore>,
    config: web::Data<Config>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, AttendanceError> {
    let now = Local::now().naive_local();
    let (from, to) = window(&query, now.date(), config.status_window_days);

    let records = store.list_records(query.worker_id, from, to).await?;
    let snapshot = resolver::resolve(&records, now)?;

    debug!(
        worker_id = query.worker_id,
        status = snapshot.status.label(),
        "resolved attendance snapshot"
    );

    Ok(HttpResponse::Ok().json(snapshot))
}

/// Day-grouped record history for audit views
#[utoipa::path(
    get,
    path = "/api/v1/attendance/history",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Records grouped by day, most recent first", body = [DayGroup]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn history(
    store: web::Data<dyn RecordStore>,
    config: web::Data<Config>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, AttendanceError> {
    let now = Local::now().naive_local();
    let (from, to) = window(&query, now.date(), config.status_window_days);

    let records = store.list_records(query.worker_id, from, to).await?;
    let groups = history::group_by_day(&records);

    Ok(HttpResponse::Ok().json(groups))
}
