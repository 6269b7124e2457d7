use crate::api::attendance::AttendanceActionRequest;
use crate::attendance::history::DayGroup;
use crate::attendance::resolver::{AttendanceStatus, DaySnapshot};
use crate::model::record::TimeRecord;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Timeclock API",
        version = "1.0.0",
        description = r#"
## Timeclock Service

Daily attendance tracking for workers: check-in, check-out and absence
marking, with derived status and per-action availability.

### 🔹 Key Features
- **Check-in / Check-out**
  - One attendance record per worker per day; overnight sessions split at midnight
- **Absence Handling**
  - Mark a day absent, amend it into a late arrival on arrival
- **Status**
  - Resolved day snapshot: status label plus which actions are currently allowed
- **History**
  - Records grouped by calendar day for audit views

### 📦 Response Format
- JSON-based RESTful responses

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::mark_absent,
        crate::api::attendance::status,
        crate::api::attendance::history,
    ),
    components(
        schemas(
            AttendanceActionRequest,
            TimeRecord,
            AttendanceStatus,
            DaySnapshot,
            DayGroup
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance management APIs"),
    )
)]
pub struct ApiDoc;
