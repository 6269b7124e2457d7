use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

/// Failure taxonomy for attendance operations. Nothing here is retried;
/// every retry is a fresh user action after re-reading state.
#[derive(Debug, Error)]
pub enum AttendanceError {
    /// The store already holds a conflicting record for the target day.
    #[error("a record already exists for this worker on that day")]
    Duplicate,

    /// A locally detectable precondition failed.
    #[error("{0}")]
    Validation(String),

    /// Store/network failure, passed through unchanged.
    #[error("store error: {0}")]
    Transport(#[from] sqlx::Error),
}

impl ResponseError for AttendanceError {
    fn status_code(&self) -> StatusCode {
        match self {
            AttendanceError::Duplicate | AttendanceError::Validation(_) => StatusCode::BAD_REQUEST,
            AttendanceError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Transport details stay in the logs, not in the response body.
        let message = match self {
            AttendanceError::Transport(_) => "Internal Server Error".to_string(),
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "message": message
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_and_validation_map_to_bad_request() {
        assert_eq!(
            AttendanceError::Duplicate.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AttendanceError::Validation("nope".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn transport_maps_to_internal_server_error() {
        let err = AttendanceError::Transport(sqlx::Error::PoolClosed);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
