use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain::QaError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<QaError> for ApiError {
    fn from(err: QaError) -> Self {
        match err {
            QaError::InvalidSessionType(_)
            | QaError::UnknownChecklistItem { .. }
            | QaError::InvalidReference => ApiError::Validation(err.to_string()),
            QaError::UnitNotFound(_)
            | QaError::ReportNotFound(_)
            | QaError::UserNotFound(_) => ApiError::NotFound(err.to_string()),
            QaError::DuplicateName(_) | QaError::DuplicateUser => {
                ApiError::Conflict(err.to_string())
            }
            QaError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            QaError::AccountDisabled => ApiError::Forbidden(err.to_string()),
            QaError::Storage(e) => e.into(),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => {
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        "23505" => ApiError::Conflict("Resource already exists".into()),
                        "23503" => ApiError::NotFound("Referenced resource not found".into()),
                        _ => ApiError::Internal(format!("Database error: {}", db_err)),
                    }
                } else {
                    ApiError::Internal(format!("Database error: {}", db_err))
                }
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
            })
            .collect();

        let message = if details.len() == 1 {
            details[0].clone()
        } else {
            format!("{} validation errors", details.len())
        };

        ApiError::Validation(message)
    }
}

impl From<shared::session::SessionError> for ApiError {
    fn from(err: shared::session::SessionError) -> Self {
        use shared::session::SessionError;
        match err {
            SessionError::Signing(msg) => ApiError::Internal(msg),
            SessionError::Expired => ApiError::Unauthorized("Session has expired".into()),
            SessionError::Invalid => ApiError::Unauthorized("Invalid session token".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use domain::checklist::SessionType;

    #[test]
    fn test_status_codes() {
        let cases: Vec<(ApiError, StatusCode)> = vec![
            (
                ApiError::Unauthorized("no token".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::Forbidden("admin only".into()),
                StatusCode::FORBIDDEN,
            ),
            (
                ApiError::NotFound("missing".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::Conflict("duplicate".into()),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::Validation("bad input".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_qa_error_mapping() {
        let err: ApiError = QaError::InvalidSessionType("weekly".into()).into();
        assert!(matches!(err, ApiError::Validation(_)));

        let err: ApiError = QaError::UnknownChecklistItem {
            session_type: SessionType::Daily,
            item_id: "ML5".into(),
        }
        .into();
        assert!(matches!(err, ApiError::Validation(_)));

        let err: ApiError = QaError::UnitNotFound(9).into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = QaError::DuplicateName("Linac 1".into()).into();
        assert!(matches!(err, ApiError::Conflict(_)));

        let err: ApiError = QaError::InvalidReference.into();
        assert!(matches!(err, ApiError::Validation(_)));

        let err: ApiError = QaError::InvalidCredentials.into();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        let err: ApiError = QaError::AccountDisabled.into();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, ApiError::NotFound(_)));
    }

    #[test]
    fn test_session_error_mapping() {
        use shared::session::SessionError;

        let err: ApiError = SessionError::Expired.into();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        let err: ApiError = SessionError::Invalid.into();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}
