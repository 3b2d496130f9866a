//! Admin endpoints: user management, audit trail, and data export.
//!
//! All routes here sit behind the admin capability check.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue},
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain::models::user::{CreateUserRequest, UpdateUserRequest, UserView};
use domain::models::{AuditAction, AuditEntry, ExportDocument, NewAuditEntry};
use persistence::repositories::{AuditLogRepository, ExportRepository, UserRepository};
use shared::password::hash_password;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::routes::client_ip;

const DEFAULT_AUDIT_LIMIT: i64 = 200;
const MAX_AUDIT_LIMIT: i64 = 1000;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersResponse {
    pub users: Vec<UserView>,
}

/// Lists all accounts.
///
/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ListUsersResponse>, ApiError> {
    let users = UserRepository::new(state.pool.clone()).list().await?;

    Ok(Json(ListUsersResponse {
        users: users.into_iter().map(Into::into).collect(),
    }))
}

/// Creates a user account.
///
/// POST /api/v1/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<UserView>, ApiError> {
    request.validate()?;

    let password_hash =
        hash_password(&request.password).map_err(|e| ApiError::Internal(e.to_string()))?;

    let user = UserRepository::new(state.pool.clone())
        .create(&request, &password_hash)
        .await?;

    AuditLogRepository::new(state.pool.clone()).append_async(
        NewAuditEntry::new(
            &current.username,
            AuditAction::SaveUser,
            format!("User saved: {}", user.username),
        )
        .with_ip(client_ip(&headers)),
    );

    Ok(Json(user.into()))
}

/// Partially updates a user account; a present password is re-hashed.
///
/// PUT /api/v1/admin/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserView>, ApiError> {
    request.validate()?;

    let password_hash = match &request.password {
        Some(password) => {
            Some(hash_password(password).map_err(|e| ApiError::Internal(e.to_string()))?)
        }
        None => None,
    };

    let user = UserRepository::new(state.pool.clone())
        .update(id, &request, password_hash)
        .await?;

    AuditLogRepository::new(state.pool.clone()).append_async(
        NewAuditEntry::new(
            &current.username,
            AuditAction::SaveUser,
            format!("User saved: {}", user.username),
        )
        .with_ip(client_ip(&headers)),
    );

    Ok(Json(user.into()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResponse {
    pub entries: Vec<AuditEntry>,
}

/// The most recent audit entries, newest first.
///
/// GET /api/v1/admin/audit?limit=200
pub async fn get_audit_log(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<AuditResponse>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_AUDIT_LIMIT)
        .clamp(1, MAX_AUDIT_LIMIT);

    let entries = AuditLogRepository::new(state.pool.clone())
        .recent(limit)
        .await?;

    Ok(Json(AuditResponse { entries }))
}

/// Full point-in-time JSON dump of all entities.
///
/// GET /api/v1/admin/export
pub async fn export_data(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
) -> Result<(HeaderMap, Json<ExportDocument>), ApiError> {
    let document = ExportRepository::new(state.pool.clone())
        .full_export()
        .await?;

    AuditLogRepository::new(state.pool.clone()).append_async(
        NewAuditEntry::new(&current.username, AuditAction::Export, "Full database export")
            .with_ip(client_ip(&headers)),
    );

    let mut response_headers = HeaderMap::new();
    let disposition = format!(
        "attachment; filename=linac_qa_export_{}.json",
        Utc::now().date_naive()
    );
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        response_headers.insert(header::CONTENT_DISPOSITION, value);
    }

    Ok((response_headers, Json(document)))
}
