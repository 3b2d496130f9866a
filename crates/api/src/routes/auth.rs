//! Authentication endpoints: login and logout.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain::models::user::UserView;
use domain::models::{AuditAction, NewAuditEntry};
use domain::QaError;
use persistence::repositories::{AuditLogRepository, UserRepository};
use shared::password::verify_password;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::auth::{clear_session_cookie, session_cookie};
use crate::middleware::CurrentUser;
use crate::routes::client_ip;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: UserView,
}

/// Verifies credentials and opens a session.
///
/// POST /api/v1/auth/login
///
/// The token is returned in the body for API clients and set as an
/// httpOnly cookie for browser clients. The error message never reveals
/// whether the username or the password was wrong.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<LoginResponse>), ApiError> {
    request.validate()?;

    let users = UserRepository::new(state.pool.clone());

    let user = users
        .find_by_username(&request.username)
        .await?
        .ok_or(QaError::InvalidCredentials)?;

    if !verify_password(&request.password, &user.password_hash)
        .map_err(|e| ApiError::Internal(e.to_string()))?
    {
        return Err(QaError::InvalidCredentials.into());
    }

    if !user.active {
        return Err(QaError::AccountDisabled.into());
    }

    users.touch_last_login(user.id).await?;

    let token = state.sessions.issue(user.id, &user.username)?;

    AuditLogRepository::new(state.pool.clone()).append_async(
        NewAuditEntry::new(&user.username, AuditAction::Login, "User logged in")
            .with_ip(client_ip(&headers)),
    );

    let mut response_headers = HeaderMap::new();
    let cookie = session_cookie(&token, state.config.auth.session_expiry_hours * 3600);
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response_headers.insert(SET_COOKIE, value);
    }

    Ok((
        response_headers,
        Json(LoginResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// Closes the current session.
///
/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
) -> Result<(HeaderMap, Json<serde_json::Value>), ApiError> {
    AuditLogRepository::new(state.pool.clone()).append_async(
        NewAuditEntry::new(&user.username, AuditAction::Logout, "User logged out")
            .with_ip(client_ip(&headers)),
    );

    let mut response_headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&clear_session_cookie()) {
        response_headers.insert(SET_COOKIE, value);
    }

    Ok((response_headers, Json(serde_json::json!({ "status": "ok" }))))
}
