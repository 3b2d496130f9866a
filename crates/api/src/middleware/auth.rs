//! Session authentication middleware.
//!
//! Validates the signed session token (bearer header or cookie), loads the
//! account, and rejects missing, expired, or disabled sessions. Handlers
//! read the authenticated principal from request extensions.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use domain::models::user::Role;
use persistence::repositories::UserRepository;

use crate::app::AppState;
use crate::error::ApiError;

/// Name of the session cookie set on login.
pub const SESSION_COOKIE: &str = "linac_qa_session";

/// The authenticated principal, inserted into request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

/// Extracts the session token from the Authorization header or, failing
/// that, the session cookie.
fn token_from_request(req: &Request<Body>) -> Option<String> {
    if let Some(header) = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(token) = header.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    let cookies = req
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())?;

    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Middleware that requires a valid session.
///
/// The account is re-loaded on every request so that deactivation takes
/// effect immediately, regardless of outstanding tokens.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = token_from_request(&req) else {
        return ApiError::Unauthorized("Authentication required".into()).into_response();
    };

    let claims = match state.sessions.validate(&token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("Session validation failed: {}", e);
            return ApiError::from(e).into_response();
        }
    };

    let Some(user_id) = claims.user_id() else {
        return ApiError::Unauthorized("Invalid session token".into()).into_response();
    };

    let user = match UserRepository::new(state.pool.clone()).find(user_id).await {
        Ok(user) => user,
        Err(domain::QaError::UserNotFound(_)) => {
            return ApiError::Unauthorized("Invalid session token".into()).into_response();
        }
        Err(e) => return ApiError::from(e).into_response(),
    };

    if !user.active {
        return ApiError::Unauthorized("Account is disabled".into()).into_response();
    }

    req.extensions_mut().insert(CurrentUser {
        id: user.id,
        username: user.username,
        role: user.role,
    });
    next.run(req).await
}

/// Middleware gating admin-only routes; must run inside `require_auth`.
///
/// The check goes through the role capability methods, not string
/// comparison.
pub async fn require_admin(req: Request<Body>, next: Next) -> Response {
    let Some(user) = req.extensions().get::<CurrentUser>() else {
        return ApiError::Unauthorized("Authentication required".into()).into_response();
    };

    if !user.role.can_manage_users() {
        return ApiError::Forbidden("Admin access required".into()).into_response();
    }

    next.run(req).await
}

/// Builds the Set-Cookie value for a fresh session token.
pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    )
}

/// Builds the Set-Cookie value that clears the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}
