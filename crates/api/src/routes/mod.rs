//! HTTP route handlers.

pub mod admin;
pub mod auth;
pub mod checklist;
pub mod dashboard;
pub mod health;
pub mod readings;
pub mod reports;
pub mod units;

use axum::http::HeaderMap;

/// Best-effort client address for audit entries, from the proxy header.
pub(crate) fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
