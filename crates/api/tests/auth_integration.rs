//! Integration tests for authentication and role gating.

mod common;

use axum::http::{header, Method, StatusCode};
use common::{
    authenticated_token, create_test_user, json_request, login, parse_response_body, test_app,
    try_test_pool, unique, wait_for_audit,
};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn login_issues_a_working_session() {
    let Some(pool) = try_test_pool().await else { return };
    let app = test_app(pool.clone());

    let username = unique("physicist");
    create_test_user(&pool, &username, "correct-password", "physicist", true).await;

    let request = json_request(
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": username, "password": "correct-password" })),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Browser clients get an httpOnly session cookie as well.
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cookie.contains("linac_qa_session="));
    assert!(cookie.contains("HttpOnly"));

    let body = parse_response_body(response).await;
    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["username"], username.as_str());
    assert!(body["user"].get("passwordHash").is_none());

    // The token opens protected routes.
    let request = json_request(Method::GET, "/api/v1/units", Some(&token), None);
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // last_login was stamped.
    let last_login: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT last_login FROM users WHERE username = $1")
            .bind(&username)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(last_login.is_some());

    assert!(wait_for_audit(&pool, "LOGIN", "%logged in%").await);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let Some(pool) = try_test_pool().await else { return };
    let app = test_app(pool.clone());

    let username = unique("physicist");
    create_test_user(&pool, &username, "correct-password", "physicist", true).await;

    let request = json_request(
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": username, "password": "wrong-password" })),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The message must not reveal which part was wrong.
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Invalid username or password");
}

#[tokio::test]
async fn unknown_username_is_unauthorized() {
    let Some(pool) = try_test_pool().await else { return };
    let app = test_app(pool.clone());

    let request = json_request(
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": unique("ghost"), "password": "whatever1" })),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn disabled_account_cannot_log_in() {
    let Some(pool) = try_test_pool().await else { return };
    let app = test_app(pool.clone());

    let username = unique("disabled");
    create_test_user(&pool, &username, "correct-password", "physicist", false).await;

    let request = json_request(
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": username, "password": "correct-password" })),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn deactivation_revokes_outstanding_sessions() {
    let Some(pool) = try_test_pool().await else { return };
    let app = test_app(pool.clone());

    let username = unique("leaver");
    create_test_user(&pool, &username, "correct-password", "therapist", true).await;
    let token = login(&app, &username, "correct-password").await;

    sqlx::query("UPDATE users SET active = false WHERE username = $1")
        .bind(&username)
        .execute(&pool)
        .await
        .unwrap();

    // The account is re-checked on every request, so the old token dies
    // with the account.
    let request = json_request(Method::GET, "/api/v1/units", Some(&token), None);
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_reject_missing_and_garbage_tokens() {
    let Some(pool) = try_test_pool().await else { return };
    let app = test_app(pool.clone());

    let request = json_request(Method::GET, "/api/v1/units", None, None);
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = json_request(Method::GET, "/api/v1/units", Some("not-a-token"), None);
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_are_gated_by_role() {
    let Some(pool) = try_test_pool().await else { return };
    let app = test_app(pool.clone());

    let physicist = authenticated_token(&pool, &app, "physicist").await;
    let request = json_request(Method::GET, "/api/v1/admin/users", Some(&physicist), None);
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin = authenticated_token(&pool, &app, "admin").await;
    let request = json_request(Method::GET, "/api/v1/admin/users", Some(&admin), None);
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_manages_accounts_and_it_is_audited() {
    let Some(pool) = try_test_pool().await else { return };
    let app = test_app(pool.clone());
    let admin = authenticated_token(&pool, &app, "admin").await;

    let username = unique("newtherapist");
    let request = json_request(
        Method::POST,
        "/api/v1/admin/users",
        Some(&admin),
        Some(json!({
            "username": username,
            "email": format!("{}@hospital.local", username),
            "password": "initial-password-1",
            "fullName": "New Therapist",
            "role": "therapist"
        })),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let user_id = parse_response_body(response).await["id"].as_i64().unwrap();

    // The fresh account can log in.
    login(&app, &username, "initial-password-1").await;

    // Password change through partial update.
    let request = json_request(
        Method::PUT,
        &format!("/api/v1/admin/users/{}", user_id),
        Some(&admin),
        Some(json!({ "password": "rotated-password-1" })),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    login(&app, &username, "rotated-password-1").await;

    assert!(wait_for_audit(&pool, "SAVE_USER", &format!("%{}%", username)).await);
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let Some(pool) = try_test_pool().await else { return };
    let app = test_app(pool.clone());
    let token = authenticated_token(&pool, &app, "physicist").await;

    let request = json_request(Method::POST, "/api/v1/auth/logout", Some(&token), None);
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(cookie.contains("Max-Age=0"));
}
