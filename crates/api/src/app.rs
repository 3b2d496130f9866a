use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use shared::session::SessionKeys;

use crate::config::Config;
use crate::middleware::{require_admin, require_auth};
use crate::routes::{admin, auth, checklist, dashboard, health, readings, reports, units};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub sessions: Arc<SessionKeys>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let sessions = Arc::new(SessionKeys::new(
        &config.auth.session_secret,
        config.auth.session_expiry_hours,
    ));
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
        sessions,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Protected routes (require a valid session)
    let protected_routes = Router::new()
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/checklists/:qa_type", get(checklist::get_checklist))
        .route("/api/v1/units", get(units::list_units).post(units::create_unit))
        .route("/api/v1/units/:id", get(units::get_unit).put(units::update_unit))
        .route("/api/v1/qa/:qa_type", post(reports::create_session))
        .route("/api/v1/reports", get(reports::query_reports))
        .route("/api/v1/reports/:id", get(reports::get_report))
        .route("/api/v1/readings", post(readings::record_reading))
        .route("/api/v1/trends", get(readings::get_trend))
        .route("/api/v1/dashboard", get(dashboard::get_dashboard))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Admin routes (require the admin role)
    // Middleware order: auth runs first (outermost), then the role check.
    let admin_routes = Router::new()
        .route(
            "/api/v1/admin/users",
            get(admin::list_users).post(admin::create_user),
        )
        .route("/api/v1/admin/users/:id", put(admin::update_user))
        .route("/api/v1/admin/audit", get(admin::get_audit_log))
        .route("/api/v1/admin/export", get(admin::export_data))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/v1/auth/login", post(auth::login));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
