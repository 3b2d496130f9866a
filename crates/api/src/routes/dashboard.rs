//! Dashboard endpoint: per-unit due status and recent activity.

use axum::{extract::State, Json};
use chrono::{NaiveDate, Utc};
use serde::Serialize;

use domain::checklist::SessionType;
use domain::models::report::ReportSummary;
use domain::models::UnitQaStatus;
use persistence::repositories::{DashboardRepository, UnitRepository};

use crate::app::AppState;
use crate::error::ApiError;

const RECENT_REPORT_LIMIT: i64 = 10;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub today: NaiveDate,
    pub units: Vec<UnitQaStatus>,
    pub recent_reports: Vec<ReportSummary>,
}

/// The QA dashboard: due flags per active unit plus recent reports.
///
/// GET /api/v1/dashboard
///
/// Recomputed from the session store on every request; a session recorded
/// moments ago flips the flags immediately.
pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let today = Utc::now().date_naive();

    let units = UnitRepository::new(state.pool.clone()).list(true).await?;
    let dashboard = DashboardRepository::new(state.pool.clone());

    let mut statuses = Vec::with_capacity(units.len());
    for unit in units {
        let last_daily = dashboard
            .last_session_date(unit.id, SessionType::Daily)
            .await?;
        let last_monthly = dashboard
            .last_session_date(unit.id, SessionType::Monthly)
            .await?;

        statuses.push(UnitQaStatus::derive(unit, last_daily, last_monthly, today));
    }

    let recent_reports = dashboard.recent_reports(RECENT_REPORT_LIMIT).await?;

    Ok(Json(DashboardResponse {
        today,
        units: statuses,
        recent_reports,
    }))
}
