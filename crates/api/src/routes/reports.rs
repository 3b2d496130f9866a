//! QA session endpoints: recording, history, and report detail.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Extension, Json,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain::checklist::SessionType;
use domain::models::report::{
    CreateSessionRequest, QaReport, ReportDetail, ReportFilters, ReportSummary,
};
use domain::models::{AuditAction, NewAuditEntry};
use persistence::repositories::{AuditLogRepository, ReportRepository, UnitRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::routes::client_ip;

/// History defaults to the most recent 30 days when the caller supplies no
/// range.
const DEFAULT_HISTORY_DAYS: i64 = 30;

/// Records a QA session for one unit.
///
/// POST /api/v1/qa/:qa_type
///
/// The results map is validated against the checklist registry before
/// anything is written; missing items are stored as `unset`. The report
/// and all its test rows commit atomically.
pub async fn create_session(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    Path(qa_type): Path<String>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<QaReport>, ApiError> {
    let qa_type: SessionType = qa_type.parse()?;
    request.validate()?;

    let unit = UnitRepository::new(state.pool.clone())
        .find(request.unit_id)
        .await?;

    let report = ReportRepository::new(state.pool.clone())
        .create_session(qa_type, &request, Some(user.id))
        .await?;

    AuditLogRepository::new(state.pool.clone()).append_async(
        NewAuditEntry::new(
            &user.username,
            AuditAction::SaveQa,
            format!(
                "{} QA saved for {} on {}",
                qa_type.as_str().to_uppercase(),
                unit.name,
                report.date
            ),
        )
        .with_ip(client_ip(&headers)),
    );

    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Session type filter; absent or "all" means no filter.
    pub qa_type: Option<String>,
    pub unit_id: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reports: Vec<ReportSummary>,
}

/// QA history, newest first.
///
/// GET /api/v1/reports?startDate=&endDate=&qaType=&unitId=
///
/// Filters are conjunctive and the date range is inclusive on both ends.
pub async fn query_reports(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let today = Utc::now().date_naive();
    let end_date = query.end_date.unwrap_or(today);
    let start_date = query
        .start_date
        .unwrap_or_else(|| today - Duration::days(DEFAULT_HISTORY_DAYS));

    let qa_type = match query.qa_type.as_deref() {
        None | Some("all") => None,
        Some(raw) => Some(raw.parse::<SessionType>()?),
    };

    let filters = ReportFilters {
        start_date: Some(start_date),
        end_date: Some(end_date),
        qa_type,
        unit_id: query.unit_id,
    };

    let reports = ReportRepository::new(state.pool.clone())
        .query(&filters)
        .await?;

    Ok(Json(HistoryResponse {
        start_date,
        end_date,
        reports,
    }))
}

/// One report with its tests joined to checklist metadata.
///
/// GET /api/v1/reports/:id
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ReportDetail>, ApiError> {
    let detail = ReportRepository::new(state.pool.clone())
        .find_detail(id)
        .await?;

    Ok(Json(detail))
}
