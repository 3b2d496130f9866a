//! Output-reading endpoints: recording and trend retrieval.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Extension, Json,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain::models::output::{RecordReadingRequest, TrendPoint};
use domain::models::{AuditAction, NewAuditEntry, OutputReading};
use persistence::repositories::{AuditLogRepository, OutputReadingRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::routes::client_ip;

/// Trend window when the caller gives no explicit span.
const DEFAULT_TREND_DAYS: i64 = 30;

/// Records an output-constancy reading.
///
/// POST /api/v1/readings
///
/// The deviation is computed here, once, and returned with the stored row.
/// A zero reference is rejected before any write.
pub async fn record_reading(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    Json(request): Json<RecordReadingRequest>,
) -> Result<Json<OutputReading>, ApiError> {
    request.validate()?;

    let reading = OutputReadingRepository::new(state.pool.clone())
        .record(&request)
        .await?;

    AuditLogRepository::new(state.pool.clone()).append_async(
        NewAuditEntry::new(
            &user.username,
            AuditAction::SaveReading,
            format!(
                "Output reading saved for unit {} {} on {}",
                reading.unit_id, reading.energy, reading.date
            ),
        )
        .with_ip(client_ip(&headers)),
    );

    Ok(Json(reading))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendQuery {
    pub unit_id: i64,
    pub energy: String,
    /// Window size in days, counting back from today.
    pub days: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendResponse {
    pub unit_id: i64,
    pub energy: String,
    pub since: NaiveDate,
    pub points: Vec<TrendPoint>,
}

/// Deviation trend for one unit and energy, chronological.
///
/// GET /api/v1/trends?unitId=&energy=&days=30
///
/// Points ascend by date — ready for plotting left to right, unlike the
/// newest-first report history.
pub async fn get_trend(
    State(state): State<AppState>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<TrendResponse>, ApiError> {
    let days = query.days.unwrap_or(DEFAULT_TREND_DAYS);
    if days <= 0 {
        return Err(ApiError::Validation("days must be positive".into()));
    }

    let since = Utc::now().date_naive() - Duration::days(days);

    let readings = OutputReadingRepository::new(state.pool.clone())
        .trend(query.unit_id, &query.energy, since)
        .await?;

    Ok(Json(TrendResponse {
        unit_id: query.unit_id,
        energy: query.energy,
        since,
        points: readings.iter().map(TrendPoint::from).collect(),
    }))
}
