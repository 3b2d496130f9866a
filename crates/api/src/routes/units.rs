//! Unit configuration endpoints.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain::models::unit::{CreateUnitRequest, UpdateUnitRequest};
use domain::models::{AuditAction, NewAuditEntry, Unit};
use persistence::repositories::{AuditLogRepository, UnitRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::routes::client_ip;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUnitsQuery {
    /// When true, only active units are returned.
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUnitsResponse {
    pub units: Vec<Unit>,
}

/// Unit detail, with the derived photon+FFF energy list the selection UIs
/// need.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitDetailResponse {
    #[serde(flatten)]
    pub unit: Unit,
    pub all_photon_energies: Vec<String>,
}

impl From<Unit> for UnitDetailResponse {
    fn from(unit: Unit) -> Self {
        Self {
            all_photon_energies: unit.all_photon_energies(),
            unit,
        }
    }
}

/// Lists units in insertion order.
///
/// GET /api/v1/units?active=true
pub async fn list_units(
    State(state): State<AppState>,
    Query(query): Query<ListUnitsQuery>,
) -> Result<Json<ListUnitsResponse>, ApiError> {
    let units = UnitRepository::new(state.pool.clone())
        .list(query.active)
        .await?;

    Ok(Json(ListUnitsResponse { units }))
}

/// Unit detail.
///
/// GET /api/v1/units/:id
pub async fn get_unit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UnitDetailResponse>, ApiError> {
    let unit = UnitRepository::new(state.pool.clone()).find(id).await?;
    Ok(Json(unit.into()))
}

/// Creates a unit.
///
/// POST /api/v1/units
pub async fn create_unit(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    Json(request): Json<CreateUnitRequest>,
) -> Result<Json<UnitDetailResponse>, ApiError> {
    request.validate()?;

    let unit = UnitRepository::new(state.pool.clone())
        .create(&request)
        .await?;

    AuditLogRepository::new(state.pool.clone()).append_async(
        NewAuditEntry::new(
            &user.username,
            AuditAction::SaveUnit,
            format!(
                "Unit configuration saved: {} (S/N: {})",
                unit.name, unit.serial_number
            ),
        )
        .with_ip(client_ip(&headers)),
    );

    Ok(Json(unit.into()))
}

/// Partially updates a unit; absent fields keep their value.
///
/// PUT /api/v1/units/:id
pub async fn update_unit(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUnitRequest>,
) -> Result<Json<UnitDetailResponse>, ApiError> {
    request.validate()?;

    let unit = UnitRepository::new(state.pool.clone())
        .update(id, &request)
        .await?;

    AuditLogRepository::new(state.pool.clone()).append_async(
        NewAuditEntry::new(
            &user.username,
            AuditAction::SaveUnit,
            format!(
                "Unit configuration saved: {} (S/N: {})",
                unit.name, unit.serial_number
            ),
        )
        .with_ip(client_ip(&headers)),
    );

    Ok(Json(unit.into()))
}
