//! Checklist registry endpoint.

use axum::{extract::Path, Json};
use serde::Serialize;

use domain::checklist::{schedule, ChecklistItem, SessionType};

use crate::error::ApiError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistResponse {
    pub qa_type: SessionType,
    pub items: &'static [ChecklistItem],
}

/// The fixed checklist for one session type, in canonical order.
///
/// GET /api/v1/checklists/:qa_type
pub async fn get_checklist(
    Path(qa_type): Path<String>,
) -> Result<Json<ChecklistResponse>, ApiError> {
    let qa_type: SessionType = qa_type.parse()?;

    Ok(Json(ChecklistResponse {
        qa_type,
        items: schedule(qa_type),
    }))
}
