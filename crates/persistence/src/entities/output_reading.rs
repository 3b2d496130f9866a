//! Output reading entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use domain::models::OutputReading;

/// Database row mapping for the output_readings table.
#[derive(Debug, Clone, FromRow)]
pub struct OutputReadingEntity {
    pub id: i64,
    pub date: NaiveDate,
    pub unit_id: i64,
    pub energy: String,
    pub reading: f64,
    pub reference: f64,
    pub deviation: f64,
    pub created_at: DateTime<Utc>,
}

impl From<OutputReadingEntity> for OutputReading {
    fn from(entity: OutputReadingEntity) -> Self {
        Self {
            id: entity.id,
            date: entity.date,
            unit_id: entity.unit_id,
            energy: entity.energy,
            reading: entity.reading,
            reference: entity.reference,
            deviation: entity.deviation,
            created_at: entity.created_at,
        }
    }
}
