//! Output trend repository.

use chrono::NaiveDate;
use sqlx::PgPool;

use domain::models::output::{deviation, RecordReadingRequest};
use domain::models::OutputReading;
use domain::QaError;

use crate::entities::OutputReadingEntity;

const READING_COLUMNS: &str =
    "id, date, unit_id, energy, reading, reference, deviation, created_at";

/// Repository for output-constancy readings.
#[derive(Clone)]
pub struct OutputReadingRepository {
    pool: PgPool,
}

impl OutputReadingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records a reading. The deviation is computed here, once, and stored
    /// next to the raw values; historical rows are never recomputed. A zero
    /// reference fails before anything is written.
    pub async fn record(&self, request: &RecordReadingRequest) -> Result<OutputReading, QaError> {
        let deviation = deviation(request.reading, request.reference)?;

        let entity = sqlx::query_as::<_, OutputReadingEntity>(&format!(
            r#"
            INSERT INTO output_readings (date, unit_id, energy, reading, reference, deviation)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {READING_COLUMNS}
            "#,
        ))
        .bind(request.date)
        .bind(request.unit_id)
        .bind(&request.energy)
        .bind(request.reading)
        .bind(request.reference)
        .bind(deviation)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity.into())
    }

    /// Readings for one unit+energy with `date >= since`, chronological.
    ///
    /// Ascending order is deliberate: trend consumers plot left to right in
    /// time, unlike the report history which scans newest first.
    pub async fn trend(
        &self,
        unit_id: i64,
        energy: &str,
        since: NaiveDate,
    ) -> Result<Vec<OutputReading>, QaError> {
        let entities = sqlx::query_as::<_, OutputReadingEntity>(&format!(
            r#"
            SELECT {READING_COLUMNS}
            FROM output_readings
            WHERE unit_id = $1 AND energy = $2 AND date >= $3
            ORDER BY date ASC, id ASC
            "#,
        ))
        .bind(unit_id)
        .bind(energy)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }
}
