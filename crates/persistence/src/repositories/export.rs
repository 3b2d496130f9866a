//! Full-database export.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::PgPool;

use domain::models::ExportDocument;
use domain::QaError;

use crate::entities::{
    AuditLogEntity, OutputReadingEntity, QaReportEntity, QaTestEntity, UnitEntity,
};

/// Builds the point-in-time JSON dump of all persisted entities.
#[derive(Clone)]
pub struct ExportRepository {
    pool: PgPool,
}

impl ExportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Reads every entity and assembles the export document. Tests are
    /// grouped under their owning report; the checklist registry and user
    /// credentials are never part of the dump.
    pub async fn full_export(&self) -> Result<ExportDocument, QaError> {
        let units = sqlx::query_as::<_, UnitEntity>(
            r#"
            SELECT id, name, manufacturer, model, serial_number, location, install_date,
                   photon_energies, electron_energies, fff_energies, active,
                   created_at, updated_at
            FROM units ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let headers = sqlx::query_as::<_, QaReportEntity>(
            r#"
            SELECT id, date, qa_type, unit_id, performer, witness, comments, signature,
                   created_at, created_by
            FROM qa_reports ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let tests = sqlx::query_as::<_, QaTestEntity>(
            "SELECT id, report_id, test_id, status, notes, measurement \
             FROM qa_tests ORDER BY report_id ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let readings = sqlx::query_as::<_, OutputReadingEntity>(
            "SELECT id, date, unit_id, energy, reading, reference, deviation, created_at \
             FROM output_readings ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let audit = sqlx::query_as::<_, AuditLogEntity>(
            "SELECT id, timestamp, actor, action, details, ip_address \
             FROM audit_log ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut tests_by_report: HashMap<i64, Vec<QaTestEntity>> = HashMap::new();
        for test in tests {
            tests_by_report.entry(test.report_id).or_default().push(test);
        }

        let reports = headers
            .into_iter()
            .map(|header| {
                let rows = tests_by_report.remove(&header.id).unwrap_or_default();
                header.into_report(rows)
            })
            .collect();

        Ok(ExportDocument {
            exported_at: Utc::now(),
            units: units.into_iter().map(Into::into).collect(),
            reports,
            output_readings: readings.into_iter().map(Into::into).collect(),
            audit_log: audit.into_iter().map(Into::into).collect(),
        })
    }
}
