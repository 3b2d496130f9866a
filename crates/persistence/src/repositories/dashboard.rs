//! Dashboard queries: latest session dates and recent activity.

use chrono::NaiveDate;
use sqlx::PgPool;

use domain::checklist::SessionType;
use domain::models::report::ReportSummary;
use domain::QaError;

use crate::entities::ReportSummaryEntity;

/// Read-only queries backing the due-date dashboard.
///
/// The scheduler holds no state; these run fresh on every dashboard request
/// so sessions recorded moments ago flip the due flags immediately.
#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Date of the most recent report of the given type for a unit.
    pub async fn last_session_date(
        &self,
        unit_id: i64,
        qa_type: SessionType,
    ) -> Result<Option<NaiveDate>, QaError> {
        let last: Option<NaiveDate> = sqlx::query_scalar(
            "SELECT MAX(date) FROM qa_reports WHERE unit_id = $1 AND qa_type = $2",
        )
        .bind(unit_id)
        .bind(qa_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(last)
    }

    /// The most recently recorded reports across all units.
    pub async fn recent_reports(&self, limit: i64) -> Result<Vec<ReportSummary>, QaError> {
        let entities = sqlx::query_as::<_, ReportSummaryEntity>(
            r#"
            SELECT r.id, r.date, r.qa_type, r.unit_id, r.performer, r.witness, r.created_at,
                   COUNT(t.id) FILTER (WHERE t.status = 'pass') AS pass_count,
                   COUNT(t.id) FILTER (WHERE t.status = 'fail') AS fail_count,
                   COUNT(t.id) FILTER (WHERE t.status IN ('pass', 'fail')) AS total_tests
            FROM qa_reports r
            LEFT JOIN qa_tests t ON t.report_id = r.id
            GROUP BY r.id
            ORDER BY r.created_at DESC, r.id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }
}
