//! QA report repository: the transactional session write and history
//! queries.

use sqlx::PgPool;

use domain::checklist::SessionType;
use domain::models::report::{
    expand_results, CreateSessionRequest, QaReport, ReportDetail, ReportFilters, ReportSummary,
};
use domain::QaError;

use crate::entities::{QaReportEntity, QaTestEntity, ReportSummaryEntity};

const REPORT_COLUMNS: &str =
    "id, date, qa_type, unit_id, performer, witness, comments, signature, created_at, created_by";

const TEST_COLUMNS: &str = "id, report_id, test_id, status, notes, measurement";

/// Repository for QA session reports and their owned test rows.
#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records a QA session: one report header plus one test row per
    /// checklist item, atomically.
    ///
    /// Validation happens before anything is written: the unit must exist,
    /// then the results map is checked against the registry (items absent
    /// from it are back-filled as `unset`). A failure on any row rolls the
    /// whole session back; no partial report is ever visible.
    pub async fn create_session(
        &self,
        qa_type: SessionType,
        request: &CreateSessionRequest,
        created_by: Option<i64>,
    ) -> Result<QaReport, QaError> {
        let unit_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM units WHERE id = $1)")
                .bind(request.unit_id)
                .fetch_one(&self.pool)
                .await?;
        if !unit_exists {
            return Err(QaError::UnitNotFound(request.unit_id));
        }

        let tests = expand_results(qa_type, &request.results)?;

        let mut tx = self.pool.begin().await?;

        let header = sqlx::query_as::<_, QaReportEntity>(&format!(
            r#"
            INSERT INTO qa_reports (date, qa_type, unit_id, performer, witness,
                                    comments, signature, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {REPORT_COLUMNS}
            "#,
        ))
        .bind(request.date)
        .bind(qa_type)
        .bind(request.unit_id)
        .bind(&request.performer)
        .bind(&request.witness)
        .bind(&request.comments)
        .bind(&request.signature)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        // Checklist sizes are small (max 18 rows); row-at-a-time inserts
        // inside the transaction are fine.
        for test in &tests {
            sqlx::query(
                r#"
                INSERT INTO qa_tests (report_id, test_id, status, notes, measurement)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(header.id)
            .bind(&test.test_id)
            .bind(test.status)
            .bind(&test.notes)
            .bind(test.measurement)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let mut report = header.into_report(Vec::new());
        report.tests = tests;
        Ok(report)
    }

    /// Loads a report with its tests joined to checklist metadata.
    pub async fn find_detail(&self, id: i64) -> Result<ReportDetail, QaError> {
        let header = sqlx::query_as::<_, QaReportEntity>(&format!(
            "SELECT {REPORT_COLUMNS} FROM qa_reports WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(QaError::ReportNotFound(id))?;

        let tests = sqlx::query_as::<_, QaTestEntity>(&format!(
            "SELECT {TEST_COLUMNS} FROM qa_tests WHERE report_id = $1 ORDER BY id ASC"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ReportDetail::from_report(header.into_report(tests)))
    }

    /// History query: optional conjunctive filters, newest first.
    ///
    /// The date range is inclusive on both ends. Ordering is `date`
    /// descending with ties broken by insertion order, the opposite of the
    /// trend query's chronological ascent.
    pub async fn query(&self, filters: &ReportFilters) -> Result<Vec<ReportSummary>, QaError> {
        let mut conditions: Vec<String> = Vec::new();
        let mut param = 0;

        if filters.start_date.is_some() {
            param += 1;
            conditions.push(format!("r.date >= ${param}"));
        }
        if filters.end_date.is_some() {
            param += 1;
            conditions.push(format!("r.date <= ${param}"));
        }
        if filters.qa_type.is_some() {
            param += 1;
            conditions.push(format!("r.qa_type = ${param}"));
        }
        if filters.unit_id.is_some() {
            param += 1;
            conditions.push(format!("r.unit_id = ${param}"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            r#"
            SELECT r.id, r.date, r.qa_type, r.unit_id, r.performer, r.witness, r.created_at,
                   COUNT(t.id) FILTER (WHERE t.status = 'pass') AS pass_count,
                   COUNT(t.id) FILTER (WHERE t.status = 'fail') AS fail_count,
                   COUNT(t.id) FILTER (WHERE t.status IN ('pass', 'fail')) AS total_tests
            FROM qa_reports r
            LEFT JOIN qa_tests t ON t.report_id = r.id
            {where_clause}
            GROUP BY r.id
            ORDER BY r.date DESC, r.id ASC
            "#,
        );

        let mut query = sqlx::query_as::<_, ReportSummaryEntity>(&sql);
        if let Some(start) = filters.start_date {
            query = query.bind(start);
        }
        if let Some(end) = filters.end_date {
            query = query.bind(end);
        }
        if let Some(qa_type) = filters.qa_type {
            query = query.bind(qa_type);
        }
        if let Some(unit_id) = filters.unit_id {
            query = query.bind(unit_id);
        }

        let entities = query.fetch_all(&self.pool).await?;
        Ok(entities.into_iter().map(Into::into).collect())
    }
}
