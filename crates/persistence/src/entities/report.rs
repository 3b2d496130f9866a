//! QA report and test entities (database row mappings).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use domain::checklist::SessionType;
use domain::models::report::{QaReport, QaTest, ReportSummary, TestStatus};

/// Database row mapping for the qa_reports table (header only; test rows
/// are loaded separately and attached by the repository).
#[derive(Debug, Clone, FromRow)]
pub struct QaReportEntity {
    pub id: i64,
    pub date: NaiveDate,
    pub qa_type: SessionType,
    pub unit_id: i64,
    pub performer: String,
    pub witness: Option<String>,
    pub comments: Option<String>,
    pub signature: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<i64>,
}

impl QaReportEntity {
    /// Assembles the domain report from the header and its test rows.
    pub fn into_report(self, tests: Vec<QaTestEntity>) -> QaReport {
        QaReport {
            id: self.id,
            date: self.date,
            qa_type: self.qa_type,
            unit_id: self.unit_id,
            performer: self.performer,
            witness: self.witness,
            comments: self.comments,
            signature: self.signature,
            created_at: self.created_at,
            created_by: self.created_by,
            tests: tests.into_iter().map(Into::into).collect(),
        }
    }
}

/// Database row mapping for the qa_tests table.
#[derive(Debug, Clone, FromRow)]
pub struct QaTestEntity {
    pub id: i64,
    pub report_id: i64,
    pub test_id: String,
    pub status: TestStatus,
    pub notes: Option<String>,
    pub measurement: Option<f64>,
}

impl From<QaTestEntity> for QaTest {
    fn from(entity: QaTestEntity) -> Self {
        Self {
            test_id: entity.test_id,
            status: entity.status,
            notes: entity.notes,
            measurement: entity.measurement,
        }
    }
}

/// Row mapping for the history query: header plus SQL-aggregated counts.
#[derive(Debug, Clone, FromRow)]
pub struct ReportSummaryEntity {
    pub id: i64,
    pub date: NaiveDate,
    pub qa_type: SessionType,
    pub unit_id: i64,
    pub performer: String,
    pub witness: Option<String>,
    pub created_at: DateTime<Utc>,
    pub pass_count: i64,
    pub fail_count: i64,
    pub total_tests: i64,
}

impl From<ReportSummaryEntity> for ReportSummary {
    fn from(entity: ReportSummaryEntity) -> Self {
        Self {
            id: entity.id,
            date: entity.date,
            qa_type: entity.qa_type,
            unit_id: entity.unit_id,
            performer: entity.performer,
            witness: entity.witness,
            created_at: entity.created_at,
            pass_count: entity.pass_count,
            fail_count: entity.fail_count,
            total_tests: entity.total_tests,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_rows_assemble_into_a_report() {
        let header = QaReportEntity {
            id: 10,
            date: NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
            qa_type: SessionType::Daily,
            unit_id: 1,
            performer: "B. Therapist".to_string(),
            witness: Some("A. Physicist".to_string()),
            comments: None,
            signature: None,
            created_at: Utc::now(),
            created_by: Some(3),
        };

        let rows = vec![
            QaTestEntity {
                id: 1,
                report_id: 10,
                test_id: "DL1".to_string(),
                status: TestStatus::Pass,
                notes: None,
                measurement: None,
            },
            QaTestEntity {
                id: 2,
                report_id: 10,
                test_id: "DL2".to_string(),
                status: TestStatus::Fail,
                notes: Some("indicator lamp out".to_string()),
                measurement: None,
            },
        ];

        let report = header.into_report(rows);
        assert_eq!(report.id, 10);
        assert_eq!(report.tests.len(), 2);
        assert_eq!(report.pass_count(), 1);
        assert_eq!(report.fail_count(), 1);
        assert_eq!(report.tests[1].notes.as_deref(), Some("indicator lamp out"));
    }

    #[test]
    fn summary_entity_converts_to_domain() {
        let entity = ReportSummaryEntity {
            id: 5,
            date: NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
            qa_type: SessionType::Monthly,
            unit_id: 2,
            performer: "A. Physicist".to_string(),
            witness: None,
            created_at: Utc::now(),
            pass_count: 14,
            fail_count: 1,
            total_tests: 15,
        };

        let summary: ReportSummary = entity.into();
        assert_eq!(summary.qa_type, SessionType::Monthly);
        assert_eq!(summary.total_tests, 15);
    }
}
