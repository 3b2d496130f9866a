//! Full-database export document.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::audit::AuditEntry;
use super::output::OutputReading;
use super::report::QaReport;
use super::unit::Unit;

/// Point-in-time dump of all persisted entities, for portability.
///
/// Tests ride embedded under their owning report. The checklist registry is
/// compiled reference data and is never exported; user credentials stay out
/// of the dump entirely. Dates and timestamps serialize as ISO-8601.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub exported_at: DateTime<Utc>,
    pub units: Vec<Unit>,
    pub reports: Vec<QaReport>,
    pub output_readings: Vec<OutputReading>,
    pub audit_log: Vec<AuditEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::SessionType;
    use crate::models::report::{QaTest, TestStatus};
    use chrono::NaiveDate;

    #[test]
    fn tests_are_embedded_under_their_report() {
        let doc = ExportDocument {
            exported_at: Utc::now(),
            units: vec![],
            reports: vec![QaReport {
                id: 1,
                date: NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(),
                qa_type: SessionType::Quarterly,
                unit_id: 1,
                performer: "A. Physicist".to_string(),
                witness: None,
                comments: None,
                signature: None,
                created_at: Utc::now(),
                created_by: None,
                tests: vec![QaTest {
                    test_id: "Q1".to_string(),
                    status: TestStatus::Pass,
                    notes: None,
                    measurement: Some(99.6),
                }],
            }],
            output_readings: vec![],
            audit_log: vec![],
        };

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["reports"][0]["tests"][0]["testId"], "Q1");
        assert_eq!(json["reports"][0]["date"], "2024-05-20");
        assert_eq!(json["reports"][0]["qaType"], "quarterly");
    }
}
