//! QA session reports and their test results.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::checklist::{self, SessionType};
use crate::error::QaError;

/// Outcome of a single checklist item within a session.
///
/// `NotApplicable` and `Unset` are excluded from the scored total.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "qa_test_status", rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
    #[serde(rename = "na")]
    #[sqlx(rename = "na")]
    NotApplicable,
    Unset,
}

impl TestStatus {
    /// Whether this status counts toward the scored total.
    pub fn is_scored(self) -> bool {
        matches!(self, TestStatus::Pass | TestStatus::Fail)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TestStatus::Pass => "pass",
            TestStatus::Fail => "fail",
            TestStatus::NotApplicable => "na",
            TestStatus::Unset => "unset",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pass" => Ok(TestStatus::Pass),
            "fail" => Ok(TestStatus::Fail),
            "na" => Ok(TestStatus::NotApplicable),
            "unset" | "" => Ok(TestStatus::Unset),
            other => Err(format!("Unknown test status: {}", other)),
        }
    }
}

/// One recorded checklist-item result. Owned exclusively by its report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaTest {
    pub test_id: String,
    pub status: TestStatus,
    pub notes: Option<String>,
    pub measurement: Option<f64>,
}

/// A QA session: one report header owning one result row per checklist item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaReport {
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
    pub tests: Vec<QaTest>,
}

impl QaReport {
    pub fn pass_count(&self) -> usize {
        self.tests
            .iter()
            .filter(|t| t.status == TestStatus::Pass)
            .count()
    }

    pub fn fail_count(&self) -> usize {
        self.tests
            .iter()
            .filter(|t| t.status == TestStatus::Fail)
            .count()
    }

    /// Scored items only; n/a and unset rows do not count.
    pub fn total_tests(&self) -> usize {
        self.tests.iter().filter(|t| t.status.is_scored()).count()
    }
}

/// Operator input for one checklist item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResultInput {
    pub status: TestStatus,
    pub notes: Option<String>,
    pub measurement: Option<f64>,
}

/// Request payload for recording a QA session.
///
/// `results` maps checklist-item ids to operator input; items absent from
/// the map are persisted with status `unset`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub date: NaiveDate,
    pub unit_id: i64,

    #[validate(length(min = 1, max = 100, message = "Performer must be between 1 and 100 characters"))]
    pub performer: String,

    #[validate(length(max = 100))]
    pub witness: Option<String>,

    pub comments: Option<String>,

    #[validate(length(max = 100))]
    pub signature: Option<String>,

    #[serde(default)]
    pub results: BTreeMap<String, TestResultInput>,
}

/// Validates `results` against the registry and expands it to the full
/// checklist in canonical order, back-filling `unset` rows.
///
/// A single unknown key rejects the whole map; the caller must not have
/// written anything yet.
pub fn expand_results(
    qa_type: SessionType,
    results: &BTreeMap<String, TestResultInput>,
) -> Result<Vec<QaTest>, QaError> {
    for key in results.keys() {
        if !checklist::contains(qa_type, key) {
            return Err(QaError::UnknownChecklistItem {
                session_type: qa_type,
                item_id: key.clone(),
            });
        }
    }

    Ok(checklist::schedule(qa_type)
        .iter()
        .map(|item| match results.get(item.id) {
            Some(input) => QaTest {
                test_id: item.id.to_string(),
                status: input.status,
                notes: input.notes.clone(),
                measurement: input.measurement,
            },
            None => QaTest {
                test_id: item.id.to_string(),
                status: TestStatus::Unset,
                notes: None,
                measurement: None,
            },
        })
        .collect())
}

/// Optional conjunctive filters for the report history query.
#[derive(Debug, Clone, Default)]
pub struct ReportFilters {
    /// Inclusive lower bound on the report date.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the report date.
    pub end_date: Option<NaiveDate>,
    pub qa_type: Option<SessionType>,
    pub unit_id: Option<i64>,
}

/// Report header with computed counts, as returned by the history query.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub id: i64,
    pub date: NaiveDate,
    pub qa_type: SessionType,
    pub unit_id: i64,
    pub performer: String,
    pub witness: Option<String>,
    pub created_at: DateTime<Utc>,
    pub pass_count: i64,
    pub fail_count: i64,
    /// Scored items only (pass + fail).
    pub total_tests: i64,
}

/// One test row joined with its checklist metadata for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTestDetail {
    pub test_id: String,
    pub description: &'static str,
    pub tolerance: &'static str,
    pub action: &'static str,
    pub status: TestStatus,
    pub notes: Option<String>,
    pub measurement: Option<f64>,
}

/// A full report joined with checklist metadata and computed counts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDetail {
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
    pub tests: Vec<ReportTestDetail>,
    pub pass_count: usize,
    pub fail_count: usize,
    pub total_tests: usize,
}

impl ReportDetail {
    /// Joins a report's tests with registry metadata, in canonical
    /// checklist order.
    pub fn from_report(report: QaReport) -> Self {
        let by_id: BTreeMap<&str, &QaTest> = report
            .tests
            .iter()
            .map(|t| (t.test_id.as_str(), t))
            .collect();

        let tests: Vec<ReportTestDetail> = checklist::schedule(report.qa_type)
            .iter()
            .filter_map(|item| {
                by_id.get(item.id).map(|t| ReportTestDetail {
                    test_id: t.test_id.clone(),
                    description: item.description,
                    tolerance: item.tolerance,
                    action: item.action,
                    status: t.status,
                    notes: t.notes.clone(),
                    measurement: t.measurement,
                })
            })
            .collect();

        Self {
            pass_count: report.pass_count(),
            fail_count: report.fail_count(),
            total_tests: report.total_tests(),
            id: report.id,
            date: report.date,
            qa_type: report.qa_type,
            unit_id: report.unit_id,
            performer: report.performer,
            witness: report.witness,
            comments: report.comments,
            signature: report.signature,
            created_at: report.created_at,
            created_by: report.created_by,
            tests,
        }
    }
}
