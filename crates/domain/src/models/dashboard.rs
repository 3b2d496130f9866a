//! Due-date scheduling over recorded QA sessions.
//!
//! Pure read-time computation; the scheduler holds no state of its own and
//! is recomputed on every dashboard request so QA activity between requests
//! is reflected immediately.

use chrono::NaiveDate;
use serde::Serialize;

use super::unit::Unit;

/// Monthly QA is due once the last monthly report is older than this.
pub const MONTHLY_INTERVAL_DAYS: i64 = 30;

/// Whether daily QA is due for a unit.
///
/// Daily QA is due every calendar day; "today" counts as covered only once
/// a report dated today exists.
pub fn daily_due(last_daily: Option<NaiveDate>, today: NaiveDate) -> bool {
    match last_daily {
        None => true,
        Some(date) => date < today,
    }
}

/// Whether monthly QA is due for a unit.
pub fn monthly_due(last_monthly: Option<NaiveDate>, today: NaiveDate) -> bool {
    match last_monthly {
        None => true,
        Some(date) => (today - date).num_days() > MONTHLY_INTERVAL_DAYS,
    }
}

/// Per-unit QA due status for the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitQaStatus {
    pub unit: Unit,
    pub last_daily: Option<NaiveDate>,
    pub last_monthly: Option<NaiveDate>,
    pub daily_due: bool,
    pub monthly_due: bool,
}

impl UnitQaStatus {
    /// Derives the due flags from the most recent session dates.
    pub fn derive(
        unit: Unit,
        last_daily: Option<NaiveDate>,
        last_monthly: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        Self {
            daily_due: daily_due(last_daily, today),
            monthly_due: monthly_due(last_monthly, today),
            unit,
            last_daily,
            last_monthly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_due_without_any_report() {
        assert!(daily_due(None, day(2024, 6, 1)));
    }

    #[test]
    fn daily_covered_by_report_dated_today() {
        let today = day(2024, 6, 1);
        assert!(!daily_due(Some(today), today));
    }

    #[test]
    fn daily_due_when_last_report_is_yesterday() {
        let today = day(2024, 6, 1);
        assert!(daily_due(Some(today - Duration::days(1)), today));
    }

    #[test]
    fn monthly_due_without_any_report() {
        assert!(monthly_due(None, day(2024, 6, 1)));
    }

    #[test]
    fn monthly_boundary_is_exactly_thirty_days() {
        let today = day(2024, 6, 1);
        assert!(!monthly_due(Some(today - Duration::days(30)), today));
        assert!(monthly_due(Some(today - Duration::days(31)), today));
    }

    #[test]
    fn boundary_holds_across_month_lengths() {
        // 30 days before 2024-03-01 crosses February (leap year).
        let today = day(2024, 3, 1);
        let thirty_ago = today - Duration::days(30);
        assert_eq!(thirty_ago, day(2024, 1, 31));
        assert!(!monthly_due(Some(thirty_ago), today));
    }

    #[test]
    fn derive_combines_both_flags() {
        let today = day(2024, 6, 1);
        let unit = Unit {
            id: 1,
            name: "Linac 1".to_string(),
            manufacturer: String::new(),
            model: String::new(),
            serial_number: String::new(),
            location: String::new(),
            install_date: None,
            photon_energies: vec![],
            electron_energies: vec![],
            fff_energies: vec![],
            active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let status = UnitQaStatus::derive(
            unit,
            Some(today),
            Some(today - Duration::days(31)),
            today,
        );
        assert!(!status.daily_due);
        assert!(status.monthly_due);
    }
}
