//! The SASQART checklist registry.
//!
//! The schedule is fixed regulatory reference data, compiled into the
//! binary. It is never persisted and there is no mutation path; callers
//! look items up by session type and item id at render/report time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QaError;

/// The four regulatory QA cadences.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "qa_session_type", rename_all = "lowercase")]
pub enum SessionType {
    Daily,
    Monthly,
    Quarterly,
    Annual,
}

impl SessionType {
    /// All session types, in cadence order.
    pub const ALL: [SessionType; 4] = [
        SessionType::Daily,
        SessionType::Monthly,
        SessionType::Quarterly,
        SessionType::Annual,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SessionType::Daily => "daily",
            SessionType::Monthly => "monthly",
            SessionType::Quarterly => "quarterly",
            SessionType::Annual => "annual",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionType {
    type Err = QaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(SessionType::Daily),
            "monthly" => Ok(SessionType::Monthly),
            "quarterly" => Ok(SessionType::Quarterly),
            "annual" => Ok(SessionType::Annual),
            other => Err(QaError::InvalidSessionType(other.to_string())),
        }
    }
}

/// One fixed inspection/measurement point within a session type.
///
/// Identity is the `(session type, id)` pair. Tolerance and action are
/// free-text thresholds for display alongside recorded results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecklistItem {
    pub id: &'static str,
    pub description: &'static str,
    pub tolerance: &'static str,
    pub action: &'static str,
}

const fn row(
    id: &'static str,
    description: &'static str,
    tolerance: &'static str,
    action: &'static str,
) -> ChecklistItem {
    ChecklistItem {
        id,
        description,
        tolerance,
        action,
    }
}

static DAILY: &[ChecklistItem] = &[
    row("DL1", "Door interlock", "Functional", "Functional"),
    row("DL2", "Radiation beam status indicators", "Functional", "Functional"),
    row("DL3", "Audio-visual monitor", "Functional", "Functional"),
    row("DL4", "Gantry/collimator motion interlock", "Functional", "Functional"),
    row("DL5", "Couch motion/brakes", "Functional", "Functional"),
    row("DL6", "Radiation area monitors", "Functional", "Functional"),
    row("DL7", "Beam interrupt devices", "Functional", "Functional"),
    row("DL8", "Output constancy – photons", "2.00%", "3.00%"),
    row("DL9", "Output constancy – electrons", "2.00%", "3.00%"),
];

static MONTHLY: &[ChecklistItem] = &[
    row("ML1", "Emergency off switches", "Functional", "Functional"),
    row("ML2", "Lasers and crosswires", "1 mm", "2 mm"),
    row("ML3", "Optical distance indicator", "1 mm", "2 mm"),
    row("ML4", "Radiation/light field size", "1 mm", "2 mm"),
    row("ML5", "Physical/dynamic wedge factors", "1%", "2%"),
    row("ML6", "Gantry angle indicators", "0.5°", "1°"),
    row("ML7", "Collimator angle indicators", "0.5°", "1°"),
    row("ML8", "Couch position indicators", "1 mm", "2 mm"),
    row("ML9", "Couch rotation isocentre", "1 mm", "2 mm"),
    row("ML10", "Couch angle indicator", "0.5°", "1°"),
    row("ML11", "Collimator rotation isocentre", "1 mm", "2 mm"),
    row("ML12", "Light/radiation field coincidence", "1 mm", "2 mm"),
    row("ML13", "Beam flatness constancy", "1%", "2%"),
    row("ML14", "Beam symmetry constancy", "1%", "2%"),
    row("ML15", "Relative dosimetry constancy", "1%", "2%"),
    row("ML16", "Accuracy of QA records", "Complete", "Complete"),
];

static QUARTERLY: &[ChecklistItem] = &[
    row("Q1", "Central axis depth dose reproducibility", "1%/2mm", "2%/3mm"),
];

static ANNUAL: &[ChecklistItem] = &[
    row("AL1", "Accessory mechanical integrity", "Safe", "Safe"),
    row("AL2", "Accessory interlocks", "Functional", "Functional"),
    row("AL3", "ODI at extended distances", "1 mm", "2 mm"),
    row("AL4", "Light/rad coincidence vs gantry", "1 mm", "2 mm"),
    row("AL5", "Field size vs gantry angle", "1 mm", "2 mm"),
    row("AL6", "TRS-398 calibration", "1%", "2%"),
    row("AL7", "Output factors", "1%", "2%"),
    row("AL8", "Wedge transmission and profiles", "1%", "2%"),
    row("AL9", "Accessory transmission factors", "1%", "2%"),
    row("AL10", "Output vs gantry angle", "1%", "2%"),
    row("AL11", "Symmetry vs gantry angle", "1%", "2%"),
    row("AL12", "Monitor unit linearity", "1%", "2%"),
    row("AL13", "Monitor unit end effect", "< 1 MU", "< 2 MU"),
    row("AL14", "Collimator rotation isocentre", "1 mm", "2 mm"),
    row("AL15", "Gantry rotation isocentre", "1 mm", "2 mm"),
    row("AL16", "Couch rotation isocentre", "1 mm", "2 mm"),
    row("AL17", "Coincidence of axes", "1 mm", "2 mm"),
    row("AL18", "Independent review", "Complete", "Complete"),
];

/// The checklist for a session type, in canonical order.
pub fn schedule(session_type: SessionType) -> &'static [ChecklistItem] {
    match session_type {
        SessionType::Daily => DAILY,
        SessionType::Monthly => MONTHLY,
        SessionType::Quarterly => QUARTERLY,
        SessionType::Annual => ANNUAL,
    }
}

/// Looks up a single checklist item by id within a session type.
pub fn find(session_type: SessionType, id: &str) -> Option<&'static ChecklistItem> {
    schedule(session_type).iter().find(|item| item.id == id)
}

/// Whether `id` names a checklist item of the given session type.
pub fn contains(session_type: SessionType, id: &str) -> bool {
    find(session_type, id).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_schedule_is_non_empty() {
        for session_type in SessionType::ALL {
            assert!(!schedule(session_type).is_empty(), "{} schedule is empty", session_type);
        }
    }

    #[test]
    fn schedule_sizes_match_sasqart() {
        assert_eq!(schedule(SessionType::Daily).len(), 9);
        assert_eq!(schedule(SessionType::Monthly).len(), 16);
        assert_eq!(schedule(SessionType::Quarterly).len(), 1);
        assert_eq!(schedule(SessionType::Annual).len(), 18);
    }

    #[test]
    fn item_ids_are_pairwise_distinct() {
        for session_type in SessionType::ALL {
            let ids: HashSet<_> = schedule(session_type).iter().map(|i| i.id).collect();
            assert_eq!(ids.len(), schedule(session_type).len());
        }
    }

    #[test]
    fn schedule_is_stable_across_calls() {
        for session_type in SessionType::ALL {
            let first = schedule(session_type);
            let second = schedule(session_type);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn find_returns_item_metadata() {
        let item = find(SessionType::Daily, "DL8").unwrap();
        assert_eq!(item.description, "Output constancy – photons");
        assert_eq!(item.tolerance, "2.00%");
        assert_eq!(item.action, "3.00%");

        assert!(find(SessionType::Daily, "ML1").is_none());
    }

    #[test]
    fn session_type_round_trips_through_strings() {
        for session_type in SessionType::ALL {
            let parsed: SessionType = session_type.as_str().parse().unwrap();
            assert_eq!(parsed, session_type);
        }
    }

    #[test]
    fn unknown_session_type_is_rejected() {
        let err = "weekly".parse::<SessionType>().unwrap_err();
        assert!(matches!(err, QaError::InvalidSessionType(s) if s == "weekly"));
    }
}
