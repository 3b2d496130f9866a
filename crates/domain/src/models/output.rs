//! Output-constancy readings and deviation computation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::QaError;

/// A stored output-constancy reading.
///
/// `deviation` is computed once when the reading is recorded and kept as a
/// historical snapshot; later changes to the deviation convention must not
/// rewrite old rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputReading {
    pub id: i64,
    pub date: NaiveDate,
    pub unit_id: i64,
    pub energy: String,
    pub reading: f64,
    pub reference: f64,
    pub deviation: f64,
    pub created_at: DateTime<Utc>,
}

/// Percentage deviation of a reading from its reference value.
///
/// Exact floating-point arithmetic, no rounding; trend charts expect full
/// precision.
pub fn deviation(reading: f64, reference: f64) -> Result<f64, QaError> {
    if reference == 0.0 {
        return Err(QaError::InvalidReference);
    }
    Ok((reading - reference) / reference * 100.0)
}

/// Request payload for recording an output reading.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordReadingRequest {
    pub date: NaiveDate,
    pub unit_id: i64,

    #[validate(length(min = 1, max = 20, message = "Energy must be between 1 and 20 characters"))]
    pub energy: String,

    pub reading: f64,
    pub reference: f64,
}

/// One point of a trend series, chronological for direct plotting.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub deviation: f64,
}

impl From<&OutputReading> for TrendPoint {
    fn from(reading: &OutputReading) -> Self {
        Self {
            date: reading.date,
            deviation: reading.deviation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_reading_gives_negative_deviation() {
        assert_eq!(deviation(98.0, 100.0).unwrap(), -2.0);
    }

    #[test]
    fn high_reading_gives_positive_deviation() {
        assert_eq!(deviation(102.0, 100.0).unwrap(), 2.0);
    }

    #[test]
    fn equal_reading_gives_zero() {
        assert_eq!(deviation(100.0, 100.0).unwrap(), 0.0);
    }

    #[test]
    fn zero_reference_is_rejected() {
        assert!(matches!(
            deviation(98.0, 0.0),
            Err(QaError::InvalidReference)
        ));
    }

    #[test]
    fn deviation_is_not_rounded() {
        let value = deviation(100.3, 100.0).unwrap();
        assert_eq!(value, (100.3 - 100.0) / 100.0 * 100.0);
    }

    #[test]
    fn non_unity_reference() {
        assert_eq!(deviation(49.0, 50.0).unwrap(), -2.0);
    }
}
