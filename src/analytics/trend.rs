//! Month-on-month trend classification

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::models::TrustObservation;

/// Change below this magnitude (in percent) is reported as stable, so
/// floating-point near-equality never reads as movement.
const STABLE_BAND_PCT: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

/// Classified change between two observations of the same metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    /// Magnitude of the change, percent, always non-negative
    pub change_pct: f64,

    pub direction: TrendDirection,

    /// Whether the movement is good news for this metric's polarity.
    /// Stable is never positive.
    pub is_positive: bool,
}

/// Compare a current value against the prior period.
///
/// Returns `None` when either value is missing or the previous value is zero
/// (percentage change undefined).
pub fn trend(current: Option<f64>, previous: Option<f64>, higher_is_better: bool) -> Option<Trend> {
    let current = current?;
    let previous = previous?;
    if previous == 0.0 {
        return None;
    }

    let change = (current - previous) / previous * 100.0;
    let direction = if change > STABLE_BAND_PCT {
        TrendDirection::Up
    } else if change < -STABLE_BAND_PCT {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    };

    let is_positive = match direction {
        TrendDirection::Up => higher_is_better,
        TrendDirection::Down => !higher_is_better,
        TrendDirection::Stable => false,
    };

    Some(Trend { change_pct: change.abs(), direction, is_positive })
}

/// Find the observation exactly one calendar month before the one at
/// `current_index`, scanning backward past any gaps in the series.
///
/// The series is assumed period-ascending (as produced by the dataset
/// index). Returns `None` when no such observation exists.
pub fn previous_month_observation(
    series: &[TrustObservation],
    current_index: usize,
) -> Option<&TrustObservation> {
    let current = series.get(current_index)?;
    for candidate in series[..current_index].iter().rev() {
        let months_apart = (current.period.year() - candidate.period.year()) * 12
            + (current.period.month() as i32 - candidate.period.month() as i32);
        if months_apart == 1 {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(period: (i32, u32)) -> TrustObservation {
        TrustObservation::new(
            "RGT",
            "Cambridge",
            NaiveDate::from_ymd_opt(period.0, period.1, 1).unwrap(),
        )
    }

    #[test]
    fn test_dead_band_is_stable_and_never_positive() {
        let t = trend(Some(100.0), Some(100.0), true).unwrap();
        assert_eq!(t.direction, TrendDirection::Stable);
        assert!(!t.is_positive);
        assert_eq!(t.change_pct, 0.0);

        // 0.05% change sits inside the band.
        let t = trend(Some(100.05), Some(100.0), true).unwrap();
        assert_eq!(t.direction, TrendDirection::Stable);
    }

    #[test]
    fn test_polarity() {
        let t = trend(Some(105.0), Some(100.0), true).unwrap();
        assert_eq!(t.direction, TrendDirection::Up);
        assert!(t.is_positive);

        let t = trend(Some(105.0), Some(100.0), false).unwrap();
        assert_eq!(t.direction, TrendDirection::Up);
        assert!(!t.is_positive);

        let t = trend(Some(95.0), Some(100.0), false).unwrap();
        assert_eq!(t.direction, TrendDirection::Down);
        assert!(t.is_positive);
    }

    #[test]
    fn test_undefined_inputs() {
        assert!(trend(Some(50.0), Some(0.0), true).is_none());
        assert!(trend(Some(50.0), Some(0.0), false).is_none());
        assert!(trend(None, Some(10.0), true).is_none());
        assert!(trend(Some(10.0), None, true).is_none());
    }

    #[test]
    fn test_declining_rtt_compliance() {
        // 90% -> 80% compliance: down 11.1%, bad news for a
        // higher-is-better metric.
        let t = trend(Some(80.0), Some(90.0), true).unwrap();
        assert_eq!(t.direction, TrendDirection::Down);
        assert!((t.change_pct - 11.111).abs() < 0.001);
        assert!(!t.is_positive);
    }

    #[test]
    fn test_previous_month_skips_gaps() {
        // Gap: no February.
        let series = vec![obs((2024, 12)), obs((2025, 1)), obs((2025, 3))];

        // March's previous month would be February; absent, so none.
        assert!(previous_month_observation(&series, 2).is_none());

        // January's previous month is December, across the year boundary.
        let prev = previous_month_observation(&series, 1).unwrap();
        assert_eq!(prev.period, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());

        assert!(previous_month_observation(&series, 0).is_none());
        assert!(previous_month_observation(&series, 9).is_none());
    }
}
