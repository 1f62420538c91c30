//! Performance banding for RTT-style percentages

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Qualitative band for a 0-100 performance percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum PerformanceBand {
    Excellent,
    Good,
    Concern,
    Critical,
}

/// Band a performance percentage against the 92% RTT standard.
///
/// A missing value reads as Critical: an unreported percentage is treated as
/// the worst case rather than hidden.
pub fn performance_band(percentage: Option<f64>) -> PerformanceBand {
    match percentage {
        Some(p) if p >= 92.0 => PerformanceBand::Excellent,
        Some(p) if p >= 75.0 => PerformanceBand::Good,
        Some(p) if p >= 50.0 => PerformanceBand::Concern,
        _ => PerformanceBand::Critical,
    }
}
