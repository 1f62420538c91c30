use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Severity of a critical issue. Total order: Critical > High > Moderate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum Severity {
    Critical,
    High,
    Moderate,
}

impl Severity {
    /// Numeric sort rank (lower sorts first)
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Moderate => 2,
        }
    }
}

/// Domain a critical issue belongs to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum IssueCategory {
    #[strum(serialize = "RTT")]
    Rtt,
    #[strum(serialize = "Diagnostic")]
    Diagnostic,
    #[strum(serialize = "A&E")]
    AccidentEmergency,
    #[strum(serialize = "Capacity")]
    Capacity,
}

/// A single issue flagged by the critical-issue scan.
///
/// Produced fresh per snapshot and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalIssue {
    pub category: IssueCategory,
    pub severity: Severity,

    /// Short headline, e.g. "Urology Long Waits"
    pub title: String,

    /// Human-readable explanation of what was observed
    pub description: String,

    /// Name of the metric the rule fired on, e.g. "Breach Rate"
    pub metric: String,

    /// Observed value
    pub value: f64,

    /// Target value shown alongside, where the rule has one
    pub target: Option<f64>,
}
