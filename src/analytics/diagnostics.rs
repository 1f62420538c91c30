//! Diagnostic waiting-list intelligence
//!
//! Extracts per-modality waiting-list records from a snapshot, scores each
//! modality's insourcing opportunity, and flags services breaching the
//! 6-week standard.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::Display;

use crate::models::{DiagnosticModality, TrustObservation};

/// Volume contribution to the opportunity score is capped here so breach
/// severity always remains influential.
const VOLUME_SCORE_CAP: f64 = 50.0;

/// Breach rate at or above which a service is treated as critical.
pub const CRITICAL_BREACH_RATE_PCT: f64 = 15.0;

/// Per-modality waiting-list record derived from one snapshot.
///
/// Computed on demand and discarded after use; never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticServiceRecord {
    pub modality: DiagnosticModality,

    /// Display name, e.g. "MRI Scans"
    pub name: &'static str,

    pub total_waiting: f64,

    /// Patients waiting over 6 weeks; missing collapses to 0 for display
    pub six_week_breaches: f64,

    /// Patients waiting over 13 weeks; missing collapses to 0 for display
    pub thirteen_week_breaches: f64,

    /// 6-week breaches as a percentage of the waiting list
    pub breach_rate: f64,

    pub planned_tests: f64,
    pub performed_tests: f64,
}

/// Qualitative banding of a 6-week breach rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum BreachLevel {
    #[strum(serialize = "CRITICAL")]
    Critical,
    #[strum(serialize = "HIGH CONCERN")]
    HighConcern,
    #[strum(serialize = "MODERATE")]
    Moderate,
    #[strum(serialize = "GOOD")]
    Good,
}

/// Services at or above the critical breach threshold, worst first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalServices {
    pub count: usize,
    pub services: Vec<DiagnosticServiceRecord>,
}

/// Extract one record per modality with a nonzero waiting list.
///
/// Breach counts absent from the snapshot are shown as zero; the waiting
/// list itself is the gate, so a missing denominator never produces a rate.
pub fn extract_diagnostic_services(observation: &TrustObservation) -> Vec<DiagnosticServiceRecord> {
    DiagnosticModality::iter()
        .filter_map(|modality| {
            let metrics = observation.diagnostic(modality)?;
            let total_waiting = metrics.total_waiting.filter(|&t| t > 0.0)?;

            let six_week_breaches = metrics.six_week_breaches.unwrap_or(0.0);
            Some(DiagnosticServiceRecord {
                modality,
                name: modality.display_name(),
                total_waiting,
                six_week_breaches,
                thirteen_week_breaches: metrics.thirteen_week_breaches.unwrap_or(0.0),
                breach_rate: six_week_breaches / total_waiting * 100.0,
                planned_tests: metrics.planned_procedures.unwrap_or(0.0),
                performed_tests: metrics.procedures_performed.unwrap_or(0.0),
            })
        })
        .collect()
}

/// Priority score combining waiting-list volume (capped) with breach rate.
pub fn opportunity_score(total_waiting: f64, breach_rate: f64) -> f64 {
    let volume_score = (total_waiting / 100.0).min(VOLUME_SCORE_CAP);
    volume_score + breach_rate
}

/// Sort services by opportunity score, highest first.
///
/// The sort is stable: equal scores keep their input order.
pub fn rank_by_opportunity(mut services: Vec<DiagnosticServiceRecord>) -> Vec<DiagnosticServiceRecord> {
    services.sort_by(|a, b| {
        let score_a = opportunity_score(a.total_waiting, a.breach_rate);
        let score_b = opportunity_score(b.total_waiting, b.breach_rate);
        score_b.partial_cmp(&score_a).unwrap_or(std::cmp::Ordering::Equal)
    });
    services
}

/// Band a 6-week breach rate. Thresholds are fixed policy constants.
pub fn breach_level(breach_rate: f64) -> BreachLevel {
    if breach_rate >= CRITICAL_BREACH_RATE_PCT {
        BreachLevel::Critical
    } else if breach_rate >= 10.0 {
        BreachLevel::HighConcern
    } else if breach_rate >= 5.0 {
        BreachLevel::Moderate
    } else {
        BreachLevel::Good
    }
}

/// Services breaching at the critical level, sorted worst first.
pub fn critical_services(observation: &TrustObservation) -> CriticalServices {
    let mut services: Vec<DiagnosticServiceRecord> = extract_diagnostic_services(observation)
        .into_iter()
        .filter(|s| s.breach_rate >= CRITICAL_BREACH_RATE_PCT)
        .collect();
    services.sort_by(|a, b| {
        b.breach_rate.partial_cmp(&a.breach_rate).unwrap_or(std::cmp::Ordering::Equal)
    });
    CriticalServices { count: services.len(), services }
}
