//! Per-specialty RTT performance extraction and ranking

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::models::{Specialty, TrustObservation};

/// RTT performance for one specialty within one snapshot.
///
/// Counts and percentage default to zero when absent — this is the display
/// collapse: a specialty only appears at all when its pathway total is
/// present and nonzero, so the denominator is never invented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialtyPerformanceRecord {
    pub specialty: Specialty,

    /// Display name, e.g. "Trauma & Orthopaedics"
    pub name: &'static str,

    /// NHS treatment function code, e.g. "110"
    pub code: &'static str,

    /// Percent of incomplete pathways within 18 weeks, 0-100
    pub percent_within_18_weeks: f64,

    pub within_18_weeks: f64,

    pub total_pathways: f64,
}

/// 52/65/78-week breach counts for one scope
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BreachBreakdown {
    pub week_52_plus: f64,
    pub week_65_plus: f64,
    pub week_78_plus: f64,
}

/// Which waiting list a breach breakdown is resolved from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreachScope {
    /// Trust-total fields
    TrustTotal,
    /// A single specialty's fields
    Specialty(Specialty),
}

/// Extract per-specialty records, keeping only specialties with a nonzero
/// pathway total.
pub fn specialties_data(observation: &TrustObservation) -> Vec<SpecialtyPerformanceRecord> {
    Specialty::iter()
        .filter_map(|specialty| {
            let metrics = observation.rtt_specialty(specialty)?;
            let total_pathways = metrics.total_incomplete_pathways.filter(|&t| t > 0.0)?;

            Some(SpecialtyPerformanceRecord {
                specialty,
                name: specialty.display_name(),
                code: specialty.treatment_code(),
                percent_within_18_weeks: metrics.percent_within_18_weeks.unwrap_or(0.0),
                within_18_weeks: metrics.total_within_18_weeks.unwrap_or(0.0),
                total_pathways,
            })
        })
        .collect()
}

/// Sort ascending by 18-week percentage: worst performer first.
pub fn rank_worst_first(
    mut records: Vec<SpecialtyPerformanceRecord>,
) -> Vec<SpecialtyPerformanceRecord> {
    records.sort_by(|a, b| {
        a.percent_within_18_weeks
            .partial_cmp(&b.percent_within_18_weeks)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    records
}

/// Resolve the long-wait breach counts for a scope.
///
/// Missing counts collapse to zero for display.
pub fn breach_data(observation: &TrustObservation, scope: BreachScope) -> BreachBreakdown {
    let metrics = match scope {
        BreachScope::TrustTotal => Some(&observation.rtt_total),
        BreachScope::Specialty(specialty) => observation.rtt_specialty(specialty),
    };

    metrics
        .map(|m| BreachBreakdown {
            week_52_plus: m.total_52_plus_weeks.unwrap_or(0.0),
            week_65_plus: m.total_65_plus_weeks.unwrap_or(0.0),
            week_78_plus: m.total_78_plus_weeks.unwrap_or(0.0),
        })
        .unwrap_or_default()
}

/// Display name for a breach scope
pub fn scope_display_name(scope: BreachScope) -> &'static str {
    match scope {
        BreachScope::TrustTotal => "All Specialties",
        BreachScope::Specialty(specialty) => specialty.display_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MetricKey;
    use chrono::NaiveDate;

    fn snapshot() -> TrustObservation {
        TrustObservation::new(
            "RGT",
            "Cambridge",
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        )
    }

    fn set(obs: &mut TrustObservation, key: &str, value: f64) {
        obs.set_metric(&MetricKey::parse(key).expect(key), value);
    }

    #[test]
    fn test_only_specialties_with_pathways_appear() {
        let mut obs = snapshot();
        set(&mut obs, "rtt_urology_percent_within_18_weeks", 62.0);
        set(&mut obs, "rtt_urology_total_incomplete_pathways", 500.0);
        set(&mut obs, "rtt_ent_percent_within_18_weeks", 90.0);
        set(&mut obs, "rtt_ent_total_incomplete_pathways", 0.0);
        // Cardiology reports a percentage but no pathway total at all.
        set(&mut obs, "rtt_cardiology_percent_within_18_weeks", 80.0);

        let records = specialties_data(&obs);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].specialty, Specialty::Urology);
        assert_eq!(records[0].code, "101");
        assert_eq!(records[0].percent_within_18_weeks, 62.0);
    }

    #[test]
    fn test_rank_worst_first() {
        let mut obs = snapshot();
        set(&mut obs, "rtt_urology_percent_within_18_weeks", 62.0);
        set(&mut obs, "rtt_urology_total_incomplete_pathways", 500.0);
        set(&mut obs, "rtt_ent_percent_within_18_weeks", 45.0);
        set(&mut obs, "rtt_ent_total_incomplete_pathways", 300.0);
        set(&mut obs, "rtt_cardiology_percent_within_18_weeks", 88.0);
        set(&mut obs, "rtt_cardiology_total_incomplete_pathways", 200.0);

        let ranked = rank_worst_first(specialties_data(&obs));
        let names: Vec<&str> = ranked.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["ENT", "Urology", "Cardiology"]);
    }

    #[test]
    fn test_breach_data_scopes() {
        let mut obs = snapshot();
        set(&mut obs, "trust_total_total_52_plus_weeks", 300.0);
        set(&mut obs, "trust_total_total_65_plus_weeks", 80.0);
        set(&mut obs, "rtt_urology_total_52_plus_weeks", 40.0);

        let trust = breach_data(&obs, BreachScope::TrustTotal);
        assert_eq!(trust.week_52_plus, 300.0);
        assert_eq!(trust.week_65_plus, 80.0);
        // Missing 78+ count collapses to zero for display.
        assert_eq!(trust.week_78_plus, 0.0);

        let urology = breach_data(&obs, BreachScope::Specialty(Specialty::Urology));
        assert_eq!(urology.week_52_plus, 40.0);

        // A specialty the snapshot never reports resolves to all zeroes.
        let ent = breach_data(&obs, BreachScope::Specialty(Specialty::Ent));
        assert_eq!(ent, BreachBreakdown::default());
    }

    #[test]
    fn test_scope_display_names() {
        assert_eq!(scope_display_name(BreachScope::TrustTotal), "All Specialties");
        assert_eq!(
            scope_display_name(BreachScope::Specialty(Specialty::TraumaOrthopaedics)),
            "Trauma & Orthopaedics"
        );
    }
}
