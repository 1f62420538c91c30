//! Rule-driven critical issue detection
//!
//! Each rule independently inspects one trust snapshot (and the derived
//! diagnostic-service list) and appends at most one issue. Every rule is
//! always evaluated — there is no early termination — and the collected
//! issues are then severity-sorted, Critical first, preserving
//! rule-evaluation order within each tier.

use crate::analytics::diagnostics;
use crate::models::{CriticalIssue, IssueCategory, Severity, TrustObservation};

const RTT_TARGET_PCT: f64 = 92.0;
const AE_TARGET_PCT: f64 = 95.0;
const DIAGNOSTIC_TARGET_PCT: f64 = 15.0;
const OCCUPANCY_TARGET_PCT: f64 = 85.0;

/// Scan one snapshot against the full rule set.
pub fn identify_critical_issues(observation: &TrustObservation) -> Vec<CriticalIssue> {
    let mut issues = Vec::new();

    rtt_trust_wide_rules(observation, &mut issues);
    rtt_specialty_rules(observation, &mut issues);
    diagnostic_rules(observation, &mut issues);
    ae_rules(observation, &mut issues);
    capacity_rules(observation, &mut issues);

    // Stable sort keeps rule-evaluation order within each severity tier.
    issues.sort_by_key(|issue| issue.severity.rank());
    issues
}

fn rtt_trust_wide_rules(observation: &TrustObservation, issues: &mut Vec<CriticalIssue>) {
    if let Some(compliance) = observation.rtt_total.percent_within_18_weeks {
        if compliance < 40.0 {
            issues.push(CriticalIssue {
                category: IssueCategory::Rtt,
                severity: Severity::Critical,
                title: "RTT Compliance Critically Low".to_string(),
                description: "Trust-wide 18-week performance is far below the 92% standard"
                    .to_string(),
                metric: "Compliance".to_string(),
                value: compliance,
                target: Some(RTT_TARGET_PCT),
            });
        } else if compliance < 60.0 {
            issues.push(CriticalIssue {
                category: IssueCategory::Rtt,
                severity: Severity::High,
                title: "RTT Compliance Below Target".to_string(),
                description: "Trust-wide 18-week performance significantly below the 92% standard"
                    .to_string(),
                metric: "Compliance".to_string(),
                value: compliance,
                target: Some(RTT_TARGET_PCT),
            });
        }
    }

    if let Some(long_waiters) = observation.rtt_total.total_52_plus_weeks {
        if long_waiters > 500.0 {
            issues.push(CriticalIssue {
                category: IssueCategory::Rtt,
                severity: Severity::Critical,
                title: "Excessive Long Wait Patients".to_string(),
                description: format!("{long_waiters:.0} patients waiting over 52 weeks"),
                metric: "52+ week waiters".to_string(),
                value: long_waiters,
                target: Some(0.0),
            });
        }
    }
}

fn rtt_specialty_rules(observation: &TrustObservation, issues: &mut Vec<CriticalIssue>) {
    for (specialty, metrics) in &observation.rtt_specialties {
        let name = specialty.display_name();
        // A missing pathway count fails the volume gate; small lists are
        // not flagged on percentage alone.
        let pathways = metrics.total_incomplete_pathways.unwrap_or(0.0);

        if let Some(compliance) = metrics.percent_within_18_weeks {
            if compliance < 40.0 && pathways > 50.0 {
                issues.push(CriticalIssue {
                    category: IssueCategory::Rtt,
                    severity: Severity::Critical,
                    title: format!("{name} RTT Performance Critical"),
                    description: format!(
                        "{name} 18-week performance at {compliance:.1}% across {pathways:.0} pathways"
                    ),
                    metric: "Compliance".to_string(),
                    value: compliance,
                    target: Some(RTT_TARGET_PCT),
                });
            } else if compliance < 60.0 && pathways > 100.0 {
                issues.push(CriticalIssue {
                    category: IssueCategory::Rtt,
                    severity: Severity::High,
                    title: format!("{name} RTT Performance Below Target"),
                    description: format!(
                        "{name} 18-week performance at {compliance:.1}% across {pathways:.0} pathways"
                    ),
                    metric: "Compliance".to_string(),
                    value: compliance,
                    target: Some(RTT_TARGET_PCT),
                });
            }
        }

        if let Some(long_waiters) = metrics.total_52_plus_weeks {
            if long_waiters > 100.0 && pathways > 50.0 {
                issues.push(CriticalIssue {
                    category: IssueCategory::Rtt,
                    severity: Severity::Critical,
                    title: format!("{name} Long Waits"),
                    description: format!("{long_waiters:.0} {name} patients waiting over 52 weeks"),
                    metric: "52+ week waiters".to_string(),
                    value: long_waiters,
                    target: Some(0.0),
                });
            } else if long_waiters > 20.0 && pathways > 50.0 {
                issues.push(CriticalIssue {
                    category: IssueCategory::Rtt,
                    severity: Severity::High,
                    title: format!("{name} Long Waits"),
                    description: format!("{long_waiters:.0} {name} patients waiting over 52 weeks"),
                    metric: "52+ week waiters".to_string(),
                    value: long_waiters,
                    target: Some(0.0),
                });
            }
        }
    }
}

fn diagnostic_rules(observation: &TrustObservation, issues: &mut Vec<CriticalIssue>) {
    for service in diagnostics::critical_services(observation).services {
        let severity = if service.breach_rate >= 25.0 { Severity::Critical } else { Severity::High };
        issues.push(CriticalIssue {
            category: IssueCategory::Diagnostic,
            severity,
            title: format!("{} High Breach Rate", service.name),
            description: format!(
                "{:.1}% of patients waiting over 6 weeks",
                service.breach_rate
            ),
            metric: "Breach Rate".to_string(),
            value: (service.breach_rate * 10.0).round() / 10.0,
            target: Some(DIAGNOSTIC_TARGET_PCT),
        });
    }
}

fn ae_rules(observation: &TrustObservation, issues: &mut Vec<CriticalIssue>) {
    if let Some(performance) = observation.ae.four_hour_performance_pct {
        if performance < 70.0 {
            let severity =
                if performance < 50.0 { Severity::Critical } else { Severity::High };
            issues.push(CriticalIssue {
                category: IssueCategory::AccidentEmergency,
                severity,
                title: "A&E 4-Hour Performance Critical".to_string(),
                description: "Emergency department performance significantly below target"
                    .to_string(),
                metric: "Performance".to_string(),
                value: performance,
                target: Some(AE_TARGET_PCT),
            });
        }
    }

    if let Some(twelve_hour_waits) = observation.ae.twelve_hour_wait_admissions {
        if twelve_hour_waits > 50.0 {
            let severity =
                if twelve_hour_waits > 100.0 { Severity::Critical } else { Severity::High };
            issues.push(CriticalIssue {
                category: IssueCategory::AccidentEmergency,
                severity,
                title: "12-Hour Emergency Waits".to_string(),
                description: "Excessive 12-hour waits indicate severe capacity pressure"
                    .to_string(),
                metric: "12-hour waits".to_string(),
                value: twelve_hour_waits,
                target: None,
            });
        }
    }
}

fn capacity_rules(observation: &TrustObservation, issues: &mut Vec<CriticalIssue>) {
    if let Some(occupancy) = observation.capacity.virtual_ward_occupancy_rate {
        if occupancy > 95.0 {
            issues.push(CriticalIssue {
                category: IssueCategory::Capacity,
                severity: Severity::High,
                title: "Virtual Ward Over-Capacity".to_string(),
                description: "Virtual ward utilisation exceeding safe operational limits"
                    .to_string(),
                metric: "Occupancy".to_string(),
                value: occupancy,
                target: Some(OCCUPANCY_TARGET_PCT),
            });
        }
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
    fn test_trust_wide_rtt_rules() {
        let mut obs = snapshot();
        set(&mut obs, "trust_total_percent_within_18_weeks", 35.0);
        set(&mut obs, "trust_total_total_52_plus_weeks", 600.0);

        let issues = identify_critical_issues(&obs);
        let critical: Vec<_> =
            issues.iter().filter(|i| i.severity == Severity::Critical).collect();
        assert!(critical.len() >= 2);

        // Severity order: every Critical precedes every High/Moderate.
        let ranks: Vec<u8> = issues.iter().map(|i| i.severity.rank()).collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_trust_wide_high_band() {
        let mut obs = snapshot();
        set(&mut obs, "trust_total_percent_within_18_weeks", 55.0);

        let issues = identify_critical_issues(&obs);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::High);
        assert_eq!(issues[0].target, Some(92.0));
    }

    #[test]
    fn test_specialty_rules_gate_on_volume() {
        let mut obs = snapshot();
        // Critically low compliance on a tiny list: no issue.
        set(&mut obs, "rtt_urology_percent_within_18_weeks", 30.0);
        set(&mut obs, "rtt_urology_total_incomplete_pathways", 40.0);
        assert!(identify_critical_issues(&obs).is_empty());

        // Same compliance with volume behind it fires a Critical.
        set(&mut obs, "rtt_urology_total_incomplete_pathways", 200.0);
        let issues = identify_critical_issues(&obs);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
        assert!(issues[0].title.contains("Urology"));
    }

    #[test]
    fn test_specialty_long_wait_bands() {
        let mut obs = snapshot();
        set(&mut obs, "rtt_ent_total_incomplete_pathways", 120.0);
        set(&mut obs, "rtt_ent_total_52_plus_weeks", 30.0);

        let issues = identify_critical_issues(&obs);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::High);

        set(&mut obs, "rtt_ent_total_52_plus_weeks", 150.0);
        let issues = identify_critical_issues(&obs);
        assert_eq!(issues[0].severity, Severity::Critical);
    }

    #[test]
    fn test_diagnostic_rules_use_critical_services() {
        let mut obs = snapshot();
        // 30% breach rate: Critical. 16%: High. 10%: no issue.
        set(&mut obs, "diag_mri_total_waiting", 100.0);
        set(&mut obs, "diag_mri_6week_breaches", 30.0);
        set(&mut obs, "diag_ct_total_waiting", 100.0);
        set(&mut obs, "diag_ct_6week_breaches", 16.0);
        set(&mut obs, "diag_ultrasound_total_waiting", 100.0);
        set(&mut obs, "diag_ultrasound_6week_breaches", 10.0);

        let issues = identify_critical_issues(&obs);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].severity, Severity::Critical);
        assert!(issues[0].title.starts_with("MRI"));
        assert_eq!(issues[1].severity, Severity::High);
        assert!(issues[1].title.starts_with("CT"));
    }

    #[test]
    fn test_ae_and_capacity_rules() {
        let mut obs = snapshot();
        set(&mut obs, "ae_4hr_performance_pct", 45.0);
        set(&mut obs, "ae_12hr_wait_admissions", 60.0);
        set(&mut obs, "virtual_ward_occupancy_rate", 97.0);

        let issues = identify_critical_issues(&obs);
        assert_eq!(issues.len(), 3);
        assert_eq!(issues[0].category, IssueCategory::AccidentEmergency);
        assert_eq!(issues[0].severity, Severity::Critical);
        // 12-hour waits at 60 is High; occupancy rule is High only.
        assert!(issues[1..].iter().all(|i| i.severity == Severity::High));
        assert!(issues.iter().any(|i| i.category == IssueCategory::Capacity));
        // The 12-hour rule carries no target.
        let twelve = issues.iter().find(|i| i.metric == "12-hour waits").unwrap();
        assert_eq!(twelve.target, None);
    }

    #[test]
    fn test_missing_fields_fire_no_rules() {
        let issues = identify_critical_issues(&snapshot());
        assert!(issues.is_empty());
    }

    #[test]
    fn test_stable_order_within_tier() {
        let mut obs = snapshot();
        // Two High issues from different domains: trust-wide RTT evaluates
        // before A&E, and the sort must keep that order.
        set(&mut obs, "trust_total_percent_within_18_weeks", 55.0);
        set(&mut obs, "ae_4hr_performance_pct", 65.0);

        let issues = identify_critical_issues(&obs);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].category, IssueCategory::Rtt);
        assert_eq!(issues[1].category, IssueCategory::AccidentEmergency);
    }

    #[test]
    fn test_many_rules_fire_together() {
        let mut obs = snapshot();
        set(&mut obs, "trust_total_percent_within_18_weeks", 35.0);
        set(&mut obs, "trust_total_total_52_plus_weeks", 600.0);
        set(&mut obs, "rtt_general_surgery_percent_within_18_weeks", 30.0);
        set(&mut obs, "rtt_general_surgery_total_incomplete_pathways", 300.0);
        set(&mut obs, "rtt_general_surgery_total_52_plus_weeks", 120.0);
        set(&mut obs, "diag_mri_total_waiting", 100.0);
        set(&mut obs, "diag_mri_6week_breaches", 30.0);
        set(&mut obs, "ae_4hr_performance_pct", 45.0);
        set(&mut obs, "ae_12hr_wait_admissions", 150.0);
        set(&mut obs, "virtual_ward_occupancy_rate", 97.0);

        let issues = identify_critical_issues(&obs);
        // No early termination: every matching rule contributed.
        assert_eq!(issues.len(), 8);
        assert_eq!(
            issues.iter().filter(|i| i.severity == Severity::Critical).count(),
            7
        );
    }
}
