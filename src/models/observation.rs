use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::metric::{
    AeMetric, CapacityMetric, DiagnosticMetric, DiagnosticModality, MetricKey, RttMetric,
    Specialty,
};

/// RTT waiting-time metrics for one specialty (or the trust total).
///
/// `None` means the field was absent from the source for this snapshot; it is
/// never collapsed to zero here. Percentages are 0-100 (normalized at parse
/// time).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RttMetrics {
    pub percent_within_18_weeks: Option<f64>,
    pub total_within_18_weeks: Option<f64>,
    pub total_incomplete_pathways: Option<f64>,
    pub total_active_pathways: Option<f64>,
    pub total_52_plus_weeks: Option<f64>,
    pub total_65_plus_weeks: Option<f64>,
    pub total_78_plus_weeks: Option<f64>,
    pub median_wait_weeks: Option<f64>,
}

impl RttMetrics {
    pub fn get(&self, metric: RttMetric) -> Option<f64> {
        match metric {
            RttMetric::PercentWithin18Weeks => self.percent_within_18_weeks,
            RttMetric::TotalWithin18Weeks => self.total_within_18_weeks,
            RttMetric::TotalIncompletePathways => self.total_incomplete_pathways,
            RttMetric::TotalActivePathways => self.total_active_pathways,
            RttMetric::Total52PlusWeeks => self.total_52_plus_weeks,
            RttMetric::Total65PlusWeeks => self.total_65_plus_weeks,
            RttMetric::Total78PlusWeeks => self.total_78_plus_weeks,
            RttMetric::MedianWaitWeeks => self.median_wait_weeks,
        }
    }

    pub fn set(&mut self, metric: RttMetric, value: f64) {
        let slot = match metric {
            RttMetric::PercentWithin18Weeks => &mut self.percent_within_18_weeks,
            RttMetric::TotalWithin18Weeks => &mut self.total_within_18_weeks,
            RttMetric::TotalIncompletePathways => &mut self.total_incomplete_pathways,
            RttMetric::TotalActivePathways => &mut self.total_active_pathways,
            RttMetric::Total52PlusWeeks => &mut self.total_52_plus_weeks,
            RttMetric::Total65PlusWeeks => &mut self.total_65_plus_weeks,
            RttMetric::Total78PlusWeeks => &mut self.total_78_plus_weeks,
            RttMetric::MedianWaitWeeks => &mut self.median_wait_weeks,
        };
        *slot = Some(value);
    }
}

/// A&E performance metrics for one snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AeMetrics {
    pub four_hour_performance_pct: Option<f64>,
    pub attendances_total: Option<f64>,
    pub over_4hrs_total: Option<f64>,
    pub emergency_admissions_total: Option<f64>,
    pub twelve_hour_wait_admissions: Option<f64>,
}

impl AeMetrics {
    pub fn get(&self, metric: AeMetric) -> Option<f64> {
        match metric {
            AeMetric::FourHourPerformancePct => self.four_hour_performance_pct,
            AeMetric::AttendancesTotal => self.attendances_total,
            AeMetric::Over4HrsTotal => self.over_4hrs_total,
            AeMetric::EmergencyAdmissionsTotal => self.emergency_admissions_total,
            AeMetric::TwelveHourWaitAdmissions => self.twelve_hour_wait_admissions,
        }
    }

    pub fn set(&mut self, metric: AeMetric, value: f64) {
        let slot = match metric {
            AeMetric::FourHourPerformancePct => &mut self.four_hour_performance_pct,
            AeMetric::AttendancesTotal => &mut self.attendances_total,
            AeMetric::Over4HrsTotal => &mut self.over_4hrs_total,
            AeMetric::EmergencyAdmissionsTotal => &mut self.emergency_admissions_total,
            AeMetric::TwelveHourWaitAdmissions => &mut self.twelve_hour_wait_admissions,
        };
        *slot = Some(value);
    }
}

/// Diagnostic waiting-list metrics for one modality
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticMetrics {
    pub total_waiting: Option<f64>,
    pub six_week_breaches: Option<f64>,
    pub thirteen_week_breaches: Option<f64>,
    pub planned_procedures: Option<f64>,
    pub procedures_performed: Option<f64>,
    pub median_wait_weeks: Option<f64>,
}

impl DiagnosticMetrics {
    pub fn get(&self, metric: DiagnosticMetric) -> Option<f64> {
        match metric {
            DiagnosticMetric::TotalWaiting => self.total_waiting,
            DiagnosticMetric::SixWeekBreaches => self.six_week_breaches,
            DiagnosticMetric::ThirteenWeekBreaches => self.thirteen_week_breaches,
            DiagnosticMetric::PlannedProcedures => self.planned_procedures,
            DiagnosticMetric::ProceduresPerformed => self.procedures_performed,
            DiagnosticMetric::MedianWaitWeeks => self.median_wait_weeks,
        }
    }

    pub fn set(&mut self, metric: DiagnosticMetric, value: f64) {
        let slot = match metric {
            DiagnosticMetric::TotalWaiting => &mut self.total_waiting,
            DiagnosticMetric::SixWeekBreaches => &mut self.six_week_breaches,
            DiagnosticMetric::ThirteenWeekBreaches => &mut self.thirteen_week_breaches,
            DiagnosticMetric::PlannedProcedures => &mut self.planned_procedures,
            DiagnosticMetric::ProceduresPerformed => &mut self.procedures_performed,
            DiagnosticMetric::MedianWaitWeeks => &mut self.median_wait_weeks,
        };
        *slot = Some(value);
    }
}

/// Virtual-ward and discharge capacity metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CapacityMetrics {
    pub virtual_ward_capacity: Option<f64>,
    pub virtual_ward_occupancy_rate: Option<f64>,
    pub avg_daily_discharges: Option<f64>,
}

impl CapacityMetrics {
    pub fn get(&self, metric: CapacityMetric) -> Option<f64> {
        match metric {
            CapacityMetric::VirtualWardCapacity => self.virtual_ward_capacity,
            CapacityMetric::VirtualWardOccupancyRate => self.virtual_ward_occupancy_rate,
            CapacityMetric::AvgDailyDischarges => self.avg_daily_discharges,
        }
    }

    pub fn set(&mut self, metric: CapacityMetric, value: f64) {
        let slot = match metric {
            CapacityMetric::VirtualWardCapacity => &mut self.virtual_ward_capacity,
            CapacityMetric::VirtualWardOccupancyRate => &mut self.virtual_ward_occupancy_rate,
            CapacityMetric::AvgDailyDischarges => &mut self.avg_daily_discharges,
        };
        *slot = Some(value);
    }
}

/// One row of the source dataset: a single trust's metrics for a single
/// reporting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustObservation {
    /// Trust organisation code (e.g. "RGT")
    pub trust_code: String,

    /// Trust display name
    pub trust_name: String,

    /// Reporting period, month granularity
    pub period: NaiveDate,

    /// Owning Integrated Care Board code
    pub icb_code: Option<String>,

    /// Owning Integrated Care Board name
    pub icb_name: Option<String>,

    /// Trust-wide RTT metrics
    pub rtt_total: RttMetrics,

    /// Per-specialty RTT metrics; absent specialties are simply not present
    pub rtt_specialties: BTreeMap<Specialty, RttMetrics>,

    /// A&E metrics
    pub ae: AeMetrics,

    /// Per-modality diagnostic metrics
    pub diagnostics: BTreeMap<DiagnosticModality, DiagnosticMetrics>,

    /// Virtual-ward capacity metrics
    pub capacity: CapacityMetrics,
}

impl TrustObservation {
    pub fn new(
        trust_code: impl Into<String>,
        trust_name: impl Into<String>,
        period: NaiveDate,
    ) -> Self {
        Self {
            trust_code: trust_code.into(),
            trust_name: trust_name.into(),
            period,
            icb_code: None,
            icb_name: None,
            rtt_total: RttMetrics::default(),
            rtt_specialties: BTreeMap::new(),
            ae: AeMetrics::default(),
            diagnostics: BTreeMap::new(),
            capacity: CapacityMetrics::default(),
        }
    }

    /// RTT metrics for one specialty, if the snapshot reports it at all.
    pub fn rtt_specialty(&self, specialty: Specialty) -> Option<&RttMetrics> {
        self.rtt_specialties.get(&specialty)
    }

    /// Diagnostic metrics for one modality, if the snapshot reports it.
    pub fn diagnostic(&self, modality: DiagnosticModality) -> Option<&DiagnosticMetrics> {
        self.diagnostics.get(&modality)
    }

    /// Resolve a typed metric key against this snapshot.
    ///
    /// `MetricKey::Period` has no numeric value and resolves to `None`;
    /// callers wanting the period use the field directly.
    pub fn metric(&self, key: &MetricKey) -> Option<f64> {
        match key {
            MetricKey::Period => None,
            MetricKey::RttTotal(m) => self.rtt_total.get(*m),
            MetricKey::RttSpecialty(s, m) => self.rtt_specialties.get(s).and_then(|r| r.get(*m)),
            MetricKey::Ae(m) => self.ae.get(*m),
            MetricKey::Diagnostic(d, m) => self.diagnostics.get(d).and_then(|r| r.get(*m)),
            MetricKey::Capacity(m) => self.capacity.get(*m),
        }
    }

    /// Store a parsed metric value into the structured record.
    pub fn set_metric(&mut self, key: &MetricKey, value: f64) {
        match key {
            MetricKey::Period => {}
            MetricKey::RttTotal(m) => self.rtt_total.set(*m, value),
            MetricKey::RttSpecialty(s, m) => {
                self.rtt_specialties.entry(*s).or_default().set(*m, value);
            }
            MetricKey::Ae(m) => self.ae.set(*m, value),
            MetricKey::Diagnostic(d, m) => {
                self.diagnostics.entry(*d).or_default().set(*m, value);
            }
            MetricKey::Capacity(m) => self.capacity.set(*m, value),
        }
    }
}
