//! Metric vocabulary: specialties, diagnostic modalities and typed metric keys
//!
//! The source dataset is a wide CSV whose columns follow the
//! `<domain>_<specialty-or-modality>_<metric>` naming convention. Instead of
//! stringly-typed lookups, every selectable field is parsed once into a
//! [`MetricKey`] and resolved against the structured observation record.

use once_cell::sync::Lazy;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// RTT treatment-function specialties reported by the dataset
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Specialty {
    GeneralSurgery,
    Urology,
    TraumaOrthopaedics,
    Ent,
    Ophthalmology,
    OralSurgery,
    RestorativeDentistry,
    PediatricSurgery,
    CardiothoracicSurgery,
    GeneralMedicine,
    Gastroenterology,
    Cardiology,
    Dermatology,
    RespiratoryMedicine,
    Neurology,
    Rheumatology,
    GeriatricMedicine,
    Gynecology,
    OtherSurgery,
    MedicalOncology,
}

impl Specialty {
    /// Human-readable name used across the dashboard
    pub fn display_name(&self) -> &'static str {
        match self {
            Specialty::GeneralSurgery => "General Surgery",
            Specialty::Urology => "Urology",
            Specialty::TraumaOrthopaedics => "Trauma & Orthopaedics",
            Specialty::Ent => "ENT",
            Specialty::Ophthalmology => "Ophthalmology",
            Specialty::OralSurgery => "Oral Surgery",
            Specialty::RestorativeDentistry => "Restorative Dentistry",
            Specialty::PediatricSurgery => "Paediatric Surgery",
            Specialty::CardiothoracicSurgery => "Cardiothoracic Surgery",
            Specialty::GeneralMedicine => "General Internal Medicine",
            Specialty::Gastroenterology => "Gastroenterology",
            Specialty::Cardiology => "Cardiology",
            Specialty::Dermatology => "Dermatology",
            Specialty::RespiratoryMedicine => "Respiratory Medicine",
            Specialty::Neurology => "Neurology",
            Specialty::Rheumatology => "Rheumatology",
            Specialty::GeriatricMedicine => "Geriatric Medicine",
            Specialty::Gynecology => "Gynaecology",
            Specialty::OtherSurgery => "Other Surgery",
            Specialty::MedicalOncology => "Medical Oncology",
        }
    }

    /// NHS treatment function code
    pub fn treatment_code(&self) -> &'static str {
        match self {
            Specialty::GeneralSurgery => "100",
            Specialty::Urology => "101",
            Specialty::TraumaOrthopaedics => "110",
            Specialty::Ent => "120",
            Specialty::Ophthalmology => "130",
            Specialty::OralSurgery => "140",
            Specialty::RestorativeDentistry => "141",
            Specialty::PediatricSurgery => "170",
            Specialty::CardiothoracicSurgery => "180",
            Specialty::GeneralMedicine => "300",
            Specialty::Gastroenterology => "301",
            Specialty::Cardiology => "320",
            Specialty::Dermatology => "330",
            Specialty::RespiratoryMedicine => "340",
            Specialty::MedicalOncology => "370",
            Specialty::Neurology => "400",
            Specialty::Rheumatology => "410",
            Specialty::GeriatricMedicine => "430",
            Specialty::Gynecology => "500",
            Specialty::OtherSurgery => "800",
        }
    }
}

/// Diagnostic test modalities reported by the dataset
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticModality {
    Mri,
    Ct,
    Ultrasound,
    NuclearMedicine,
    Dexa,
    Echocardiography,
    Electrophysiology,
    Neurophysiology,
    Audiology,
    Gastroscopy,
    Colonoscopy,
    Sigmoidoscopy,
    Cystoscopy,
    Urodynamics,
    SleepStudies,
}

impl DiagnosticModality {
    pub fn display_name(&self) -> &'static str {
        match self {
            DiagnosticModality::Mri => "MRI Scans",
            DiagnosticModality::Ct => "CT Scans",
            DiagnosticModality::Ultrasound => "Ultrasound",
            DiagnosticModality::NuclearMedicine => "Nuclear Medicine",
            DiagnosticModality::Dexa => "DEXA Scans",
            DiagnosticModality::Echocardiography => "Echocardiography",
            DiagnosticModality::Electrophysiology => "Electrophysiology",
            DiagnosticModality::Neurophysiology => "Neurophysiology",
            DiagnosticModality::Audiology => "Audiology",
            DiagnosticModality::Gastroscopy => "Gastroscopy",
            DiagnosticModality::Colonoscopy => "Colonoscopy",
            DiagnosticModality::Sigmoidoscopy => "Sigmoidoscopy",
            DiagnosticModality::Cystoscopy => "Cystoscopy",
            DiagnosticModality::Urodynamics => "Urodynamics",
            DiagnosticModality::SleepStudies => "Sleep Studies",
        }
    }
}

/// Per-specialty (and trust-total) RTT metric names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum RttMetric {
    #[strum(serialize = "percent_within_18_weeks")]
    PercentWithin18Weeks,
    #[strum(serialize = "total_within_18_weeks")]
    TotalWithin18Weeks,
    #[strum(serialize = "total_incomplete_pathways")]
    TotalIncompletePathways,
    #[strum(serialize = "total_active_pathways")]
    TotalActivePathways,
    #[strum(serialize = "total_52_plus_weeks")]
    Total52PlusWeeks,
    #[strum(serialize = "total_65_plus_weeks")]
    Total65PlusWeeks,
    #[strum(serialize = "total_78_plus_weeks")]
    Total78PlusWeeks,
    #[strum(serialize = "median_wait_weeks")]
    MedianWaitWeeks,
}

/// A&E metric names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum AeMetric {
    #[strum(serialize = "4hr_performance_pct")]
    FourHourPerformancePct,
    #[strum(serialize = "attendances_total")]
    AttendancesTotal,
    #[strum(serialize = "over_4hrs_total")]
    Over4HrsTotal,
    #[strum(serialize = "emergency_admissions_total")]
    EmergencyAdmissionsTotal,
    #[strum(serialize = "12hr_wait_admissions")]
    TwelveHourWaitAdmissions,
}

/// Per-modality diagnostic metric names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum DiagnosticMetric {
    #[strum(serialize = "total_waiting")]
    TotalWaiting,
    #[strum(serialize = "6week_breaches")]
    SixWeekBreaches,
    #[strum(serialize = "13week_breaches")]
    ThirteenWeekBreaches,
    #[strum(serialize = "planned_procedures")]
    PlannedProcedures,
    #[strum(serialize = "procedures_performed")]
    ProceduresPerformed,
    #[strum(serialize = "median_wait_weeks")]
    MedianWaitWeeks,
}

/// Virtual-ward and discharge capacity metric names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum CapacityMetric {
    #[strum(serialize = "virtual_ward_capacity")]
    VirtualWardCapacity,
    #[strum(serialize = "virtual_ward_occupancy_rate")]
    VirtualWardOccupancyRate,
    #[strum(serialize = "avg_daily_discharges")]
    AvgDailyDischarges,
}

/// A fully-resolved reference to one numeric field of a trust observation.
///
/// Parsed once from the dataset's column names (or the chart builder's axis
/// keys); unknown keys are rejected at parse time rather than surfacing as
/// silent `null`s mid-pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKey {
    /// The reporting period itself, selectable as a chart axis
    Period,
    /// Trust-wide RTT metric (`trust_total_*`)
    RttTotal(RttMetric),
    /// Per-specialty RTT metric (`rtt_<specialty>_*`)
    RttSpecialty(Specialty, RttMetric),
    /// A&E metric (`ae_*`)
    Ae(AeMetric),
    /// Per-modality diagnostic metric (`diag_<modality>_*`)
    Diagnostic(DiagnosticModality, DiagnosticMetric),
    /// Capacity metric (top-level column name)
    Capacity(CapacityMetric),
}

impl MetricKey {
    /// Parse a column or axis key into a typed metric reference.
    pub fn parse(key: &str) -> Option<Self> {
        if key == "period" {
            return Some(MetricKey::Period);
        }
        if let Some(rest) = key.strip_prefix("trust_total_") {
            return RttMetric::from_str(rest).ok().map(MetricKey::RttTotal);
        }
        if let Some(rest) = key.strip_prefix("rtt_") {
            for specialty in Specialty::iter() {
                let prefix = format!("{specialty}_");
                if let Some(metric) = rest.strip_prefix(prefix.as_str()) {
                    return RttMetric::from_str(metric)
                        .ok()
                        .map(|m| MetricKey::RttSpecialty(specialty, m));
                }
            }
            return None;
        }
        if let Some(rest) = key.strip_prefix("ae_") {
            return AeMetric::from_str(rest).ok().map(MetricKey::Ae);
        }
        if let Some(rest) = key.strip_prefix("diag_") {
            for modality in DiagnosticModality::iter() {
                let prefix = format!("{modality}_");
                if let Some(metric) = rest.strip_prefix(prefix.as_str()) {
                    return DiagnosticMetric::from_str(metric)
                        .ok()
                        .map(|m| MetricKey::Diagnostic(modality, m));
                }
            }
            return None;
        }
        CapacityMetric::from_str(key).ok().map(MetricKey::Capacity)
    }

    /// The dataset column / chart axis key this metric is known by.
    pub fn as_key(&self) -> String {
        match self {
            MetricKey::Period => "period".to_string(),
            MetricKey::RttTotal(m) => format!("trust_total_{m}"),
            MetricKey::RttSpecialty(s, m) => format!("rtt_{s}_{m}"),
            MetricKey::Ae(m) => format!("ae_{m}"),
            MetricKey::Diagnostic(d, m) => format!("diag_{d}_{m}"),
            MetricKey::Capacity(m) => m.to_string(),
        }
    }

    /// True when the source stores this metric as a 0-1 fraction.
    ///
    /// These fields are rescaled to 0-100 once at parse time; virtual-ward
    /// occupancy is already 0-100 in the source and is not listed here.
    pub fn stored_as_fraction(&self) -> bool {
        matches!(
            self,
            MetricKey::RttTotal(RttMetric::PercentWithin18Weeks)
                | MetricKey::RttSpecialty(_, RttMetric::PercentWithin18Weeks)
                | MetricKey::Ae(AeMetric::FourHourPerformancePct)
        )
    }

    /// How values of this metric are rendered.
    pub fn format(&self) -> MetricFormat {
        match self {
            MetricKey::RttTotal(RttMetric::PercentWithin18Weeks)
            | MetricKey::RttSpecialty(_, RttMetric::PercentWithin18Weeks)
            | MetricKey::Ae(AeMetric::FourHourPerformancePct)
            | MetricKey::Capacity(CapacityMetric::VirtualWardOccupancyRate) => {
                MetricFormat::Percentage
            }
            _ => MetricFormat::Count,
        }
    }

    /// Human-readable name for chart titles, legends and insight strings.
    pub fn display_name(&self) -> String {
        metric_display_name(&self.as_key())
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_key())
    }
}

impl Serialize for MetricKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_key())
    }
}

impl<'de> Deserialize<'de> for MetricKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        MetricKey::parse(&key)
            .ok_or_else(|| de::Error::custom(format!("unknown metric key: {key}")))
    }
}

/// Rendering format for a metric value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricFormat {
    Count,
    Percentage,
}

/// Category grouping for the chart builder's axis pickers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum MetricCategory {
    #[strum(serialize = "RTT Performance")]
    RttPerformance,
    #[strum(serialize = "A&E Performance")]
    AePerformance,
    #[strum(serialize = "Specialty RTT")]
    SpecialtyRtt,
    #[strum(serialize = "Diagnostics")]
    Diagnostics,
    #[strum(serialize = "Capacity")]
    Capacity,
    #[strum(serialize = "Time")]
    Time,
}

/// One selectable metric in the chart builder
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricDef {
    pub key: &'static str,
    pub display_name: &'static str,
    pub category: MetricCategory,
    pub format: MetricFormat,
}

/// The metrics offered by the custom chart builder's axis pickers.
pub fn available_metrics() -> &'static [MetricDef] {
    use MetricCategory::*;
    use MetricFormat::*;
    static CATALOG: &[MetricDef] = &[
        MetricDef { key: "trust_total_percent_within_18_weeks", display_name: "RTT 18-week Compliance (%)", category: RttPerformance, format: Percentage },
        MetricDef { key: "trust_total_total_incomplete_pathways", display_name: "Total Waiting List", category: RttPerformance, format: Count },
        MetricDef { key: "trust_total_total_52_plus_weeks", display_name: "52+ Week Waiters", category: RttPerformance, format: Count },
        MetricDef { key: "trust_total_total_65_plus_weeks", display_name: "65+ Week Waiters", category: RttPerformance, format: Count },
        MetricDef { key: "trust_total_total_78_plus_weeks", display_name: "78+ Week Waiters", category: RttPerformance, format: Count },
        MetricDef { key: "trust_total_median_wait_weeks", display_name: "Median Wait Time (weeks)", category: RttPerformance, format: Count },
        MetricDef { key: "ae_4hr_performance_pct", display_name: "A&E 4-hour Performance (%)", category: AePerformance, format: Percentage },
        MetricDef { key: "ae_attendances_total", display_name: "Total A&E Attendances", category: AePerformance, format: Count },
        MetricDef { key: "ae_over_4hrs_total", display_name: "A&E Over 4 Hours", category: AePerformance, format: Count },
        MetricDef { key: "ae_emergency_admissions_total", display_name: "Emergency Admissions", category: AePerformance, format: Count },
        MetricDef { key: "ae_12hr_wait_admissions", display_name: "12+ Hour Wait Admissions", category: AePerformance, format: Count },
        MetricDef { key: "rtt_general_surgery_percent_within_18_weeks", display_name: "General Surgery RTT 18-week (%)", category: SpecialtyRtt, format: Percentage },
        MetricDef { key: "rtt_urology_percent_within_18_weeks", display_name: "Urology RTT 18-week (%)", category: SpecialtyRtt, format: Percentage },
        MetricDef { key: "rtt_trauma_orthopaedics_percent_within_18_weeks", display_name: "Trauma & Orthopaedics RTT 18-week (%)", category: SpecialtyRtt, format: Percentage },
        MetricDef { key: "rtt_ent_percent_within_18_weeks", display_name: "ENT RTT 18-week (%)", category: SpecialtyRtt, format: Percentage },
        MetricDef { key: "rtt_ophthalmology_percent_within_18_weeks", display_name: "Ophthalmology RTT 18-week (%)", category: SpecialtyRtt, format: Percentage },
        MetricDef { key: "diag_mri_total_waiting", display_name: "MRI Total Waiting", category: Diagnostics, format: Count },
        MetricDef { key: "diag_mri_6week_breaches", display_name: "MRI 6+ Week Breaches", category: Diagnostics, format: Count },
        MetricDef { key: "diag_ct_total_waiting", display_name: "CT Total Waiting", category: Diagnostics, format: Count },
        MetricDef { key: "diag_ct_6week_breaches", display_name: "CT 6+ Week Breaches", category: Diagnostics, format: Count },
        MetricDef { key: "diag_ultrasound_total_waiting", display_name: "Ultrasound Total Waiting", category: Diagnostics, format: Count },
        MetricDef { key: "diag_ultrasound_6week_breaches", display_name: "Ultrasound 6+ Week Breaches", category: Diagnostics, format: Count },
        MetricDef { key: "virtual_ward_capacity", display_name: "Virtual Ward Capacity", category: Capacity, format: Count },
        MetricDef { key: "virtual_ward_occupancy_rate", display_name: "Virtual Ward Occupancy Rate (%)", category: Capacity, format: Percentage },
        MetricDef { key: "avg_daily_discharges", display_name: "Average Daily Discharges", category: Capacity, format: Count },
        MetricDef { key: "period", display_name: "Time Period", category: Time, format: Count },
    ];
    CATALOG
}

static DISPLAY_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut names = HashMap::new();
    names.insert("trust_total_percent_within_18_weeks", "RTT 18-week Compliance");
    names.insert("trust_total_total_incomplete_pathways", "Total Waiting List");
    names.insert("trust_total_total_52_plus_weeks", "52+ Week Waiters");
    names.insert("trust_total_total_65_plus_weeks", "65+ Week Waiters");
    names.insert("trust_total_total_78_plus_weeks", "78+ Week Waiters");
    names.insert("trust_total_median_wait_weeks", "Median Wait Time");
    names.insert("ae_4hr_performance_pct", "A&E 4-hour Performance");
    names.insert("ae_attendances_total", "Total A&E Attendances");
    names.insert("ae_over_4hrs_total", "A&E Over 4 Hours");
    names.insert("ae_emergency_admissions_total", "Emergency Admissions");
    names.insert("ae_12hr_wait_admissions", "12+ Hour Wait Admissions");
    names.insert("rtt_general_surgery_percent_within_18_weeks", "General Surgery RTT");
    names.insert("rtt_urology_percent_within_18_weeks", "Urology RTT");
    names.insert("rtt_trauma_orthopaedics_percent_within_18_weeks", "Trauma & Orthopaedics RTT");
    names.insert("rtt_ent_percent_within_18_weeks", "ENT RTT");
    names.insert("rtt_ophthalmology_percent_within_18_weeks", "Ophthalmology RTT");
    names.insert("diag_mri_total_waiting", "MRI Total Waiting");
    names.insert("diag_mri_6week_breaches", "MRI 6+ Week Breaches");
    names.insert("diag_ct_total_waiting", "CT Total Waiting");
    names.insert("diag_ct_6week_breaches", "CT 6+ Week Breaches");
    names.insert("diag_ultrasound_total_waiting", "Ultrasound Total Waiting");
    names.insert("diag_ultrasound_6week_breaches", "Ultrasound 6+ Week Breaches");
    names.insert("virtual_ward_capacity", "Virtual Ward Capacity");
    names.insert("virtual_ward_occupancy_rate", "Virtual Ward Occupancy");
    names.insert("avg_daily_discharges", "Average Daily Discharges");
    names.insert("period", "Time Period");
    names
});

/// Display name for a metric key, falling back to Title Case of the raw key.
pub fn metric_display_name(key: &str) -> String {
    if let Some(name) = DISPLAY_NAMES.get(key) {
        return (*name).to_string();
    }
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specialty_keys_round_trip() {
        assert_eq!(Specialty::TraumaOrthopaedics.to_string(), "trauma_orthopaedics");
        assert_eq!(
            "trauma_orthopaedics".parse::<Specialty>().ok(),
            Some(Specialty::TraumaOrthopaedics)
        );
        assert_eq!(Specialty::Ent.display_name(), "ENT");
        assert_eq!(Specialty::GeneralSurgery.treatment_code(), "100");
    }

    #[test]
    fn test_metric_key_parse() {
        assert_eq!(
            MetricKey::parse("trust_total_percent_within_18_weeks"),
            Some(MetricKey::RttTotal(RttMetric::PercentWithin18Weeks))
        );
        assert_eq!(
            MetricKey::parse("rtt_urology_total_52_plus_weeks"),
            Some(MetricKey::RttSpecialty(Specialty::Urology, RttMetric::Total52PlusWeeks))
        );
        assert_eq!(
            MetricKey::parse("diag_mri_6week_breaches"),
            Some(MetricKey::Diagnostic(DiagnosticModality::Mri, DiagnosticMetric::SixWeekBreaches))
        );
        assert_eq!(
            MetricKey::parse("ae_4hr_performance_pct"),
            Some(MetricKey::Ae(AeMetric::FourHourPerformancePct))
        );
        assert_eq!(
            MetricKey::parse("virtual_ward_occupancy_rate"),
            Some(MetricKey::Capacity(CapacityMetric::VirtualWardOccupancyRate))
        );
        assert_eq!(MetricKey::parse("period"), Some(MetricKey::Period));
        assert_eq!(MetricKey::parse("rtt_astrology_percent_within_18_weeks"), None);
        assert_eq!(MetricKey::parse("not_a_column"), None);
    }

    #[test]
    fn test_metric_key_round_trip() {
        for key in [
            "trust_total_total_78_plus_weeks",
            "rtt_general_surgery_percent_within_18_weeks",
            "ae_12hr_wait_admissions",
            "diag_sleep_studies_total_waiting",
            "avg_daily_discharges",
        ] {
            let parsed = MetricKey::parse(key).expect(key);
            assert_eq!(parsed.as_key(), key);
        }
    }

    #[test]
    fn test_fraction_tagging() {
        assert!(MetricKey::parse("trust_total_percent_within_18_weeks")
            .unwrap()
            .stored_as_fraction());
        assert!(MetricKey::parse("rtt_ent_percent_within_18_weeks")
            .unwrap()
            .stored_as_fraction());
        assert!(MetricKey::parse("ae_4hr_performance_pct").unwrap().stored_as_fraction());
        // Occupancy is already a 0-100 value in the source.
        assert!(!MetricKey::parse("virtual_ward_occupancy_rate")
            .unwrap()
            .stored_as_fraction());
        assert!(!MetricKey::parse("diag_mri_total_waiting").unwrap().stored_as_fraction());
    }

    #[test]
    fn test_display_name_fallback() {
        assert_eq!(
            metric_display_name("trust_total_percent_within_18_weeks"),
            "RTT 18-week Compliance"
        );
        assert_eq!(
            metric_display_name("diag_colonoscopy_total_waiting"),
            "Diag Colonoscopy Total Waiting"
        );
    }

    #[test]
    fn test_catalog_keys_are_valid() {
        for def in available_metrics() {
            assert!(MetricKey::parse(def.key).is_some(), "bad catalog key {}", def.key);
        }
    }
}
