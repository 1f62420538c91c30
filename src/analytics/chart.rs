//! The custom chart builder's data pipeline
//!
//! One strictly-ordered pipeline backs every custom chart: select base rows
//! by trust scope, narrow to the requested time window, apply the user's
//! filters, then reshape for the analysis mode. Records come out as JSON
//! objects keyed by the selected axis keys, ready for the chart widgets.

use chrono::{Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use strum_macros::Display;

use crate::analytics::statistics;
use crate::dataset::DatasetIndex;
use crate::models::{AeMetric, MetricKey, RttMetric, TrustObservation};

/// A chart-ready record: a JSON object keyed by axis keys and label fields.
pub type ChartRecord = Map<String, Value>;

/// Fixed comparison set used by the `multiple` trust scope until the UI
/// grows a picker for it.
pub const COMPARISON_TRUSTS: &[&str] = &["RGT", "RGN", "RQW"];

const HISTOGRAM_BIN_COUNT: usize = 10;

/// Fields checked by the exclude-zero-values filter: a row survives when at
/// least one of these is present and nonzero.
const EXCLUDE_ZERO_KEYS: [MetricKey; 4] = [
    MetricKey::RttTotal(RttMetric::PercentWithin18Weeks),
    MetricKey::RttTotal(RttMetric::TotalIncompletePathways),
    MetricKey::Ae(AeMetric::FourHourPerformancePct),
    MetricKey::Ae(AeMetric::AttendancesTotal),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Line,
    Bar,
    Scatter,
    Area,
    Heatmap,
}

/// Which trusts feed the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustScope {
    /// Full series of the currently selected trust
    Single,
    /// The fixed comparison set, full series each
    Multiple,
    /// Latest observation of every trust in the directory
    All,
}

/// Time window applied after base selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeWindow {
    /// One latest-period row per trust
    #[serde(rename = "latest")]
    Latest,
    #[serde(rename = "3months")]
    ThreeMonths,
    #[serde(rename = "6months")]
    SixMonths,
    /// No filtering; everything available
    #[serde(rename = "12months")]
    TwelveMonths,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AnalysisType {
    Trend,
    Correlation,
    Distribution,
}

/// User-applied filters, AND-combined in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartFilters {
    /// Keep only rows belonging to this ICB
    pub icb: Option<String>,

    /// Inclusive lower bound on trust-wide RTT compliance (0-100)
    pub rtt_min: Option<f64>,

    /// Inclusive upper bound on trust-wide RTT compliance (0-100)
    pub rtt_max: Option<f64>,

    /// Drop rows whose key numeric fields are all zero or missing
    #[serde(default)]
    pub exclude_zeros: bool,

    /// Drop rows of trusts with fewer than this many rows in the filtered
    /// set. Deliberately evaluated last: the count reflects the filtered
    /// population, not the raw dataset.
    pub min_sample_size: Option<usize>,
}

/// Full configuration of one custom chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub chart_type: ChartType,
    pub x_axis: Option<MetricKey>,
    pub y_axis: Option<MetricKey>,
    #[serde(default)]
    pub filters: ChartFilters,
    pub trust_selection: TrustScope,
    pub time_period: Option<TimeWindow>,
    pub analysis_type: AnalysisType,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            chart_type: ChartType::Line,
            x_axis: None,
            y_axis: None,
            filters: ChartFilters::default(),
            trust_selection: TrustScope::Single,
            time_period: None,
            analysis_type: AnalysisType::Trend,
        }
    }
}

/// Run the pipeline against today's date.
pub fn generate(config: &ChartConfig, index: &DatasetIndex, current_trust: &str) -> Vec<ChartRecord> {
    generate_at(config, index, current_trust, Utc::now().date_naive())
}

/// Run the pipeline with an explicit reference date for the relative time
/// windows. Stage order is fixed: base selection, time window, user
/// filters, reshape.
pub fn generate_at(
    config: &ChartConfig,
    index: &DatasetIndex,
    current_trust: &str,
    today: NaiveDate,
) -> Vec<ChartRecord> {
    if config.x_axis.is_none() && config.y_axis.is_none() {
        return Vec::new();
    }

    let rows = select_base_rows(config.trust_selection, index, current_trust);
    let rows = apply_time_window(rows, config.time_period, today);
    let rows = apply_filters(rows, &config.filters);

    match config.analysis_type {
        AnalysisType::Trend => reshape_trend(&rows, config),
        AnalysisType::Correlation => reshape_correlation(&rows, config),
        AnalysisType::Distribution => reshape_distribution(&rows, config),
    }
}

fn select_base_rows<'a>(
    scope: TrustScope,
    index: &'a DatasetIndex,
    current_trust: &str,
) -> Vec<&'a TrustObservation> {
    match scope {
        TrustScope::Single => index.trust_series(current_trust).iter().collect(),
        TrustScope::Multiple => COMPARISON_TRUSTS
            .iter()
            .flat_map(|code| index.trust_series(code))
            .collect(),
        TrustScope::All => index
            .directory()
            .iter()
            .filter_map(|entry| index.latest_observation(&entry.code))
            .collect(),
    }
}

fn apply_time_window<'a>(
    rows: Vec<&'a TrustObservation>,
    window: Option<TimeWindow>,
    today: NaiveDate,
) -> Vec<&'a TrustObservation> {
    match window {
        None | Some(TimeWindow::TwelveMonths) => rows,
        Some(TimeWindow::Latest) => latest_per_trust(rows),
        Some(TimeWindow::ThreeMonths) => filter_since(rows, months_ago(today, 3)),
        Some(TimeWindow::SixMonths) => filter_since(rows, months_ago(today, 6)),
    }
}

fn latest_per_trust(rows: Vec<&TrustObservation>) -> Vec<&TrustObservation> {
    let mut kept: Vec<&TrustObservation> = Vec::new();
    let mut position: HashMap<&str, usize> = HashMap::new();

    for obs in rows {
        match position.get(obs.trust_code.as_str()) {
            Some(&idx) => {
                if obs.period > kept[idx].period {
                    kept[idx] = obs;
                }
            }
            None => {
                position.insert(obs.trust_code.as_str(), kept.len());
                kept.push(obs);
            }
        }
    }
    kept
}

/// First day of the month N months before the reference date.
fn months_ago(today: NaiveDate, months: u32) -> NaiveDate {
    let shifted = today - Months::new(months);
    shifted.with_day(1).unwrap_or(shifted)
}

fn filter_since(mut rows: Vec<&TrustObservation>, cutoff: NaiveDate) -> Vec<&TrustObservation> {
    rows.retain(|obs| obs.period >= cutoff);
    rows
}

fn apply_filters<'a>(
    mut rows: Vec<&'a TrustObservation>,
    filters: &ChartFilters,
) -> Vec<&'a TrustObservation> {
    if let Some(icb) = &filters.icb {
        rows.retain(|obs| obs.icb_name.as_deref() == Some(icb.as_str()));
    }

    if let Some(min) = filters.rtt_min {
        rows.retain(|obs| obs.rtt_total.percent_within_18_weeks.is_some_and(|v| v >= min));
    }
    if let Some(max) = filters.rtt_max {
        rows.retain(|obs| obs.rtt_total.percent_within_18_weeks.is_some_and(|v| v <= max));
    }

    if filters.exclude_zeros {
        rows.retain(|obs| {
            EXCLUDE_ZERO_KEYS.iter().any(|key| obs.metric(key).is_some_and(|v| v != 0.0))
        });
    }

    if let Some(min_size) = filters.min_sample_size {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for obs in &rows {
            *counts.entry(obs.trust_code.as_str()).or_insert(0) += 1;
        }
        rows.retain(|obs| counts.get(obs.trust_code.as_str()).copied().unwrap_or(0) >= min_size);
    }

    rows
}

/// Resolve an axis against a snapshot: the period becomes its chart label,
/// numeric metrics become numbers, missing values become JSON null.
fn field_value(observation: &TrustObservation, key: &MetricKey) -> Value {
    match key {
        MetricKey::Period => Value::String(period_label(observation.period)),
        _ => observation.metric(key).map(Value::from).unwrap_or(Value::Null),
    }
}

fn insert_axis(record: &mut ChartRecord, observation: &TrustObservation, axis: Option<&MetricKey>) {
    if let Some(key) = axis {
        record.insert(key.as_key(), field_value(observation, key));
    }
}

/// Short month-year label, e.g. "Mar 2025".
pub fn period_label(period: NaiveDate) -> String {
    period.format("%b %Y").to_string()
}

fn reshape_trend(rows: &[&TrustObservation], config: &ChartConfig) -> Vec<ChartRecord> {
    rows.iter()
        .map(|obs| {
            let mut record = ChartRecord::new();
            if config.trust_selection == TrustScope::Single {
                record.insert("period".to_string(), Value::String(period_label(obs.period)));
                insert_axis(&mut record, obs, config.x_axis.as_ref());
                insert_axis(&mut record, obs, config.y_axis.as_ref());
                record.insert("trust_name".to_string(), Value::String(obs.trust_name.clone()));
                record.insert("trust_code".to_string(), Value::String(obs.trust_code.clone()));
            } else {
                record.insert(
                    "trust_name".to_string(),
                    Value::String(format!("{} ({})", obs.trust_name, obs.trust_code)),
                );
                insert_axis(&mut record, obs, config.x_axis.as_ref());
                insert_axis(&mut record, obs, config.y_axis.as_ref());
                record.insert("period".to_string(), Value::String(period_label(obs.period)));
                record.insert(
                    "icb_name".to_string(),
                    obs.icb_name.clone().map(Value::String).unwrap_or(Value::Null),
                );
            }
            record
        })
        .collect()
}

fn reshape_correlation(rows: &[&TrustObservation], config: &ChartConfig) -> Vec<ChartRecord> {
    let (x_key, y_key) = match (&config.x_axis, &config.y_axis) {
        (Some(x), Some(y)) => (x, y),
        _ => return Vec::new(),
    };

    rows.iter()
        .filter_map(|obs| {
            let x = field_value(obs, x_key);
            let y = field_value(obs, y_key);
            // Zero is not a valid observation for correlation: a zero here
            // is overwhelmingly an unreported metric, not a measurement.
            if x.is_null() || y.is_null() || is_zero(&x) || is_zero(&y) {
                return None;
            }

            let mut record = ChartRecord::new();
            record.insert(x_key.as_key(), x);
            record.insert(y_key.as_key(), y);
            record.insert("trust_name".to_string(), Value::String(obs.trust_name.clone()));
            record.insert("trust_code".to_string(), Value::String(obs.trust_code.clone()));
            record.insert("period".to_string(), Value::String(period_label(obs.period)));
            Some(record)
        })
        .collect()
}

fn is_zero(value: &Value) -> bool {
    value.as_f64().is_some_and(|n| n == 0.0)
}

fn reshape_distribution(rows: &[&TrustObservation], config: &ChartConfig) -> Vec<ChartRecord> {
    let y_key = match &config.y_axis {
        Some(key) => key,
        None => return Vec::new(),
    };

    let values: Vec<f64> = rows.iter().filter_map(|obs| obs.metric(y_key)).collect();
    if values.is_empty() {
        return Vec::new();
    }

    statistics::histogram(&values, HISTOGRAM_BIN_COUNT)
        .into_iter()
        .map(|bin| {
            let percentage = bin.count as f64 / values.len() as f64 * 100.0;
            let mut record = ChartRecord::new();
            record.insert(
                "bin".to_string(),
                Value::String(format!("{:.1} - {:.1}", bin.lower, bin.upper)),
            );
            record.insert("count".to_string(), Value::from(bin.count));
            record.insert("percentage".to_string(), Value::from((percentage * 10.0).round() / 10.0));
            record
        })
        .collect()
}

/// Title shown above a custom chart.
pub fn chart_title(config: &ChartConfig) -> String {
    if config.x_axis.is_none() && config.y_axis.is_none() {
        return "Custom Analysis".to_string();
    }

    let x_label = config.x_axis.as_ref().map(MetricKey::display_name).unwrap_or_default();
    let y_label = config.y_axis.as_ref().map(MetricKey::display_name).unwrap_or_default();

    match config.analysis_type {
        AnalysisType::Correlation => format!("{y_label} vs {x_label}"),
        AnalysisType::Distribution => format!("Distribution of {y_label}"),
        AnalysisType::Trend => {
            if config.trust_selection == TrustScope::Single {
                format!("{y_label} Over Time")
            } else {
                format!("{y_label} Comparison")
            }
        }
    }
}

/// Subtitle describing the selected time window.
pub fn time_period_label(window: Option<TimeWindow>) -> &'static str {
    match window {
        Some(TimeWindow::Latest) => "Latest Month",
        Some(TimeWindow::ThreeMonths) => "Last 3 Months",
        Some(TimeWindow::SixMonths) => "Last 6 Months",
        Some(TimeWindow::TwelveMonths) | None => "All Available Data",
    }
}
