//! Statistical helpers shared by the chart pipeline
//!
//! Pearson correlation with qualitative strength labels, equal-width
//! histogram binning, insight-string generation, and metric value
//! formatting.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::Display;

use crate::analytics::chart::{AnalysisType, ChartConfig, ChartRecord};
use crate::models::MetricFormat;

/// Qualitative label for the magnitude of a correlation coefficient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum CorrelationStrength {
    #[strum(serialize = "Very Strong")]
    VeryStrong,
    #[strum(serialize = "Strong")]
    Strong,
    #[strum(serialize = "Moderate")]
    Moderate,
    #[strum(serialize = "Weak")]
    Weak,
    #[strum(serialize = "Very Weak")]
    VeryWeak,
}

/// Outcome of a correlation computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Correlation {
    /// A defined coefficient in [-1, 1] with its strength label
    Coefficient { r: f64, strength: CorrelationStrength },
    /// Fewer than two valid pairs
    InsufficientData,
    /// No fields selected, or zero variance in one dimension
    NotApplicable,
}

impl fmt::Display for Correlation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Correlation::Coefficient { r, strength } => write!(f, "{r:.3} ({strength})"),
            Correlation::InsufficientData => f.write_str("Insufficient data"),
            Correlation::NotApplicable => f.write_str("N/A"),
        }
    }
}

/// Strength label for an absolute correlation value.
pub fn correlation_strength(abs_r: f64) -> CorrelationStrength {
    if abs_r >= 0.8 {
        CorrelationStrength::VeryStrong
    } else if abs_r >= 0.6 {
        CorrelationStrength::Strong
    } else if abs_r >= 0.4 {
        CorrelationStrength::Moderate
    } else if abs_r >= 0.2 {
        CorrelationStrength::Weak
    } else {
        CorrelationStrength::VeryWeak
    }
}

/// Pearson correlation over chart records, pairing the two named fields.
///
/// Pairs where either field is absent or non-numeric are skipped. Requires
/// at least two valid pairs; zero variance in either dimension is reported
/// as not applicable rather than a division by zero.
pub fn pearson(records: &[ChartRecord], x_field: &str, y_field: &str) -> Correlation {
    if records.is_empty() || x_field.is_empty() || y_field.is_empty() {
        return Correlation::NotApplicable;
    }

    let pairs: Vec<(f64, f64)> = records
        .iter()
        .filter_map(|record| {
            let x = record.get(x_field)?.as_f64()?;
            let y = record.get(y_field)?.as_f64()?;
            (x.is_finite() && y.is_finite()).then_some((x, y))
        })
        .collect();

    if pairs.len() < 2 {
        return Correlation::InsufficientData;
    }

    let n = pairs.len() as f64;
    let sum_x: f64 = pairs.iter().map(|(x, _)| x).sum();
    let sum_y: f64 = pairs.iter().map(|(_, y)| y).sum();
    let sum_xy: f64 = pairs.iter().map(|(x, y)| x * y).sum();
    let sum_x2: f64 = pairs.iter().map(|(x, _)| x * x).sum();
    let sum_y2: f64 = pairs.iter().map(|(_, y)| y * y).sum();

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();

    if denominator == 0.0 {
        return Correlation::NotApplicable;
    }

    let r = (numerator / denominator).clamp(-1.0, 1.0);
    Correlation::Coefficient { r, strength: correlation_strength(r.abs()) }
}

/// One equal-width histogram bin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width bins spanning the observed min..max.
///
/// A value exactly at the maximum lands in the last bin (clamped index), so
/// no overflow bin ever appears and every value is counted exactly once.
pub fn histogram(values: &[f64], bin_count: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bin_count == 0 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let bin_size = (max - min) / bin_count as f64;

    let mut bins: Vec<HistogramBin> = (0..bin_count)
        .map(|i| HistogramBin {
            lower: min + i as f64 * bin_size,
            upper: min + (i + 1) as f64 * bin_size,
            count: 0,
        })
        .collect();

    for &value in values {
        // All values identical: bin_size is zero, everything counts in bin 0.
        let index = if bin_size > 0.0 {
            (((value - min) / bin_size) as usize).min(bin_count - 1)
        } else {
            0
        };
        bins[index].count += 1;
    }

    bins
}

/// Render a metric value for display.
pub fn format_metric_value(value: f64, format: MetricFormat) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    match format {
        MetricFormat::Percentage => format!("{value:.1}%"),
        MetricFormat::Count => group_thousands(value),
    }
}

fn group_thousands(value: f64) -> String {
    let negative = value < 0.0;
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Headline observations about a chart's data, shown under the chart.
pub fn insights(records: &[ChartRecord], config: &ChartConfig) -> Vec<String> {
    if records.is_empty() {
        return vec!["No data available for analysis".to_string()];
    }

    let mut insights = Vec::new();

    if let Some(y_key) = &config.y_axis {
        let field = y_key.as_key();
        let values: Vec<f64> = records
            .iter()
            .filter_map(|record| record.get(&field)?.as_f64())
            .filter(|v| v.is_finite())
            .collect();

        if !values.is_empty() {
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let avg = values.iter().sum::<f64>() / values.len() as f64;
            insights.push(format!("Range: {min:.1} to {max:.1} (avg: {avg:.1})"));

            if field.contains("percent_within_18_weeks") {
                let above_target = values.iter().filter(|&&v| v >= 92.0).count();
                let below_threshold = values.iter().filter(|&&v| v < 50.0).count();
                if above_target > 0 {
                    insights.push(format!("{above_target} data points meet the 92% RTT target"));
                }
                if below_threshold > 0 {
                    insights.push(format!(
                        "{below_threshold} data points show critical performance (<50%)"
                    ));
                }
            }
        }
    }

    if config.analysis_type == AnalysisType::Correlation {
        if let (Some(x_key), Some(y_key)) = (&config.x_axis, &config.y_axis) {
            if let Correlation::Coefficient { r, .. } =
                pearson(records, &x_key.as_key(), &y_key.as_key())
            {
                if r.abs() >= 0.6 {
                    let direction = if r > 0.0 { "positive" } else { "negative" };
                    insights.push(format!(
                        "Strong {direction} correlation detected between metrics"
                    ));
                }
            }
        }
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::chart::{ChartType, TrustScope};
    use crate::models::MetricKey;
    use serde_json::Value;

    fn records(pairs: &[(f64, f64)], x: &str, y: &str) -> Vec<ChartRecord> {
        pairs
            .iter()
            .map(|&(xv, yv)| {
                let mut record = ChartRecord::new();
                record.insert(x.to_string(), Value::from(xv));
                record.insert(y.to_string(), Value::from(yv));
                record
            })
            .collect()
    }

    #[test]
    fn test_perfect_positive_correlation() {
        let data = records(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0), (4.0, 8.0)], "x", "y");
        match pearson(&data, "x", "y") {
            Correlation::Coefficient { r, strength } => {
                assert!((r - 1.0).abs() < 1e-9);
                assert_eq!(strength, CorrelationStrength::VeryStrong);
            }
            other => panic!("expected coefficient, got {other:?}"),
        }
    }

    #[test]
    fn test_correlation_is_bounded() {
        let data = records(
            &[(1.0, 3.0), (2.0, 1.0), (3.0, 7.0), (4.0, 2.0), (5.0, 9.0)],
            "x",
            "y",
        );
        if let Correlation::Coefficient { r, .. } = pearson(&data, "x", "y") {
            assert!((-1.0..=1.0).contains(&r));
        } else {
            panic!("expected coefficient");
        }
    }

    #[test]
    fn test_correlation_degenerate_inputs() {
        assert_eq!(pearson(&[], "x", "y"), Correlation::NotApplicable);

        let one = records(&[(1.0, 2.0)], "x", "y");
        assert_eq!(pearson(&one, "x", "y"), Correlation::InsufficientData);

        // Zero variance in x.
        let flat = records(&[(5.0, 1.0), (5.0, 2.0), (5.0, 3.0)], "x", "y");
        assert_eq!(pearson(&flat, "x", "y"), Correlation::NotApplicable);

        // Missing fields in every record.
        let data = records(&[(1.0, 2.0), (2.0, 3.0)], "x", "y");
        assert_eq!(pearson(&data, "x", "missing"), Correlation::InsufficientData);
    }

    #[test]
    fn test_correlation_display() {
        let data = records(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)], "x", "y");
        assert_eq!(pearson(&data, "x", "y").to_string(), "1.000 (Very Strong)");
        assert_eq!(Correlation::NotApplicable.to_string(), "N/A");
        assert_eq!(Correlation::InsufficientData.to_string(), "Insufficient data");
    }

    #[test]
    fn test_strength_bands() {
        assert_eq!(correlation_strength(0.85), CorrelationStrength::VeryStrong);
        assert_eq!(correlation_strength(0.6), CorrelationStrength::Strong);
        assert_eq!(correlation_strength(0.45), CorrelationStrength::Moderate);
        assert_eq!(correlation_strength(0.2), CorrelationStrength::Weak);
        assert_eq!(correlation_strength(0.05), CorrelationStrength::VeryWeak);
    }

    #[test]
    fn test_histogram_counts_every_value_once() {
        let values: Vec<f64> = (0..97).map(|i| i as f64 * 1.3).collect();
        for bin_count in [1, 3, 10] {
            let bins = histogram(&values, bin_count);
            assert_eq!(bins.len(), bin_count);
            let total: usize = bins.iter().map(|b| b.count).sum();
            assert_eq!(total, values.len());
        }
    }

    #[test]
    fn test_histogram_max_value_in_last_bin() {
        let bins = histogram(&[0.0, 5.0, 10.0], 10);
        assert_eq!(bins.last().map(|b| b.count), Some(1));
        assert_eq!(bins[0].count, 1);
    }

    #[test]
    fn test_histogram_identical_values() {
        let bins = histogram(&[4.0, 4.0, 4.0], 5);
        let total: usize = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, 3);
        assert_eq!(bins[0].count, 3);
    }

    #[test]
    fn test_histogram_empty() {
        assert!(histogram(&[], 10).is_empty());
        assert!(histogram(&[1.0], 0).is_empty());
    }

    #[test]
    fn test_format_metric_value() {
        assert_eq!(format_metric_value(61.25, MetricFormat::Percentage), "61.2%");
        assert_eq!(format_metric_value(1234567.0, MetricFormat::Count), "1,234,567");
        assert_eq!(format_metric_value(950.0, MetricFormat::Count), "950");
        assert_eq!(format_metric_value(f64::NAN, MetricFormat::Count), "N/A");
    }

    fn config(analysis_type: AnalysisType, x: Option<&str>, y: Option<&str>) -> ChartConfig {
        ChartConfig {
            chart_type: ChartType::Line,
            x_axis: x.and_then(MetricKey::parse),
            y_axis: y.and_then(MetricKey::parse),
            filters: Default::default(),
            trust_selection: TrustScope::Single,
            time_period: None,
            analysis_type,
        }
    }

    #[test]
    fn test_insights_empty_data() {
        let config = config(AnalysisType::Trend, None, Some("trust_total_percent_within_18_weeks"));
        assert_eq!(insights(&[], &config), vec!["No data available for analysis"]);
    }

    #[test]
    fn test_insights_rtt_targets() {
        let key = "trust_total_percent_within_18_weeks";
        let data: Vec<ChartRecord> = [95.0, 45.0, 60.0]
            .iter()
            .map(|&v| {
                let mut record = ChartRecord::new();
                record.insert(key.to_string(), Value::from(v));
                record
            })
            .collect();

        let config = config(AnalysisType::Trend, None, Some(key));
        let lines = insights(&data, &config);
        assert_eq!(lines[0], "Range: 45.0 to 95.0 (avg: 66.7)");
        assert!(lines.contains(&"1 data points meet the 92% RTT target".to_string()));
        assert!(lines.contains(&"1 data points show critical performance (<50%)".to_string()));
    }

    #[test]
    fn test_insights_strong_correlation() {
        let x_key = "ae_attendances_total";
        let y_key = "trust_total_percent_within_18_weeks";
        let data = records(
            &[(1000.0, 80.0), (2000.0, 70.0), (3000.0, 60.0), (4000.0, 50.0)],
            x_key,
            y_key,
        );
        let config = config(AnalysisType::Correlation, Some(x_key), Some(y_key));
        let lines = insights(&data, &config);
        assert!(lines
            .iter()
            .any(|l| l == "Strong negative correlation detected between metrics"));
    }
}
