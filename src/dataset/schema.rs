//! Column schema for the unified monthly CSV
//!
//! Header names are resolved once, up front, into typed [`Column`]s; the
//! loader then walks each row against the resolved header instead of doing
//! per-cell string matching. Unit normalization is decided here too: metrics
//! the source stores as 0-1 fractions are tagged on [`MetricKey`] and scaled
//! to 0-100 while parsing, so no downstream consumer ever rescales.

use crate::models::MetricKey;

/// What one CSV column holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// Trust organisation code (required)
    TrustCode,
    /// Trust display name (required)
    TrustName,
    /// Reporting period, `YYYY-MM-DD` (required)
    Period,
    /// Integrated Care Board code
    IcbCode,
    /// Integrated Care Board name
    IcbName,
    /// A numeric metric following the `<domain>_<subkey>_<metric>` convention
    Metric(MetricKey),
    /// Anything the schema does not recognise; carried through untouched
    Ignored,
}

/// Resolve a trimmed header name to its column role.
pub fn column_for(header: &str) -> Column {
    match header {
        "trust_code" => Column::TrustCode,
        "trust_name" => Column::TrustName,
        "period" => Column::Period,
        "icb_code" => Column::IcbCode,
        "icb_name" => Column::IcbName,
        _ => MetricKey::parse(header).map(Column::Metric).unwrap_or(Column::Ignored),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MetricKey, RttMetric};

    #[test]
    fn test_identity_columns() {
        assert_eq!(column_for("trust_code"), Column::TrustCode);
        assert_eq!(column_for("trust_name"), Column::TrustName);
        assert_eq!(column_for("period"), Column::Period);
        assert_eq!(column_for("icb_name"), Column::IcbName);
    }

    #[test]
    fn test_metric_columns() {
        assert_eq!(
            column_for("trust_total_percent_within_18_weeks"),
            Column::Metric(MetricKey::RttTotal(RttMetric::PercentWithin18Weeks))
        );
        assert!(matches!(column_for("diag_ct_6week_breaches"), Column::Metric(_)));
    }

    #[test]
    fn test_unknown_columns_are_ignored() {
        assert_eq!(column_for("some_future_field"), Column::Ignored);
        assert_eq!(column_for(""), Column::Ignored);
    }
}
