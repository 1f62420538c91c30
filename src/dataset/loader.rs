//! CSV parsing for the unified monthly snapshot
//!
//! Parsing is deliberately forgiving at row level: rows without a trust code
//! or trust name are dropped silently (malformed trailing rows are expected
//! in the published extracts), individual unreadable cells are logged and
//! skipped, and only a fundamentally unreadable file aborts the load.

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::{debug, info, warn};

use crate::dataset::schema::{self, Column};
use crate::error::{DataError, DataResult};
use crate::models::{MetricKey, TrustObservation};

const PERIOD_FORMAT: &str = "%Y-%m-%d";

/// Parse the raw CSV text into observations.
///
/// Fails only when the header is unreadable or a required identity column is
/// absent entirely; every row-level problem degrades to a dropped row.
pub fn parse_csv(text: &str) -> DataResult<Vec<TrustObservation>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let columns: Vec<Column> = headers.iter().map(schema::column_for).collect();

    for (required, column) in [
        ("trust_code", Column::TrustCode),
        ("trust_name", Column::TrustName),
        ("period", Column::Period),
    ] {
        if !columns.contains(&column) {
            return Err(DataError::MissingColumn(required));
        }
    }

    let mut observations = Vec::new();
    let mut dropped = 0usize;

    for (row, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                warn!(row, %err, "skipping unreadable row");
                dropped += 1;
                continue;
            }
        };

        match build_observation(&columns, &record, row) {
            Some(observation) => observations.push(observation),
            None => dropped += 1,
        }
    }

    info!(rows = observations.len(), dropped, "parsed dataset snapshot");
    Ok(observations)
}

fn build_observation(
    columns: &[Column],
    record: &StringRecord,
    row: usize,
) -> Option<TrustObservation> {
    let mut trust_code = None;
    let mut trust_name = None;
    let mut period_raw = None;
    let mut icb_code = None;
    let mut icb_name = None;
    let mut values: Vec<(&MetricKey, f64)> = Vec::new();

    for (column, cell) in columns.iter().zip(record.iter()) {
        if cell.is_empty() {
            // Empty cell is the missing-field marker, not zero.
            continue;
        }
        match column {
            Column::TrustCode => trust_code = Some(cell),
            Column::TrustName => trust_name = Some(cell),
            Column::Period => period_raw = Some(cell),
            Column::IcbCode => icb_code = Some(cell.to_string()),
            Column::IcbName => icb_name = Some(cell.to_string()),
            Column::Metric(key) => match cell.parse::<f64>() {
                Ok(value) if value.is_finite() => {
                    let value = if key.stored_as_fraction() { value * 100.0 } else { value };
                    values.push((key, value));
                }
                _ => debug!(row, column = %key, cell, "non-numeric cell ignored"),
            },
            Column::Ignored => {}
        }
    }

    // Rows without trust identity are expected noise; drop without logging.
    let trust_code = trust_code?;
    let trust_name = trust_name?;

    let period_raw = period_raw?;
    let period = match NaiveDate::parse_from_str(period_raw, PERIOD_FORMAT) {
        Ok(period) => period,
        Err(err) => {
            warn!(row, period = period_raw, %err, "dropping row with malformed period");
            return None;
        }
    };

    let mut observation = TrustObservation::new(trust_code, trust_name, period);
    observation.icb_code = icb_code;
    observation.icb_name = icb_name;
    for (key, value) in values {
        observation.set_metric(key, value);
    }
    Some(observation)
}
