//! The in-memory dataset index
//!
//! Built once from the parsed snapshot and immutable afterwards; all query
//! functions are cheap lookups over pre-sorted data. There is no update or
//! delete path — the cache lives for the process.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::DataResult;
use crate::models::{TrustDirectoryEntry, TrustObservation};

use super::loader;

const UNKNOWN_ICB: &str = "Unknown ICB";

/// Parsed observation set plus the derived trust directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetIndex {
    series: BTreeMap<String, Vec<TrustObservation>>,
    directory: Vec<TrustDirectoryEntry>,
}

impl DatasetIndex {
    /// Build the index from raw CSV text.
    pub fn from_csv(text: &str) -> DataResult<Self> {
        Ok(Self::from_observations(loader::parse_csv(text)?))
    }

    /// Build the index from already-parsed observations.
    ///
    /// Observations are grouped per trust, sorted period-ascending, and
    /// deduplicated per (trust, period) with the later input row winning.
    pub fn from_observations(observations: Vec<TrustObservation>) -> Self {
        let mut by_trust: BTreeMap<String, BTreeMap<NaiveDate, TrustObservation>> = BTreeMap::new();

        for observation in observations {
            let per_trust = by_trust.entry(observation.trust_code.clone()).or_default();
            if let Some(previous) = per_trust.insert(observation.period, observation) {
                debug!(
                    trust = %previous.trust_code,
                    period = %previous.period,
                    "duplicate trust/period row, keeping the later one"
                );
            }
        }

        let mut series = BTreeMap::new();
        let mut directory = Vec::with_capacity(by_trust.len());

        for (code, per_period) in by_trust {
            let observations: Vec<TrustObservation> = per_period.into_values().collect();
            // Non-empty by construction: every entry came from an observation.
            if let (Some(first), Some(last)) = (observations.first(), observations.last()) {
                directory.push(TrustDirectoryEntry {
                    code: code.clone(),
                    name: first.trust_name.clone(),
                    icb: first.icb_name.clone().unwrap_or_else(|| UNKNOWN_ICB.to_string()),
                    latest_period: last.period,
                    record_count: observations.len(),
                });
            }
            series.insert(code, observations);
        }

        directory.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.code.cmp(&b.code)));

        Self { series, directory }
    }

    /// All observations for a trust, sorted by period ascending.
    ///
    /// Unknown codes yield an empty slice, never an error.
    pub fn trust_series(&self, trust_code: &str) -> &[TrustObservation] {
        self.series.get(trust_code).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The trust directory, sorted by display name ascending.
    pub fn directory(&self) -> &[TrustDirectoryEntry] {
        &self.directory
    }

    /// A single trust snapshot for an exact period.
    pub fn observation(&self, trust_code: &str, period: NaiveDate) -> Option<&TrustObservation> {
        let series = self.trust_series(trust_code);
        series
            .binary_search_by(|obs| obs.period.cmp(&period))
            .ok()
            .map(|idx| &series[idx])
    }

    /// The chronologically latest snapshot for a trust.
    pub fn latest_observation(&self, trust_code: &str) -> Option<&TrustObservation> {
        self.trust_series(trust_code).last()
    }

    /// True when the index holds no observations at all.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
