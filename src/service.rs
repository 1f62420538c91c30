//! The query facade consumed by the presentation layer
//!
//! One [`AnalyticsService`] instance is created at application start and
//! shared. Its dataset load is a coalescing one-shot: however many UI
//! components call [`AnalyticsService::load_dataset`] while mounting, at
//! most one underlying read runs, and the parsed index is cached for the
//! life of the process. Every query degrades to empty results while the
//! index is unloaded or after a failed load — "not yet loaded" is a valid
//! state, never an error.

use chrono::NaiveDate;
use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::analytics::{
    chart, diagnostics, issues, specialty, ChartConfig, ChartRecord, DiagnosticServiceRecord,
    SpecialtyPerformanceRecord,
};
use crate::config::Config;
use crate::dataset::DatasetIndex;
use crate::error::DataResult;
use crate::models::{
    available_metrics, CriticalIssue, MetricDef, TrustDirectoryEntry, TrustObservation,
};
use crate::selection::TrustSelection;

/// Singleton analytics service: owns the dataset cache, the configuration
/// and the current-trust selection.
#[derive(Debug)]
pub struct AnalyticsService {
    config: Config,
    index: OnceCell<DatasetIndex>,
    selection: TrustSelection,
}

impl AnalyticsService {
    pub fn new(config: Config) -> Self {
        let selection = TrustSelection::new(config.default_trust_code.clone());
        Self { config, index: OnceCell::new(), selection }
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(Config::default())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The shared current-trust selection context.
    pub fn selection(&self) -> &TrustSelection {
        &self.selection
    }

    /// Load and cache the dataset. Idempotent and coalescing: concurrent
    /// callers share a single underlying read, and later calls return
    /// immediately with the cached contents.
    pub async fn load_dataset(&self) -> DataResult<()> {
        self.index
            .get_or_try_init(|| async {
                let path = &self.config.dataset_path;
                info!(path = %path.display(), "loading dataset");
                let text = tokio::fs::read_to_string(path).await.inspect_err(|err| {
                    error!(path = %path.display(), %err, "dataset source unreachable");
                })?;
                DatasetIndex::from_csv(&text)
            })
            .await
            .map(|_| ())
    }

    /// True once a load has completed successfully.
    pub fn is_loaded(&self) -> bool {
        self.index.get().is_some()
    }

    fn index(&self) -> Option<&DatasetIndex> {
        self.index.get()
    }

    /// All observations for a trust, period-ascending. Empty while
    /// unloaded or for unknown codes.
    pub fn trust_series(&self, trust_code: &str) -> &[TrustObservation] {
        self.index().map(|index| index.trust_series(trust_code)).unwrap_or(&[])
    }

    /// The trust directory, sorted by display name.
    pub fn directory(&self) -> &[TrustDirectoryEntry] {
        self.index().map(DatasetIndex::directory).unwrap_or(&[])
    }

    /// One trust snapshot for an exact period.
    pub fn observation(&self, trust_code: &str, period: NaiveDate) -> Option<&TrustObservation> {
        self.index().and_then(|index| index.observation(trust_code, period))
    }

    /// The chronologically latest snapshot for a trust.
    pub fn latest_observation(&self, trust_code: &str) -> Option<&TrustObservation> {
        self.index().and_then(|index| index.latest_observation(trust_code))
    }

    /// Diagnostic services for a snapshot, ranked by opportunity score.
    pub fn diagnostic_services(
        &self,
        observation: &TrustObservation,
    ) -> Vec<DiagnosticServiceRecord> {
        diagnostics::rank_by_opportunity(diagnostics::extract_diagnostic_services(observation))
    }

    /// Critical issues for a snapshot, severity-sorted.
    pub fn critical_issues(&self, observation: &TrustObservation) -> Vec<CriticalIssue> {
        issues::identify_critical_issues(observation)
    }

    /// Per-specialty RTT records for a snapshot, worst performer first.
    pub fn specialty_ranking(
        &self,
        observation: &TrustObservation,
    ) -> Vec<SpecialtyPerformanceRecord> {
        specialty::rank_worst_first(specialty::specialties_data(observation))
    }

    /// Chart-ready records for a chart-builder configuration.
    pub fn chart_data(&self, config: &ChartConfig, current_trust: &str) -> Vec<ChartRecord> {
        self.index()
            .map(|index| chart::generate(config, index, current_trust))
            .unwrap_or_default()
    }

    /// The metric catalog backing the chart builder's axis pickers.
    pub fn available_metrics(&self) -> &'static [MetricDef] {
        available_metrics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::TrustScope;

    #[tokio::test]
    async fn test_queries_degrade_before_load() {
        let service = AnalyticsService::with_defaults();
        assert!(!service.is_loaded());
        assert!(service.trust_series("RGT").is_empty());
        assert!(service.directory().is_empty());
        assert!(service.latest_observation("RGT").is_none());

        let config = ChartConfig {
            trust_selection: TrustScope::All,
            y_axis: crate::models::MetricKey::parse("trust_total_percent_within_18_weeks"),
            ..ChartConfig::default()
        };
        assert!(service.chart_data(&config, "RGT").is_empty());
    }

    #[test]
    fn test_failed_load_leaves_cache_empty() {
        let mut config = Config::default();
        config.dataset_path = "/definitely/not/a/real/file.csv".into();
        let service = AnalyticsService::new(config);

        tokio_test::block_on(async {
            assert!(service.load_dataset().await.is_err());
        });
        assert!(!service.is_loaded());
        assert!(service.directory().is_empty());
    }

    #[test]
    fn test_selection_defaults_from_config() {
        let mut config = Config::default();
        config.default_trust_code = "RQW".to_string();
        let service = AnalyticsService::new(config);
        assert_eq!(service.selection().current(), "RQW");
    }
}
