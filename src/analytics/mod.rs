//! Derived-metric calculators and the chart data pipeline
//!
//! Everything in this module is a pure, synchronous function over snapshots
//! and series pulled from the dataset index. Sparse input never raises:
//! calculators return empty lists, zero rates or absent trends instead.
//!
//! # Components
//!
//! - **Trend**: month-on-month change classification with a stability
//!   dead-band and metric-polarity awareness
//! - **Diagnostics**: per-modality breach rates, opportunity scoring and
//!   ranking for insourcing decisions
//! - **Issues**: the declarative critical-issue rule scan
//! - **Specialty**: per-specialty RTT extraction and worst-first ranking
//! - **Performance**: Excellent/Good/Concern/Critical banding
//! - **Chart**: the filter → reshape → aggregate → bin pipeline behind the
//!   custom chart builder
//! - **Statistics**: correlation, histogram binning and insight strings

pub mod chart;
pub mod diagnostics;
pub mod issues;
pub mod performance;
pub mod specialty;
pub mod statistics;
pub mod trend;

pub use chart::{
    chart_title, generate as generate_chart_data, generate_at as generate_chart_data_at,
    time_period_label, AnalysisType, ChartConfig, ChartFilters, ChartRecord, ChartType,
    TimeWindow, TrustScope, COMPARISON_TRUSTS,
};
pub use diagnostics::{
    breach_level, critical_services, extract_diagnostic_services, opportunity_score,
    rank_by_opportunity, BreachLevel, CriticalServices, DiagnosticServiceRecord,
};
pub use issues::identify_critical_issues;
pub use performance::{performance_band, PerformanceBand};
pub use specialty::{
    breach_data, rank_worst_first, specialties_data, BreachBreakdown, BreachScope,
    SpecialtyPerformanceRecord,
};
pub use statistics::{
    correlation_strength, format_metric_value, histogram, insights, pearson, Correlation,
    CorrelationStrength, HistogramBin,
};
pub use trend::{previous_month_observation, trend, Trend, TrendDirection};
