//! Analytics core for NHS trust performance dashboards
//!
//! This crate is the computation layer behind a browser-rendered dashboard
//! of NHS trust performance data: referral-to-treatment waiting times, A&E
//! performance, diagnostic-service breaches and virtual-ward capacity. A
//! single wide CSV snapshot is loaded once per session into an in-memory
//! index; everything else — trends, breach-rate ranking, opportunity
//! scoring, critical-issue detection, chart-ready series — is derived on
//! demand by pure functions over that index.
//!
//! Presentation (layout, chart widgets, navigation) lives outside this
//! crate and consumes it only through [`service::AnalyticsService`].
//!
//! # Example
//!
//! ```no_run
//! use nhs_trust_analytics::{AnalyticsService, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = AnalyticsService::new(Config::load()?);
//!     service.load_dataset().await?;
//!
//!     let trust = service.selection().current();
//!     if let Some(snapshot) = service.latest_observation(&trust) {
//!         for issue in service.critical_issues(snapshot) {
//!             println!("[{}] {}", issue.severity, issue.title);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod config;
pub mod dataset;
pub mod error;
pub mod models;
pub mod selection;
pub mod service;

pub use config::Config;
pub use dataset::DatasetIndex;
pub use error::{DataError, DataResult};
pub use selection::TrustSelection;
pub use service::AnalyticsService;
