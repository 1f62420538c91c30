use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the trust directory, derived by folding over all observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustDirectoryEntry {
    /// Trust organisation code
    pub code: String,

    /// Trust display name
    pub name: String,

    /// Owning Integrated Care Board name
    pub icb: String,

    /// Most recent reporting period seen for this trust
    pub latest_period: NaiveDate,

    /// Number of observations held for this trust
    pub record_count: usize,
}
