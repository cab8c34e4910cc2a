use serde::{Deserialize, Serialize};

/// Summary statistics over the whole order collection.
///
/// Always derived on request; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub blocked: usize,
    pub approved: usize,
    pub pending: usize,
    pub avg_risk: f64,
    pub blocked_value: f64,
}
