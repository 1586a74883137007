//! Metric records produced by the analysis sources.
//!
//! Records are plain immutable values. Field names go over the wire in
//! camelCase.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Static code metrics for one system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaticMetric {
    pub system_name: String,
    /// Coupling between objects, in [8, 14].
    pub cbo: f64,
    /// Lack of cohesion of methods, in [0.55, 0.85].
    pub lcom: f64,
    /// In [6, 12].
    pub cyclomatic_complexity: f64,
    /// In [2, 5].
    pub inheritance_depth: f64,
}

/// Runtime metrics for one HTTP endpoint of the analysed system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeMetric {
    pub endpoint: String,
    /// In [150, 450].
    pub avg_response_ms: f64,
    /// In [10, 80].
    pub cpu_utilization_pct: f64,
    /// In [10_000, 1_000_000).
    pub calls: u64,
}

/// Change frequency and complexity of one file in version control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionHotspot {
    pub file_path: String,
    /// In [20, 300).
    pub changes: u32,
    pub complexity_score: f64,
}

/// A proposed module boundary grouping related classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSuggestion {
    pub module_name: String,
    pub classes: Vec<String>,
    /// In [0.65, 0.85].
    pub cohesion: f64,
    /// In [0.2, 0.4].
    pub coupling: f64,
}

/// Rounds `value` to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
