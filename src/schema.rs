//! JSON summary-report schema.
//!
//! The key layout is fixed; downstream tooling consumes these reports by
//! exact key, including the kebab-case `wl-scores` / `wl-stats` /
//! `gen-sim-reco` names.

use serde::{Deserialize, Serialize};

pub const APP_VERSION: &str = "v0.15";
pub const APP_DESCRIPTION: &str =
    "Belle-2 generation, simulation, and reconstruction of BBbar events based on release 05-01-05";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub copies: u32,
    pub threads_per_copy: u32,
    pub events_per_thread: u64,
}

/// Mean throughput per phase, in events/second.
///
/// `sim` folds detector simulation and trigger simulation into one figure
/// (see [`crate::stats::parallel_rate`]); `gen_sim_reco` is the whole-pipeline
/// score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WlScores {
    pub gen: f64,
    pub sim: f64,
    pub reco: f64,
    #[serde(rename = "gen-sim-reco")]
    pub gen_sim_reco: f64,
}

/// Spread of the whole-pipeline throughput across workers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThroughputScore {
    pub avg: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WlStats {
    pub throughput_score: ThroughputScore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    #[serde(rename = "wl-scores")]
    pub wl_scores: WlScores,
    #[serde(rename = "wl-stats")]
    pub wl_stats: WlStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfo {
    pub version: String,
    pub description: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            version: APP_VERSION.to_string(),
            description: APP_DESCRIPTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub run_info: RunInfo,
    pub report: Report,
    pub app: AppInfo,
}
