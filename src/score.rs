//! Throughput conversion and cross-worker aggregation.

use crate::error::{Error, Result};
use crate::profile::PhaseTiming;
use crate::schema::{
    AppInfo, Report, RunInfo, Summary, ThroughputScore, WlScores, WlStats,
};
use crate::stats::{parallel_rate, Stats};
use crate::workdir::RunConfig;
use crate::Phase;

/// One worker's throughput, in events/second per phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThroughputSample {
    pub gen: f64,
    pub sim: f64,
    pub trig_sim: f64,
    pub reco: f64,
    pub total: f64,
}

impl ThroughputSample {
    /// Convert phase durations to rates.
    ///
    /// A zero duration means the corresponding sentinel row never appeared in
    /// the log; the original harness divided anyway and reported `inf`, which
    /// we surface as an error instead.
    pub fn from_timing(timing: &PhaseTiming, events_per_thread: f64) -> Result<Self> {
        Ok(Self {
            gen: rate(timing.gen, events_per_thread, Phase::Gen)?,
            sim: rate(timing.sim, events_per_thread, Phase::Sim)?,
            trig_sim: rate(timing.trig_sim, events_per_thread, Phase::TrigSim)?,
            reco: rate(timing.reco, events_per_thread, Phase::Reco)?,
            total: rate(timing.total, events_per_thread, Phase::Total)?,
        })
    }
}

fn rate(seconds: f64, events: f64, phase: Phase) -> Result<f64> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(Error::ZeroDuration { phase });
    }
    Ok(events / seconds)
}

/// Per-phase spread of the worker throughputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunScores {
    pub gen: Stats,
    pub sim: Stats,
    pub trig_sim: Stats,
    pub reco: Stats,
    pub total: Stats,
}

/// Fold all worker samples into per-phase statistics.
pub fn aggregate(samples: &[ThroughputSample]) -> Result<RunScores> {
    let collect = |pick: fn(&ThroughputSample) -> f64| -> Vec<f64> {
        samples.iter().map(pick).collect()
    };

    Ok(RunScores {
        gen: Stats::from_samples(&collect(|s| s.gen))?,
        sim: Stats::from_samples(&collect(|s| s.sim))?,
        trig_sim: Stats::from_samples(&collect(|s| s.trig_sim))?,
        reco: Stats::from_samples(&collect(|s| s.reco))?,
        total: Stats::from_samples(&collect(|s| s.total))?,
    })
}

/// Build the JSON summary from the aggregated scores.
pub fn build_summary(scores: &RunScores, cfg: &RunConfig) -> Summary {
    Summary {
        run_info: RunInfo {
            copies: cfg.copies,
            threads_per_copy: cfg.threads_per_copy,
            events_per_thread: cfg.events_per_thread as u64,
        },
        report: Report {
            wl_scores: WlScores {
                gen: scores.gen.avg,
                sim: parallel_rate(scores.sim.avg, scores.trig_sim.avg),
                reco: scores.reco.avg,
                gen_sim_reco: scores.total.avg,
            },
            wl_stats: WlStats {
                throughput_score: ThroughputScore {
                    avg: scores.total.avg,
                    median: scores.total.median,
                    min: scores.total.min,
                    max: scores.total.max,
                    count: scores.total.count as u32,
                },
            },
        },
        app: AppInfo::default(),
    }
}
