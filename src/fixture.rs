//! Synthetic run-tree generation.
//!
//! Deterministically fabricates the directory layout a real benchmark run
//! leaves behind (`proc_<i>/output` with a module-statistics table at the
//! end of each log), so the harness can be exercised and tested without a
//! basf2 installation. Per-copy seeds are derived from a master seed; copies
//! are rendered in parallel.

use std::fs;
use std::path::Path;

use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::error::Result;
use crate::profile::PhaseTiming;
use crate::workdir;

const SETUP_MODULES: &[&str] = &["EventInfoSetter", "Progress", "Gearbox", "Geometry"];
const SIM_MODULES: &[&str] = &[
    "FullSim",
    "PXDDigitizer",
    "SVDDigitizer",
    "CDCDigitizer",
    "ECLDigitizer",
];
const TRIG_MODULES: &[&str] = &["TRGCDC", "TRGECL", "TRGGRL"];
const RECO_MODULES: &[&str] = &[
    "CDCHitFinder",
    "VXDTF2",
    "Ext",
    "ECLReconstructor",
    "KLMReconstructor",
];

#[derive(Debug, Clone)]
pub struct FixtureConfig {
    /// Number of `proc_<i>` directories to create.
    pub copies: u32,
    /// Events per worker, written into the Calls column.
    pub events: u64,
    /// Master seed for deterministic generation.
    pub seed: u64,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            copies: 4,
            events: 50,
            seed: 42,
        }
    }
}

fn per_copy_seed(master_seed: u64, copy: u32) -> u64 {
    master_seed
        .wrapping_add(copy as u64)
        .wrapping_mul(0x517cc1b727220a95)
}

/// Module time quantized to milliseconds so the printed value parses back to
/// the same f64.
fn module_seconds(rng: &mut ChaCha8Rng, lo: f64, hi: f64) -> f64 {
    (rng.gen_range(lo..hi) * 1000.0).round() / 1000.0
}

fn push_row(table: &mut String, name: &str, calls: u64, rng: &mut ChaCha8Rng, seconds: f64) {
    let memory: u64 = rng.gen_range(0..200);
    let per_call_ms = seconds * 1000.0 / calls.max(1) as f64;
    table.push_str(&format!(
        "{name:<26}| {calls:>10} | {memory:>10} | {seconds:>10.3} | {per_call_ms:>8.2} +- {:>6.2}\n",
        per_call_ms * 0.05
    ));
}

/// Render one worker log together with the phase durations its table encodes.
pub fn render_log(rng: &mut ChaCha8Rng, events: u64) -> (String, PhaseTiming) {
    let mut log = String::new();
    log.push_str("[INFO] Steering file: bmk.py\n");
    log.push_str("[INFO] Random number seed set to 12345\n");
    log.push_str("[INFO] Starting event processing, experiment 1003\n\n");

    let sep = "=".repeat(92);
    log.push_str(&sep);
    log.push('\n');
    log.push_str(
        "Name                      |      Calls | Memory(MB) |    Time(s) | Time(ms)/Call\n",
    );
    log.push_str(&sep);
    log.push('\n');

    let mut timing = PhaseTiming::default();
    let mut grand_total = 0.0;

    // Setup rows run before generation; their time is discarded when the
    // EvtGenInput row commits, but it still counts toward the grand total.
    for name in SETUP_MODULES {
        let t = module_seconds(rng, 0.001, 0.2);
        grand_total += t;
        push_row(&mut log, name, events, rng, t);
    }

    timing.gen = module_seconds(rng, 0.5, 3.0);
    grand_total += timing.gen;
    push_row(&mut log, "EvtGenInput", events, rng, timing.gen);

    for name in SIM_MODULES {
        let t = module_seconds(rng, 2.0, 15.0);
        timing.sim += t;
        grand_total += t;
        push_row(&mut log, name, events, rng, t);
    }
    push_row(&mut log, "Sum_Simulation", events, rng, timing.sim);

    for name in TRIG_MODULES {
        let t = module_seconds(rng, 0.2, 2.0);
        timing.trig_sim += t;
        grand_total += t;
        push_row(&mut log, name, events, rng, t);
    }
    push_row(&mut log, "Sum_TriggerSimulation", events, rng, timing.trig_sim);

    for name in RECO_MODULES {
        let t = module_seconds(rng, 1.0, 8.0);
        timing.reco += t;
        grand_total += t;
        push_row(&mut log, name, events, rng, t);
    }
    let trigger = module_seconds(rng, 0.1, 1.0);
    timing.reco += trigger;
    grand_total += trigger;
    push_row(&mut log, "SoftwareTrigger", events, rng, trigger);

    let output = module_seconds(rng, 0.1, 1.0);
    grand_total += output;
    push_row(&mut log, "RootOutput", events, rng, output);

    timing.total = grand_total;
    push_row(&mut log, "Total", events, rng, grand_total);

    log.push_str(&sep);
    log.push('\n');

    (log, timing)
}

/// Write a full synthetic run tree under `root`, one `proc_<i>/output` per
/// copy. Returns the phase durations encoded in each log, in copy order.
pub fn write_run_tree(root: &Path, cfg: &FixtureConfig) -> Result<Vec<PhaseTiming>> {
    let rendered: Vec<(u32, String, PhaseTiming)> = (1..=cfg.copies)
        .into_par_iter()
        .map(|copy| {
            let mut rng = ChaCha8Rng::seed_from_u64(per_copy_seed(cfg.seed, copy));
            let (log, timing) = render_log(&mut rng, cfg.events);
            (copy, log, timing)
        })
        .collect();

    let mut timings = Vec::with_capacity(rendered.len());
    for (copy, log, timing) in rendered {
        let dir = workdir::proc_dir(root, copy);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("output"), log)?;
        timings.push(timing);
    }
    Ok(timings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::parse_profile;
    use tempfile::tempdir;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn rendered_log_parses_back_to_its_timings() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let (log, expected) = render_log(&mut rng, 50);
        let parsed = parse_profile(&log).unwrap();

        assert_close(parsed.gen, expected.gen);
        assert_close(parsed.sim, expected.sim);
        assert_close(parsed.trig_sim, expected.trig_sim);
        assert_close(parsed.reco, expected.reco);
        assert_close(parsed.total, expected.total);
    }

    #[test]
    fn generation_is_deterministic() {
        let mut rng1 = ChaCha8Rng::seed_from_u64(42);
        let mut rng2 = ChaCha8Rng::seed_from_u64(42);
        let (log1, t1) = render_log(&mut rng1, 50);
        let (log2, t2) = render_log(&mut rng2, 50);
        assert_eq!(log1, log2);
        assert_eq!(t1, t2);
    }

    #[test]
    fn copies_get_distinct_timings() {
        let dir = tempdir().unwrap();
        let cfg = FixtureConfig {
            copies: 3,
            ..Default::default()
        };
        let timings = write_run_tree(dir.path(), &cfg).unwrap();
        assert_eq!(timings.len(), 3);
        assert_ne!(timings[0], timings[1]);

        for copy in 1..=3 {
            let text = std::fs::read_to_string(workdir::worker_log(dir.path(), copy)).unwrap();
            let parsed = parse_profile(&text).unwrap();
            assert_close(parsed.sim, timings[(copy - 1) as usize].sim);
        }
    }

    #[test]
    fn full_report_pipeline() {
        use crate::score::{self, ThroughputSample};
        use crate::workdir::RunConfig;

        let dir = tempdir().unwrap();
        let cfg = FixtureConfig {
            copies: 3,
            events: 50,
            seed: 7,
        };
        write_run_tree(dir.path(), &cfg).unwrap();

        let run = RunConfig {
            copies: 3,
            threads_per_copy: 4,
            events_per_thread: 50.0,
        };
        let mut samples = Vec::new();
        for copy in 1..=run.copies {
            let text = std::fs::read_to_string(workdir::worker_log(dir.path(), copy)).unwrap();
            let timing = parse_profile(&text).unwrap();
            samples.push(ThroughputSample::from_timing(&timing, run.events_per_thread).unwrap());
        }

        let scores = score::aggregate(&samples).unwrap();
        let summary = score::build_summary(&scores, &run);

        let mut totals: Vec<f64> = samples.iter().map(|s| s.total).collect();
        totals.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let ts = &summary.report.wl_stats.throughput_score;
        assert_eq!(ts.count, 3);
        assert_close(ts.median, totals[1]);
        assert_close(ts.min, totals[0]);
        assert_close(ts.max, totals[2]);

        // The combined sim score sits below both contributing averages.
        let wl = &summary.report.wl_scores;
        assert!(wl.sim < scores.sim.avg);
        assert!(wl.sim < scores.trig_sim.avg);
    }

    #[test]
    fn same_seed_reproduces_the_tree() {
        let cfg = FixtureConfig::default();
        let dir1 = tempdir().unwrap();
        let dir2 = tempdir().unwrap();
        let t1 = write_run_tree(dir1.path(), &cfg).unwrap();
        let t2 = write_run_tree(dir2.path(), &cfg).unwrap();
        assert_eq!(t1, t2);
    }
}
