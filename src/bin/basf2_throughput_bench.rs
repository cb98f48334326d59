use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use basf2_throughput_bench::fixture::{self, FixtureConfig};
use basf2_throughput_bench::workdir::{self, RunConfig};
use basf2_throughput_bench::{profile, score, single, Result};

#[derive(Subcommand, Debug)]
enum Command {
    /// Aggregate per-worker profiler logs into the JSON summary report.
    ///
    /// Reads `proc_<i>/output` for i in 1..=copies under the run root,
    /// extracts the per-phase times from each profiler table, and folds the
    /// worker throughputs into the wl-scores / wl-stats summary.
    Report {
        /// Number of parallel pipeline copies in the run.
        #[arg(long, env = "NCOPIES")]
        copies: u32,

        /// Threads per copy; recorded in the report as run metadata.
        #[arg(long, env = "NTHREADS")]
        threads_per_copy: u32,

        /// Events processed per worker thread.
        #[arg(long, env = "NEVENTS_THREAD")]
        events_per_thread: f64,

        /// Run root containing the proc_<i> directories.
        #[arg(long, value_name = "DIR", default_value = ".")]
        root: PathBuf,

        /// Where to write the JSON summary ("-" for stdout).
        #[arg(long, value_name = "FILE", default_value = "belle2-gen-sim-reco_summary.json")]
        out: PathBuf,
    },

    /// Legacy single-log mode: print events/second from one log's Total line.
    Single {
        /// Number of events processed.
        events: f64,

        /// Log file to read.
        #[arg(long, value_name = "FILE", default_value = "output")]
        log: PathBuf,
    },

    /// Legacy score aggregation: sum the per-copy scores left in
    /// proc_<i>/parsedoutput by the single-log step.
    SumScores {
        /// Number of copies processed.
        copies: u32,

        /// Run root containing the proc_<i> directories.
        #[arg(long, value_name = "DIR", default_value = ".")]
        root: PathBuf,
    },

    /// Generate a synthetic run tree for exercising the harness without basf2.
    GenFixture {
        /// Output directory for the proc_<i> tree.
        #[arg(long, short = 'o', value_name = "DIR")]
        output: PathBuf,

        /// Number of proc_<i> directories to create.
        #[arg(long, default_value_t = 4)]
        copies: u32,

        /// Events per worker, written into the Calls column.
        #[arg(long, default_value_t = 50)]
        events: u64,

        /// Random seed for deterministic generation.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(Parser, Debug)]
#[command(name = "basf2-throughput-bench")]
#[command(about = "Throughput scoring for Belle II gen-sim-reco benchmark runs (JSON output)")]
struct Args {
    #[command(subcommand)]
    cmd: Command,
}

fn run_report(cfg: &RunConfig, root: &Path, out: &Path) -> Result<()> {
    let found = workdir::discover_copies(root);
    if found.len() != cfg.copies as usize {
        eprintln!(
            "Warning: expected {} proc_<i> directories under {}, found {}",
            cfg.copies,
            root.display(),
            found.len()
        );
    }

    let mut samples = Vec::with_capacity(cfg.copies as usize);
    for copy in 1..=cfg.copies {
        let path = workdir::worker_log(root, copy);
        let text = workdir::read_log(&path)?;
        let timing = profile::parse_profile(&text)?;
        let sample = score::ThroughputSample::from_timing(&timing, cfg.events_per_thread)?;
        eprintln!(
            "proc_{copy}: gen={:.3} sim={:.3} trigsim={:.3} reco={:.3} total={:.3} ev/s",
            sample.gen, sample.sim, sample.trig_sim, sample.reco, sample.total
        );
        samples.push(sample);
    }

    let scores = score::aggregate(&samples)?;
    let summary = score::build_summary(&scores, cfg);

    let json = serde_json::to_string_pretty(&summary)?;
    if out == Path::new("-") {
        println!("{json}");
    } else {
        fs::write(out, json)?;
        eprintln!("Summary written to {}", out.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    match &args.cmd {
        Command::Report {
            copies,
            threads_per_copy,
            events_per_thread,
            root,
            out,
        } => {
            let cfg = RunConfig {
                copies: *copies,
                threads_per_copy: *threads_per_copy,
                events_per_thread: *events_per_thread,
            };
            run_report(&cfg, root, out)?;
        }

        Command::Single { events, log } => {
            let text = workdir::read_log(log)?;
            println!("{}", single::throughput(&text, *events)?);
        }

        Command::SumScores { copies, root } => {
            println!("{}", single::sum_scores(root, *copies)?);
        }

        Command::GenFixture {
            output,
            copies,
            events,
            seed,
        } => {
            let cfg = FixtureConfig {
                copies: *copies,
                events: *events,
                seed: *seed,
            };
            eprintln!(
                "Generating {} synthetic worker logs (events={}, seed={})...",
                copies, events, seed
            );
            let timings = fixture::write_run_tree(output, &cfg)?;
            for (i, t) in timings.iter().enumerate() {
                eprintln!(
                    "  proc_{}: gen={:.3}s sim={:.3}s trigsim={:.3}s reco={:.3}s total={:.3}s",
                    i + 1,
                    t.gen,
                    t.sim,
                    t.trig_sim,
                    t.reco,
                    t.total
                );
            }
            eprintln!("Run tree written under {}", output.display());
        }
    }

    Ok(())
}
