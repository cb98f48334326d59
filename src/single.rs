//! Legacy gen-sim scoring.
//!
//! The older gen-sim harness scored in two steps. Each worker's log was
//! reduced to `events / total_seconds`, taking the elapsed time from the 9th
//! whitespace-delimited token of the line containing `Total` (the first such
//! line wins; extra ones mean the run went bad and are reported on stderr).
//! The per-worker results, written to `proc_<i>/parsedoutput`, were then
//! summed across all copies into one combined score.

use std::path::Path;

use crate::error::{Error, Result};
use crate::{workdir, Phase};

/// Position of the elapsed-seconds token on the `Total` line, counting
/// whitespace-delimited fields from zero.
const TOTAL_TIME_FIELD: usize = 8;

/// Elapsed seconds from the first `Total` line.
pub fn total_seconds(text: &str) -> Result<f64> {
    let mut time: Option<f64> = None;
    for (idx, line) in text.lines().enumerate() {
        if !line.contains("Total") {
            continue;
        }
        if time.is_some() {
            eprintln!("More than one output found! Run bad");
            continue;
        }
        let lineno = idx + 1;
        let field = line
            .split_whitespace()
            .nth(TOTAL_TIME_FIELD)
            .ok_or_else(|| Error::MalformedRow {
                line: lineno,
                message: format!("Total line has fewer than {} fields", TOTAL_TIME_FIELD + 1),
            })?;
        let value = field.parse::<f64>().map_err(|_| Error::MalformedRow {
            line: lineno,
            message: format!("bad time field {field:?}"),
        })?;
        time = Some(value);
    }
    time.ok_or(Error::TruncatedTable("no Total line found"))
}

/// Events per second for one log.
pub fn throughput(text: &str, events: f64) -> Result<f64> {
    let seconds = total_seconds(text)?;
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(Error::ZeroDuration {
            phase: Phase::Total,
        });
    }
    Ok(events / seconds)
}

/// Combined score across all copies: the sum of the first whitespace token
/// of every line in each worker's `proc_<i>/parsedoutput`.
pub fn sum_scores(root: &Path, copies: u32) -> Result<f64> {
    let mut score = 0.0;
    for copy in 1..=copies {
        let path = workdir::proc_dir(root, copy).join("parsedoutput");
        let text = workdir::read_log(&path)?;
        for (idx, line) in text.lines().enumerate() {
            let field = line
                .split_whitespace()
                .next()
                .ok_or_else(|| Error::MalformedRow {
                    line: idx + 1,
                    message: format!("empty score line in {}", path.display()),
                })?;
            score += field.parse::<f64>().map_err(|_| Error::MalformedRow {
                line: idx + 1,
                message: format!("bad score field {field:?} in {}", path.display()),
            })?;
        }
    }
    Ok(score)
}
