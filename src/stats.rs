//! Descriptive statistics over per-worker throughput samples.

use std::cmp::Ordering;

use crate::error::{Error, Result};

/// Summary statistics for one score category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub median: f64,
    pub count: usize,
}

impl Stats {
    /// Reduce a sample set. An empty set is a degenerate run and an error.
    pub fn from_samples(samples: &[f64]) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::EmptyRun);
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let count = sorted.len();
        let avg = sorted.iter().sum::<f64>() / count as f64;

        Ok(Stats {
            min: sorted[0],
            max: sorted[count - 1],
            avg,
            median: median_of_sorted(&sorted),
            count,
        })
    }
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2] + sorted[n / 2 - 1]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Combined rate of two sequential sub-phases.
///
/// Per-event times add, so the rates combine like resistances in parallel:
/// `1 / (1/a + 1/b)`. This is the convention behind the reported `sim` score
/// and must not be changed.
pub fn parallel_rate(a: f64, b: f64) -> f64 {
    1.0 / (1.0 / a + 1.0 / b)
}
