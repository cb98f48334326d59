//! Run-directory layout and run configuration.
//!
//! A finished benchmark run leaves one directory per parallel copy under the
//! run root, `proc_1` through `proc_<NCOPIES>`, each holding the worker's
//! log as a file named `output`.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Parameters of the upstream run being scored. The aggregator itself is
/// strictly sequential; these describe the workload, not the harness.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Parallel pipeline copies (`NCOPIES`).
    pub copies: u32,
    /// Threads per copy (`NTHREADS`), carried as metadata only.
    pub threads_per_copy: u32,
    /// Events processed per worker thread (`NEVENTS_THREAD`).
    pub events_per_thread: f64,
}

pub fn proc_dir(root: &Path, copy: u32) -> PathBuf {
    root.join(format!("proc_{copy}"))
}

pub fn worker_log(root: &Path, copy: u32) -> PathBuf {
    proc_dir(root, copy).join("output")
}

/// Copy indices of the `proc_<i>` directories actually present under the run
/// root, sorted. Used to warn when the layout disagrees with `NCOPIES` before
/// failing on a missing log.
pub fn discover_copies(root: &Path) -> Vec<u32> {
    let mut found: Vec<u32> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .flatten()
        .filter(|entry| entry.file_type().is_dir())
        .filter_map(|entry| {
            entry
                .file_name()
                .to_str()?
                .strip_prefix("proc_")?
                .parse::<u32>()
                .ok()
        })
        .collect();
    found.sort_unstable();
    found
}

pub fn read_log(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::ReadLog {
        path: path.to_path_buf(),
        source,
    })
}
