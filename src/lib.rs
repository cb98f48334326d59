use std::fmt;

pub mod error;
pub mod fixture;
pub mod profile;
pub mod schema;
pub mod score;
pub mod single;
pub mod stats;
pub mod workdir;

pub use error::{Error, Result};

/// Pipeline phase whose cumulative time is tracked in the profiler table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Event generation (EvtGen).
    Gen,
    /// Detector simulation (Geant4).
    Sim,
    /// Level-1 trigger simulation.
    TrigSim,
    /// Reconstruction, up to and including the software trigger.
    Reco,
    /// Whole-pipeline time from the grand-total row.
    Total,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Gen => "gen",
            Phase::Sim => "sim",
            Phase::TrigSim => "trigsim",
            Phase::Reco => "reco",
            Phase::Total => "total",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
