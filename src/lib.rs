// Scaling harness for the p4est fusion test.
//
// Sweeps an MPI-launched test binary over increasing process counts, parses
// the per-phase timing summary each run prints, and renders a stacked bar
// chart of phase timings versus process count.

pub mod config;
pub mod parse;
pub mod plot;
pub mod results;
pub mod runner;

pub use config::BenchConfig;
pub use parse::{ParseError, PHASE_COUNT, PHASE_NAMES};
pub use results::{ResultsMatrix, TimingRecord};
pub use runner::{RunError, ScaleOutcome};
