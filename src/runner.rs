// Per-scale invocation of the test binary under the MPI launcher.
//
// Each run gets its own temporary capture file, deleted when the handle
// drops, so no output from one run can bleed into the next. The launcher is
// exec'd directly with an argument vector; no shell is involved.

use std::fs;
use std::process::{Command, Stdio};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::config::BenchConfig;
use crate::parse::{self, ParseError};
use crate::results::{ResultsMatrix, TimingRecord};

/// Ways a single scale's run can fail. A failure at one scale does not stop
/// the sweep; the outcome is recorded and the next scale runs.
#[derive(Debug, Error)]
pub enum RunError {
    /// The launcher could not be started at all.
    #[error("failed to launch {command:?}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The launcher ran but exited non-zero.
    #[error("{command:?} exited with {status}")]
    ExitStatus {
        command: String,
        status: std::process::ExitStatus,
    },

    /// The capture file could not be created or read back.
    #[error("failed to capture run output")]
    Capture(#[from] std::io::Error),

    /// The run completed but its output had no usable summary line.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Result of one scale in the sweep.
#[derive(Debug)]
pub struct ScaleOutcome {
    pub procs: u32,
    pub result: Result<TimingRecord, RunError>,
}

fn command_line(config: &BenchConfig, procs: u32) -> String {
    format!(
        "{} -np {} {}",
        config.launcher,
        procs,
        config.binary.display()
    )
}

/// Runs the test binary once at the given process count and parses its
/// timing summary. Blocks until the child exits.
pub fn run_once(config: &BenchConfig, procs: u32) -> Result<TimingRecord, RunError> {
    let capture = NamedTempFile::new()?;
    let command = command_line(config, procs);

    let status = Command::new(&config.launcher)
        .arg("-np")
        .arg(procs.to_string())
        .arg(&config.binary)
        .stdout(Stdio::from(capture.reopen()?))
        .status()
        .map_err(|source| RunError::Launch {
            command: command.clone(),
            source,
        })?;

    if !status.success() {
        return Err(RunError::ExitStatus { command, status });
    }

    let output = fs::read_to_string(capture.path())?;
    Ok(parse::parse_output(&output)?)
}

/// Runs the full sweep sequentially, one blocking child at a time.
///
/// Warm-up runs execute at the smallest scale first and are discarded,
/// outcome and all. Measured runs are collected even when some fail, so a
/// bad scale costs only its own data point.
pub fn run_sweep(config: &BenchConfig) -> Vec<ScaleOutcome> {
    let scales = config.scales();

    if let Some(&smallest) = scales.first() {
        for i in 0..config.warmup {
            println!("warm-up {}/{} at -np {}", i + 1, config.warmup, smallest);
            if let Err(err) = run_once(config, smallest) {
                eprintln!("warm-up run failed (ignored): {err}");
            }
        }
    }

    let mut outcomes = Vec::with_capacity(scales.len());
    for procs in scales {
        let result = run_once(config, procs);
        match &result {
            Ok(record) => println!("-np {procs}: total {:.4}s", record.total()),
            Err(err) => eprintln!("-np {procs}: failed: {err}"),
        }
        outcomes.push(ScaleOutcome { procs, result });
    }
    outcomes
}

/// Splits sweep outcomes into the successful matrix and the failed scales.
pub fn collect_results(outcomes: Vec<ScaleOutcome>) -> (ResultsMatrix, Vec<(u32, RunError)>) {
    let mut matrix = ResultsMatrix::default();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome.result {
            Ok(record) => matrix.push(outcome.procs, record),
            Err(err) => failures.push((outcome.procs, err)),
        }
    }
    (matrix, failures)
}
