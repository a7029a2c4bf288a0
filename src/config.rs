// Sweep configuration.
//
// Everything the original workflow hardcoded is a flag here, with the
// original value as default: `fusion-scaling` with no arguments reproduces
// the classic 16..144 sweep of ./p4est_test_fusion under mpirun.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "fusion-scaling",
    about = "Sweep an MPI test binary over process counts and chart per-phase timings"
)]
pub struct Args {
    /// MPI launcher executable
    #[arg(long, default_value = "mpirun")]
    pub launcher: String,

    /// Test binary to launch at each process count
    #[arg(long, default_value = "./p4est_test_fusion")]
    pub binary: PathBuf,

    /// Process-count increment between runs
    #[arg(long, default_value_t = 16)]
    pub scale_step: u32,

    /// Number of measured runs (process counts are step, 2*step, ...)
    #[arg(long, default_value_t = 9)]
    pub runs: u32,

    /// Discarded warm-up runs at the smallest process count
    #[arg(long, default_value_t = 0)]
    pub warmup: u32,

    /// Output path for the stacked bar chart
    #[arg(long, default_value = "scaling.png")]
    pub out: PathBuf,

    /// Also write raw results as JSON to this path
    #[arg(long)]
    pub results: Option<PathBuf>,

    /// Chart y-axis ceiling, in seconds
    #[arg(long, default_value_t = 1.5)]
    pub y_max: f64,
}

/// Resolved sweep configuration.
#[derive(Debug, Clone, Serialize)]
pub struct BenchConfig {
    pub launcher: String,
    pub binary: PathBuf,
    pub scale_step: u32,
    pub runs: u32,
    pub warmup: u32,
    #[serde(skip)]
    pub out: PathBuf,
    #[serde(skip)]
    pub results: Option<PathBuf>,
    pub y_max: f64,
}

impl From<Args> for BenchConfig {
    fn from(args: Args) -> Self {
        Self {
            launcher: args.launcher,
            binary: args.binary,
            scale_step: args.scale_step,
            runs: args.runs,
            warmup: args.warmup,
            out: args.out,
            results: args.results,
            y_max: args.y_max,
        }
    }
}

impl BenchConfig {
    /// The process counts to sweep, smallest first. Saturates rather than
    /// overflowing for absurd step/run combinations.
    pub fn scales(&self) -> Vec<u32> {
        (1..=self.runs)
            .map(|i| i.saturating_mul(self.scale_step))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_config() -> BenchConfig {
        BenchConfig::from(Args::parse_from(["fusion-scaling"]))
    }

    #[test]
    fn default_scales_are_16_through_144() {
        let scales = default_config().scales();
        assert_eq!(scales, vec![16, 32, 48, 64, 80, 96, 112, 128, 144]);
    }

    #[test]
    fn defaults_match_the_classic_sweep() {
        let cfg = default_config();
        assert_eq!(cfg.launcher, "mpirun");
        assert_eq!(cfg.binary, PathBuf::from("./p4est_test_fusion"));
        assert_eq!(cfg.warmup, 0);
        assert_eq!(cfg.y_max, 1.5);
    }

    #[test]
    fn huge_scale_parameters_saturate_instead_of_overflowing() {
        let cfg = BenchConfig::from(Args::parse_from([
            "fusion-scaling",
            "--scale-step",
            "2147483647",
            "--runs",
            "3",
        ]));
        assert_eq!(cfg.scales(), vec![2147483647, 4294967294, u32::MAX]);
    }

    #[test]
    fn scale_overrides_apply() {
        let cfg = BenchConfig::from(Args::parse_from([
            "fusion-scaling",
            "--scale-step",
            "4",
            "--runs",
            "3",
        ]));
        assert_eq!(cfg.scales(), vec![4, 8, 12]);
    }
}
