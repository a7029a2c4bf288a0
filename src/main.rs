// Benchmark driver: sweep, collect, chart.
//
// Usage:
//   fusion-scaling                         # classic sweep: mpirun -np 16..144 ./p4est_test_fusion
//   fusion-scaling --scale-step 8 --runs 4 # custom sweep
//   fusion-scaling --results runs.json     # also dump raw timings
//
// Failed scales are reported and skipped; the chart is drawn from whatever
// succeeded.

use std::fs;
use std::process::ExitCode;

use clap::Parser;

use fusion_scaling::config::{Args, BenchConfig};
use fusion_scaling::{plot, runner};

fn main() -> ExitCode {
    let config = BenchConfig::from(Args::parse());

    println!(
        "Sweeping {} under {} at -np {:?}",
        config.binary.display(),
        config.launcher,
        config.scales()
    );

    let outcomes = runner::run_sweep(&config);
    let (matrix, failures) = runner::collect_results(outcomes);

    for (procs, err) in &failures {
        eprintln!("scale -np {procs} produced no data: {err}");
    }

    if matrix.is_empty() {
        eprintln!("all {} scales failed, nothing to chart", config.runs);
        return ExitCode::FAILURE;
    }

    // Per-phase series, same shape the chart consumes.
    println!("{:?}", matrix.transpose());

    if let Some(path) = &config.results {
        // Keep the sweep parameters next to the numbers they produced.
        let payload = serde_json::json!({
            "config": &config,
            "matrix": &matrix,
        });
        let json = match serde_json::to_string_pretty(&payload) {
            Ok(json) => json,
            Err(err) => {
                eprintln!("failed to serialize results: {err}");
                return ExitCode::FAILURE;
            }
        };
        if let Err(err) = fs::write(path, json) {
            eprintln!("failed to write {}: {err}", path.display());
            return ExitCode::FAILURE;
        }
        println!("Results written to {}", path.display());
    }

    if matrix.max_total() > config.y_max {
        eprintln!(
            "warning: tallest bar ({:.3}s) exceeds --y-max {:.3}, chart will clip",
            matrix.max_total(),
            config.y_max
        );
    }

    if let Err(err) = plot::render(&matrix, config.y_max, &config.out) {
        eprintln!("failed to render chart: {err}");
        return ExitCode::FAILURE;
    }
    println!("Chart written to {}", config.out.display());

    // Failed scales were reported above; a rendered chart from at least one
    // successful scale is still a successful sweep.
    ExitCode::SUCCESS
}
