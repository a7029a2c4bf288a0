// Stacked bar chart of phase timings versus process count.
//
// One bar group per process count, seven stacked segments per bar, one
// color per phase. Layout follows the original workflow: bar width 0.35,
// y-axis 0.0..y_max in 0.1 steps, legend in the upper left.

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

use crate::parse::{PHASE_COUNT, PHASE_NAMES};
use crate::results::ResultsMatrix;

/// Fixed phase palette, in phase order.
pub const PALETTE: [RGBColor; PHASE_COUNT] =
    [BLUE, GREEN, YELLOW, MAGENTA, WHITE, CYAN, RED];

const BAR_HALF_WIDTH: f64 = 0.35 / 2.0;

/// Renders the chart as a PNG at `out`.
///
/// Bars are positioned at 1..=n on the x axis and labeled with their
/// process counts. Values above `y_max` draw clipped; the caller is
/// expected to warn when that happens (see [`ResultsMatrix::max_total`]).
pub fn render(matrix: &ResultsMatrix, y_max: f64, out: &Path) -> Result<(), Box<dyn Error>> {
    let procs = matrix.procs();
    let n = procs.len();

    let root = BitMapBackend::new(out, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Fusion test phase timings", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..(n as f64 + 1.0), 0.0..y_max)?;

    let tick_labels = procs.clone();
    chart
        .configure_mesh()
        .x_desc("Procs")
        .y_desc("Seconds")
        .x_labels(n + 2)
        .x_label_formatter(&move |x| {
            let j = x.round();
            if (x - j).abs() < 1e-9 && j >= 1.0 && j <= tick_labels.len() as f64 {
                tick_labels[j as usize - 1].to_string()
            } else {
                String::new()
            }
        })
        .y_labels((y_max / 0.1).round() as usize + 1)
        .y_label_formatter(&|y| format!("{y:.1}"))
        .draw()?;

    // One series per phase so each gets a legend entry. Segment bottoms are
    // the cumulative height of the phases below.
    for i in 0..PHASE_COUNT {
        let color = PALETTE[i];
        let segments: Vec<_> = matrix
            .runs
            .iter()
            .enumerate()
            .map(|(j, run)| {
                let x = j as f64 + 1.0;
                let bottom = run.record.stack_offsets()[i];
                let top = bottom + run.record.phases[i];
                Rectangle::new(
                    [(x - BAR_HALF_WIDTH, bottom), (x + BAR_HALF_WIDTH, top)],
                    color.filled(),
                )
            })
            .collect();

        chart
            .draw_series(segments)?
            .label(PHASE_NAMES[i])
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::TimingRecord;

    #[test]
    fn renders_a_png_for_a_small_matrix() {
        let mut matrix = ResultsMatrix::default();
        matrix.push(16, TimingRecord { phases: [0.1, 0.2, 0.05, 0.3, 0.1, 0.05, 0.2] });
        matrix.push(32, TimingRecord { phases: [0.2, 0.1, 0.05, 0.2, 0.1, 0.05, 0.1] });

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("chart.png");
        render(&matrix, 1.5, &out).unwrap();

        let meta = std::fs::metadata(&out).unwrap();
        assert!(meta.len() > 0);
    }

    #[test]
    fn renders_even_when_the_matrix_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("empty.png");
        render(&ResultsMatrix::default(), 1.5, &out).unwrap();
        assert!(out.exists());
    }
}
