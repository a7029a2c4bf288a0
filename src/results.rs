// Accumulated timings across the sweep.
//
// Each successful run contributes one TimingRecord; the matrix keeps them in
// sweep order together with the process count they were measured at. The
// chart wants the data the other way around (one series per phase), hence
// the transpose.

use serde::Serialize;

use crate::parse::PHASE_COUNT;

/// The 7 per-phase wall-clock measurements from one run, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimingRecord {
    pub phases: [f64; PHASE_COUNT],
}

impl TimingRecord {
    /// Vertical start of each stacked segment: the running sum of all
    /// phases before it. The first segment sits at 0.
    pub fn stack_offsets(&self) -> [f64; PHASE_COUNT] {
        let mut offsets = [0.0; PHASE_COUNT];
        let mut total = 0.0;
        for (offset, value) in offsets.iter_mut().zip(&self.phases) {
            *offset = total;
            total += value;
        }
        offsets
    }

    /// Sum of all phases, the full bar height.
    pub fn total(&self) -> f64 {
        self.phases.iter().sum()
    }
}

/// One measured run: the requested process count and its timings.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScaleRun {
    pub procs: u32,
    pub record: TimingRecord,
}

/// All successful runs of one sweep, in sweep order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultsMatrix {
    pub runs: Vec<ScaleRun>,
}

impl ResultsMatrix {
    pub fn push(&mut self, procs: u32, record: TimingRecord) {
        self.runs.push(ScaleRun { procs, record });
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Process counts in sweep order.
    pub fn procs(&self) -> Vec<u32> {
        self.runs.iter().map(|run| run.procs).collect()
    }

    /// Flips run-major data into phase-major series: 7 series, each with
    /// one point per successful run.
    pub fn transpose(&self) -> [Vec<f64>; PHASE_COUNT] {
        let mut series: [Vec<f64>; PHASE_COUNT] = Default::default();
        for run in &self.runs {
            for (phase, value) in series.iter_mut().zip(&run.record.phases) {
                phase.push(*value);
            }
        }
        series
    }

    /// Largest stacked bar height, used to detect a clipped chart.
    pub fn max_total(&self) -> f64 {
        self.runs
            .iter()
            .map(|run| run.record.total())
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(phases: [f64; PHASE_COUNT]) -> TimingRecord {
        TimingRecord { phases }
    }

    #[test]
    fn stack_offsets_are_running_sums() {
        let r = record([0.1, 0.2, 0.05, 0.3, 0.1, 0.05, 0.2]);
        let offsets = r.stack_offsets();
        let expected = [0.0, 0.1, 0.3, 0.35, 0.65, 0.75, 0.8];
        for (got, want) in offsets.iter().zip(&expected) {
            assert!((got - want).abs() < 1e-12, "offsets {offsets:?}");
        }
    }

    #[test]
    fn transpose_is_phase_major() {
        let mut matrix = ResultsMatrix::default();
        matrix.push(16, record([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]));
        matrix.push(32, record([10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0]));

        let series = matrix.transpose();
        assert_eq!(series.len(), PHASE_COUNT);
        for (i, phase) in series.iter().enumerate() {
            assert_eq!(phase.len(), matrix.len());
            assert_eq!(phase[0], (i + 1) as f64);
            assert_eq!(phase[1], ((i + 1) * 10) as f64);
        }
    }

    #[test]
    fn transpose_of_empty_matrix_is_seven_empty_series() {
        let series = ResultsMatrix::default().transpose();
        assert!(series.iter().all(Vec::is_empty));
    }

    #[test]
    fn max_total_tracks_the_tallest_bar() {
        let mut matrix = ResultsMatrix::default();
        matrix.push(16, record([0.1; PHASE_COUNT]));
        matrix.push(32, record([0.2; PHASE_COUNT]));
        assert!((matrix.max_total() - 1.4).abs() < 1e-12);
    }

    #[test]
    fn results_serialize_to_json() {
        let mut matrix = ResultsMatrix::default();
        matrix.push(16, record([0.1, 0.2, 0.05, 0.3, 0.1, 0.05, 0.2]));
        let json = serde_json::to_string(&matrix).unwrap();
        assert!(json.contains("\"procs\":16"));
        assert!(json.contains("0.3"));
    }
}
