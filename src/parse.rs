// Extraction of the per-phase timing summary from one run's stdout.
//
// The fusion test prints a libsc statistics block at the end of each run.
// Its second-to-last line is the summary:
//
//   [p4est] Summary = [ 0.10 0.20 0.05 0.30 0.10 0.05 0.20 ];
//
// The framing is fixed-width: 19 characters of prefix ("[p4est] Summary = [")
// and 3 characters of suffix (" ];"). Between them sit exactly 7
// whitespace-separated seconds values, one per measured phase.

use thiserror::Error;

use crate::results::TimingRecord;

/// Number of timed phases reported per run.
pub const PHASE_COUNT: usize = 7;

/// Phase names in summary-line order.
pub const PHASE_NAMES: [&str; PHASE_COUNT] = [
    "Full Loop",
    "Local Coarsening",
    "Local Refinement",
    "Balance",
    "Partition",
    "Ghost",
    "Optimized",
];

// Fixed framing of the summary line.
const PREFIX_LEN: usize = 19;
const SUFFIX_LEN: usize = 3;

/// Ways a run's captured output can fail to yield a timing record.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The output had fewer than 2 lines, so there is no second-to-last line.
    #[error("output has {got} line(s), need at least 2 to locate the summary")]
    TooFewLines { got: usize },

    /// The summary line is shorter than its fixed prefix and suffix.
    #[error("summary line too short ({len} chars): {line:?}")]
    LineTooShort { line: String, len: usize },

    /// The fixed prefix/suffix frame does not fall on character boundaries,
    /// so the line cannot be the ASCII summary format.
    #[error("summary line framing splits a multi-byte character: {line:?}")]
    FrameBoundary { line: String },

    /// The summary line did not contain exactly one value per phase.
    #[error("expected {PHASE_COUNT} timing fields, found {got} in {line:?}")]
    FieldCount { line: String, got: usize },

    /// A timing field was not a valid float.
    #[error("timing field {token:?} is not a number")]
    BadFloat {
        token: String,
        #[source]
        source: std::num::ParseFloatError,
    },
}

/// Selects the summary line (second-to-last) from a run's full stdout.
pub fn summary_line(output: &str) -> Result<&str, ParseError> {
    let lines: Vec<&str> = output.lines().collect();
    if lines.len() < 2 {
        return Err(ParseError::TooFewLines { got: lines.len() });
    }
    Ok(lines[lines.len() - 2])
}

/// Parses one summary line into a timing record.
///
/// Strips the fixed 19-character prefix and 3-character suffix, splits the
/// remainder on whitespace and parses each token as seconds. Exactly
/// [`PHASE_COUNT`] fields are required; anything else is an error rather
/// than a short record.
pub fn parse_summary_line(line: &str) -> Result<TimingRecord, ParseError> {
    if line.len() < PREFIX_LEN + SUFFIX_LEN {
        return Err(ParseError::LineTooShort {
            line: line.to_string(),
            len: line.len(),
        });
    }
    // get() rejects slice bounds landing inside a multi-byte character.
    let body = line
        .get(PREFIX_LEN..line.len() - SUFFIX_LEN)
        .ok_or_else(|| ParseError::FrameBoundary {
            line: line.to_string(),
        })?;

    let tokens: Vec<&str> = body.split_whitespace().collect();
    if tokens.len() != PHASE_COUNT {
        return Err(ParseError::FieldCount {
            line: line.to_string(),
            got: tokens.len(),
        });
    }

    let mut phases = [0.0f64; PHASE_COUNT];
    for (slot, token) in phases.iter_mut().zip(&tokens) {
        *slot = token.parse().map_err(|source| ParseError::BadFloat {
            token: token.to_string(),
            source,
        })?;
    }
    Ok(TimingRecord { phases })
}

/// Convenience: summary line selection plus parsing in one step.
pub fn parse_output(output: &str) -> Result<TimingRecord, ParseError> {
    parse_summary_line(summary_line(output)?)
}
