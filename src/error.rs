use thiserror::Error;

/// Recoverable pipeline failures. These are surfaced to the UI console as
/// warnings; corpus-loading problems are fatal at startup and go through
/// `anyhow` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("cannot fit {column} codec on an empty value set")]
    EmptyDomain { column: &'static str },

    #[error("{column} value {value:?} was not seen when the codec was fitted")]
    UnknownCategory { column: &'static str, value: String },

    #[error("{column} code {code} is out of range (0..{len})")]
    InvalidCode {
        column: &'static str,
        code: i64,
        len: usize,
    },

    #[error("kickoff hour {hour} is outside 0..=23")]
    InvalidHour { hour: u32 },

    #[error("record {row} is missing required field {field}")]
    IncompleteRecord { row: usize, field: &'static str },
}
