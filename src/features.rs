use crate::codec::CodecSet;
use crate::dataset::{MatchOutcome, MatchRecord};
use crate::error::PipelineError;

/// Column order of the training matrix and of every query vector. This is
/// the one place the feature contract lives; training and inference both go
/// through it.
pub const FEATURE_COLUMNS: [&str; 4] = ["venue_code", "opp_code", "hour", "day_code"];

pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Ordered 4-tuple fed to the forest. Order must match the matrix the model
/// was fitted on; a mismatch silently corrupts predictions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub venue_code: i64,
    pub opponent_code: i64,
    pub hour: u8,
    pub day_code: u8,
}

impl FeatureVector {
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.venue_code as f64,
            self.opponent_code as f64,
            self.hour as f64,
            self.day_code as f64,
        ]
    }
}

/// What the form surface hands back on every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySelection {
    pub team: String,
    pub opponent: String,
    pub venue: String,
    pub hour: u8,
    pub weekday: String,
}

/// ISO weekday index, Monday=0 .. Sunday=6.
pub fn weekday_index(name: &str) -> Result<u8, PipelineError> {
    WEEKDAYS
        .iter()
        .position(|day| day.eq_ignore_ascii_case(name.trim()))
        .map(|idx| idx as u8)
        .ok_or_else(|| PipelineError::UnknownCategory {
            column: "weekday",
            value: name.to_string(),
        })
}

/// Vectorizes the whole corpus: one row per record plus a 0/1 win label.
pub fn assemble_training(
    records: &[MatchRecord],
    codecs: &CodecSet,
) -> Result<(Vec<[f64; 4]>, Vec<f64>), PipelineError> {
    let mut matrix = Vec::with_capacity(records.len());
    let mut labels = Vec::with_capacity(records.len());

    for (row, record) in records.iter().enumerate() {
        if record.venue.trim().is_empty() {
            return Err(PipelineError::IncompleteRecord { row, field: "venue" });
        }
        if record.opponent.trim().is_empty() {
            return Err(PipelineError::IncompleteRecord {
                row,
                field: "opponent",
            });
        }

        let vector = FeatureVector {
            venue_code: codecs.venue.encode(&record.venue)?,
            opponent_code: codecs.opponent.encode(&record.opponent)?,
            hour: record.hour,
            day_code: record.day_code,
        };
        matrix.push(vector.as_array());
        labels.push(if record.result == MatchOutcome::Win {
            1.0
        } else {
            0.0
        });
    }

    Ok((matrix, labels))
}

/// Single-record assembly for the form surface. Validates before encoding so
/// a partially built vector can never escape.
pub fn assemble_query(
    selection: &QuerySelection,
    codecs: &CodecSet,
) -> Result<FeatureVector, PipelineError> {
    if selection.hour > 23 {
        return Err(PipelineError::InvalidHour {
            hour: selection.hour as u32,
        });
    }
    let day_code = weekday_index(&selection.weekday)?;

    Ok(FeatureVector {
        venue_code: codecs.venue.encode(&selection.venue)?,
        opponent_code: codecs.opponent.encode(&selection.opponent)?,
        hour: selection.hour,
        day_code,
    })
}
