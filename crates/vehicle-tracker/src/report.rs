use std::fmt;
use std::num::{ParseFloatError, ParseIntError};

use crate::Track;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading a frame report line.
#[derive(Debug, Error, PartialEq)]
pub enum ReportError {
    #[error("track record `{record}` has {fields} fields, expected 4")]
    FieldCount { record: String, fields: usize },
    #[error("invalid track id in `{record}`")]
    InvalidId {
        record: String,
        #[source]
        source: ParseIntError,
    },
    #[error("invalid number in `{record}`")]
    InvalidNumber {
        record: String,
        #[source]
        source: ParseFloatError,
    },
}

/// The externally visible state of one track in a frame report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackReport {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub speed: f64,
}

impl From<&Track> for TrackReport {
    fn from(track: &Track) -> Self {
        TrackReport {
            id: track.track_id().get(),
            x: track.position().x(),
            y: track.position().y(),
            speed: track.speed(),
        }
    }
}

impl fmt::Display for TrackReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.id, self.x, self.y, self.speed)
    }
}

/// Formats one frame of tracks as `<id>,<x>,<y>,<speed> ` per track, newline terminated.
pub fn format_frame_line<'a>(tracks: impl IntoIterator<Item = &'a Track>) -> String {
    let mut line = tracks
        .into_iter()
        .map(|track| format!("{} ", TrackReport::from(track)))
        .collect::<String>();
    line.push('\n');
    line
}

/// Parses a line produced by `format_frame_line`.
pub fn parse_frame_line(line: &str) -> Result<Vec<TrackReport>, ReportError> {
    line.split_whitespace().map(parse_record).collect()
}

fn parse_record(record: &str) -> Result<TrackReport, ReportError> {
    let fields = record.split(',').collect::<Vec<_>>();
    let [id, x, y, speed] = fields[..] else {
        return Err(ReportError::FieldCount {
            record: record.to_owned(),
            fields: fields.len(),
        });
    };

    let number = |field: &str| {
        field
            .parse::<f64>()
            .map_err(|source| ReportError::InvalidNumber {
                record: record.to_owned(),
                source,
            })
    };

    Ok(TrackReport {
        id: id.parse().map_err(|source| ReportError::InvalidId {
            record: record.to_owned(),
            source,
        })?,
        x: number(x)?,
        y: number(y)?,
        speed: number(speed)?,
    })
}
