use std::io::Read;
use std::iter::Peekable;

use anyhow::{bail, Result};
use csv::DeserializeRecordsIntoIter;
use serde::Deserialize;
use vehicle_tracker::{Detection, Point};

/// One row of a recorded detection file: `time,x,y`.
///
/// A row with empty `x` and `y` marks a frame without detections.
#[derive(Debug, Deserialize)]
struct DetectionRow {
    time: f64,
    x: Option<f64>,
    y: Option<f64>,
}

impl DetectionRow {
    fn detection(&self) -> Result<Option<Detection>> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Ok(Some(Detection::new(None, Point::new(x, y)))),
            (None, None) => Ok(None),
            _ => bail!("row at time {} has only one coordinate", self.time),
        }
    }
}

/// All detections sharing one timestamp.
#[derive(Debug)]
pub struct Frame {
    pub time: f64,
    pub detections: Vec<Detection>,
}

/// Groups consecutive rows with the same time into frames, streaming from `reader`.
pub struct FrameReader<R: Read> {
    rows: Peekable<DeserializeRecordsIntoIter<R, DetectionRow>>,
    last_time: Option<f64>,
}

impl<R: Read> FrameReader<R> {
    pub fn new(reader: R) -> FrameReader<R> {
        FrameReader {
            rows: csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .from_reader(reader)
                .into_deserialize()
                .peekable(),
            last_time: None,
        }
    }

    fn collect_frame(&mut self, first: DetectionRow) -> Result<Frame> {
        let time = first.time;
        if !time.is_finite() {
            bail!("frame time {time} is not finite");
        }
        if let Some(last_time) = self.last_time {
            if time < last_time {
                bail!("frame time {time} is earlier than the previous frame time {last_time}");
            }
        }
        self.last_time = Some(time);

        let mut detections = Vec::new();
        detections.extend(first.detection()?);

        while let Some(Ok(row)) = self.rows.peek() {
            if row.time != time {
                break;
            }
            if let Some(Ok(row)) = self.rows.next() {
                detections.extend(row.detection()?);
            }
        }

        Ok(Frame { time, detections })
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = match self.rows.next()? {
            Ok(row) => row,
            Err(err) => return Some(Err(err.into())),
        };
        Some(self.collect_frame(first))
    }
}
