// src/source.rs - Landmark source seam and recorded-landmark replay
use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::warn;

use crate::error::{PostureError, PostureResult};
use crate::landmarks::{LandmarkSet, NormalizedLandmark};

/// Anything that turns a video frame into body landmarks (a pose model, a replay).
pub trait LandmarkSource {
    /// `Ok(None)` means the source has no more frames. An empty set means no body
    /// was found in this frame.
    fn detect(&mut self, frame: &DynamicImage) -> PostureResult<Option<LandmarkSet>>;
}

/// One line of a landmark recording. An empty list is a frame without a body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedFrame {
    #[serde(default)]
    pub landmarks: Vec<NormalizedLandmark>,
}

/// Replays normalized landmarks stored as JSON lines, one frame per line.
pub struct ReplaySource<R> {
    reader: R,
    line_number: usize,
    buffer: String,
}

impl ReplaySource<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> PostureResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| PostureError::RecordingOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> ReplaySource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            buffer: String::new(),
        }
    }

    /// Next non-blank record, or `None` at end of input. Malformed lines read as
    /// frames without a body.
    fn next_record(&mut self) -> PostureResult<Option<RecordedFrame>> {
        loop {
            self.buffer.clear();
            if self.reader.read_line(&mut self.buffer)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = self.buffer.trim();
            if line.is_empty() {
                continue;
            }

            return match serde_json::from_str::<RecordedFrame>(line) {
                Ok(record) => Ok(Some(record)),
                Err(e) => {
                    warn!(line = self.line_number, error = %e, "Skipping malformed landmark record");
                    Ok(Some(RecordedFrame {
                        landmarks: Vec::new(),
                    }))
                }
            };
        }
    }
}

impl<R: BufRead> LandmarkSource for ReplaySource<R> {
    fn detect(&mut self, frame: &DynamicImage) -> PostureResult<Option<LandmarkSet>> {
        let (width, height) = frame.dimensions();

        Ok(self
            .next_record()?
            .map(|record| LandmarkSet::from_normalized(&record.landmarks, width, height)))
    }
}
