// src/session.rs - Per-frame driver sitting between the presentation layer and the classifier
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

use crate::classifier::{Mode, PostureClassifier, SharedClassifier};
use crate::config::AppSettings;
use crate::error::PostureResult;
use crate::landmarks::{BodyLandmark, LandmarkSet};
use crate::source::LandmarkSource;

/// Everything the presentation layer needs to render one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame_index: u64,
    pub timestamp_ms: u64,
    pub alert: bool,
    /// Mode after this frame was processed.
    pub mode: Mode,
    pub nose_depth: Option<f64>,
    pub baseline: Option<f64>,
    pub nose_position: Option<(i32, i32)>,
    pub neck_angle: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub frames: u64,
    /// Frames that arrived while the classifier was calibrating.
    pub calibration_frames: u64,
    /// Frames without a usable nose landmark.
    pub skipped_frames: u64,
    /// Monitoring frames that received a posture judgment.
    pub judged_frames: u64,
    pub alert_frames: u64,
}

impl SessionStats {
    /// Alert frames over judged monitoring frames; 0 when nothing was judged.
    pub fn alert_ratio(&self) -> f64 {
        if self.judged_frames == 0 {
            0.0
        } else {
            self.alert_frames as f64 / self.judged_frames as f64
        }
    }
}

pub struct PostureSession {
    classifier: SharedClassifier,
    frame_size: (u32, u32),
    stats: SessionStats,
    started: Instant,
    alert_active: bool,
}

impl PostureSession {
    pub fn new(settings: &AppSettings) -> PostureResult<Self> {
        settings.validate()?;
        let classifier = SharedClassifier::new(PostureClassifier::new(settings.classifier.clone())?);

        Ok(Self {
            classifier,
            frame_size: (settings.frame_width, settings.frame_height),
            stats: SessionStats::default(),
            started: Instant::now(),
            alert_active: false,
        })
    }

    /// (width, height) of the frames this session expects.
    pub fn frame_size(&self) -> (u32, u32) {
        self.frame_size
    }

    /// Handle for other threads, e.g. a UI thread requesting recalibration.
    pub fn classifier(&self) -> SharedClassifier {
        self.classifier.clone()
    }

    /// Begins a session: clears statistics and calibrates from scratch.
    pub fn start(&mut self) -> PostureResult<()> {
        self.stats = SessionStats::default();
        self.started = Instant::now();
        self.alert_active = false;
        info!("Session started, sit upright while calibrating");
        self.classifier.start_calibration()
    }

    pub fn recalibrate(&mut self) -> PostureResult<()> {
        self.alert_active = false;
        self.classifier.start_calibration()
    }

    /// Pulls landmarks for `frame` from `source`. `Ok(None)` once the source is exhausted.
    pub fn process_frame(
        &mut self,
        frame: &DynamicImage,
        source: &mut dyn LandmarkSource,
    ) -> PostureResult<Option<FrameReport>> {
        match source.detect(frame)? {
            Some(landmarks) => self.process_landmarks(&landmarks).map(Some),
            None => Ok(None),
        }
    }

    pub fn process_landmarks(&mut self, landmarks: &LandmarkSet) -> PostureResult<FrameReport> {
        let (was_calibrating, decision, mode, baseline) = self.classifier.with(|classifier| {
            let was_calibrating = classifier.mode() == Mode::Calibrating;
            let decision = classifier.process(landmarks);
            (was_calibrating, decision, classifier.mode(), classifier.baseline())
        })?;

        let report = FrameReport {
            frame_index: self.stats.frames,
            timestamp_ms: self.started.elapsed().as_millis() as u64,
            alert: decision.alert,
            mode,
            nose_depth: decision.nose_depth,
            baseline,
            nose_position: landmarks.get_point(BodyLandmark::Nose.id()),
            neck_angle: landmarks.neck_angle(),
        };

        self.stats.frames += 1;
        if was_calibrating {
            self.stats.calibration_frames += 1;
        }
        match decision.nose_depth {
            None => self.stats.skipped_frames += 1,
            Some(_) if !was_calibrating => self.stats.judged_frames += 1,
            Some(_) => {}
        }
        if decision.alert {
            self.stats.alert_frames += 1;
        }

        if decision.alert != self.alert_active {
            if decision.alert {
                warn!(frame = report.frame_index, nose_depth = ?report.nose_depth, "Forward head detected");
            } else {
                info!(frame = report.frame_index, "Good posture");
            }
            self.alert_active = decision.alert;
        }

        Ok(report)
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn end(self) -> SessionStats {
        info!(
            frames = self.stats.frames,
            alert_frames = self.stats.alert_frames,
            "Session ended"
        );
        self.stats
    }
}
