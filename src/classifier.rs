// src/classifier.rs - Two-phase forward head posture classifier
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, trace};

use crate::calibration::CalibrationSession;
use crate::config::ClassifierConfig;
use crate::error::{PostureError, PostureResult};
use crate::landmarks::LandmarkSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Calibrating,
    Monitoring,
}

/// Classifier state. The baseline only exists once calibration has finished.
#[derive(Debug, Clone, PartialEq)]
pub enum PostureState {
    Calibrating(CalibrationSession),
    Monitoring { baseline: f64 },
}

impl Default for PostureState {
    fn default() -> Self {
        Self::calibrating(&ClassifierConfig::default())
    }
}

/// Outcome for a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub alert: bool,
    /// Nose depth read from the frame, if a usable nose landmark was present.
    pub nose_depth: Option<f64>,
}

impl Decision {
    fn no_alert(nose_depth: Option<f64>) -> Self {
        Self {
            alert: false,
            nose_depth,
        }
    }
}

/// Alert iff the nose sits strictly closer to the camera than `baseline - offset`.
pub fn is_forward_head(nose_depth: f64, baseline: f64, offset: f64) -> bool {
    nose_depth < baseline - offset
}

impl PostureState {
    pub fn calibrating(config: &ClassifierConfig) -> Self {
        PostureState::Calibrating(CalibrationSession::new(config.target_sample_count))
    }

    pub fn mode(&self) -> Mode {
        match self {
            PostureState::Calibrating(_) => Mode::Calibrating,
            PostureState::Monitoring { .. } => Mode::Monitoring,
        }
    }

    pub fn baseline(&self) -> Option<f64> {
        match self {
            PostureState::Calibrating(_) => None,
            PostureState::Monitoring { baseline } => Some(*baseline),
        }
    }

    /// Consumes one frame and returns the next state with the frame's decision.
    ///
    /// Frames without a usable nose landmark leave the state untouched and never alert.
    pub fn advance(self, landmarks: &LandmarkSet, config: &ClassifierConfig) -> (Self, Decision) {
        let nose_depth = landmarks.nose_depth().filter(|depth| depth.is_finite());

        match self {
            PostureState::Calibrating(mut session) => {
                let Some(depth) = nose_depth else {
                    trace!("No nose landmark, calibration frame skipped");
                    return (PostureState::Calibrating(session), Decision::no_alert(None));
                };

                match session.add_sample(depth) {
                    Some(baseline) => {
                        info!(
                            baseline,
                            samples = session.collected(),
                            "Calibration complete"
                        );
                        (PostureState::Monitoring { baseline }, Decision::no_alert(nose_depth))
                    }
                    None => (PostureState::Calibrating(session), Decision::no_alert(nose_depth)),
                }
            }
            PostureState::Monitoring { baseline } => {
                let Some(depth) = nose_depth else {
                    trace!("No nose landmark, no judgment this frame");
                    return (PostureState::Monitoring { baseline }, Decision::no_alert(None));
                };

                let alert = is_forward_head(depth, baseline, config.depth_offset);
                debug!(nose_depth = depth, baseline, alert, "Monitoring frame");

                (
                    PostureState::Monitoring { baseline },
                    Decision {
                        alert,
                        nose_depth,
                    },
                )
            }
        }
    }
}

/// Owns the configuration and current state of one posture session.
#[derive(Debug, Clone)]
pub struct PostureClassifier {
    config: ClassifierConfig,
    state: PostureState,
}

impl PostureClassifier {
    /// Validates the configuration and starts out calibrating.
    pub fn new(config: ClassifierConfig) -> PostureResult<Self> {
        config.validate()?;
        let state = PostureState::calibrating(&config);

        Ok(Self { config, state })
    }

    pub fn process(&mut self, landmarks: &LandmarkSet) -> Decision {
        let state = std::mem::take(&mut self.state);
        let (next, decision) = state.advance(landmarks, &self.config);
        self.state = next;
        decision
    }

    /// Drops any baseline and collected samples and begins a fresh calibration.
    pub fn start_calibration(&mut self) {
        info!(
            target_samples = self.config.target_sample_count,
            "Starting calibration"
        );
        self.state = PostureState::calibrating(&self.config);
    }

    pub fn baseline(&self) -> Option<f64> {
        self.state.baseline()
    }

    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    /// (collected, target) while calibrating; both equal the target once monitoring.
    pub fn calibration_progress(&self) -> (usize, usize) {
        match &self.state {
            PostureState::Calibrating(session) => (session.collected(), session.target()),
            PostureState::Monitoring { .. } => (
                self.config.target_sample_count,
                self.config.target_sample_count,
            ),
        }
    }

    pub fn state(&self) -> &PostureState {
        &self.state
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }
}

/// Cloneable handle that serializes every access to one classifier, for when
/// capture and classification run on different threads.
#[derive(Debug, Clone)]
pub struct SharedClassifier {
    inner: Arc<Mutex<PostureClassifier>>,
}

impl SharedClassifier {
    pub fn new(classifier: PostureClassifier) -> Self {
        Self {
            inner: Arc::new(Mutex::new(classifier)),
        }
    }

    fn lock(&self) -> PostureResult<MutexGuard<'_, PostureClassifier>> {
        self.inner.lock().map_err(|_| PostureError::StatePoisoned)
    }

    /// Runs `f` with the lock held, for reads that must agree with each other.
    pub fn with<T>(&self, f: impl FnOnce(&mut PostureClassifier) -> T) -> PostureResult<T> {
        Ok(f(&mut *self.lock()?))
    }

    pub fn process(&self, landmarks: &LandmarkSet) -> PostureResult<Decision> {
        Ok(self.lock()?.process(landmarks))
    }

    pub fn start_calibration(&self) -> PostureResult<()> {
        self.lock()?.start_calibration();
        Ok(())
    }

    pub fn baseline(&self) -> PostureResult<Option<f64>> {
        Ok(self.lock()?.baseline())
    }

    pub fn mode(&self) -> PostureResult<Mode> {
        Ok(self.lock()?.mode())
    }

    pub fn calibration_progress(&self) -> PostureResult<(usize, usize)> {
        Ok(self.lock()?.calibration_progress())
    }
}
