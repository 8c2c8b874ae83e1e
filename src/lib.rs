// src/lib.rs
//! Forward head posture detection from per-frame body landmarks.
//!
//! A [`PostureSession`] feeds each frame's [`LandmarkSet`] to a two-phase
//! classifier: it first averages the nose depth over a calibration window, then
//! flags any frame whose nose sits noticeably closer to the camera than that
//! baseline.

pub mod calibration;
pub mod classifier;
pub mod config;
pub mod data;
pub mod error;
pub mod geometry;
pub mod landmarks;
pub mod session;
pub mod source;

pub use classifier::{Decision, Mode, PostureClassifier, PostureState, SharedClassifier};
pub use config::{AppSettings, ClassifierConfig};
pub use error::{PostureError, PostureResult};
pub use landmarks::{BodyLandmark, Landmark, LandmarkSet, NormalizedLandmark};
pub use session::{FrameReport, PostureSession, SessionStats};
pub use source::{LandmarkSource, ReplaySource};
