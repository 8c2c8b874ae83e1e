// src/config.rs
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PostureError, PostureResult};

/// Tunables of the posture classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Valid nose samples needed to finish calibration (~2 s at 30 fps).
    pub target_sample_count: usize,
    /// How far below the baseline the nose depth must drop to raise an alert.
    pub depth_offset: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            target_sample_count: 60,
            depth_offset: 0.05,
        }
    }
}

impl ClassifierConfig {
    pub fn new(target_sample_count: usize, depth_offset: f64) -> PostureResult<Self> {
        let config = Self {
            target_sample_count,
            depth_offset,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PostureResult<()> {
        if self.target_sample_count == 0 {
            return Err(PostureError::InvalidConfig(
                "target_sample_count must be at least 1".to_string(),
            ));
        }

        if !self.depth_offset.is_finite() || self.depth_offset < 0.0 {
            return Err(PostureError::InvalidConfig(format!(
                "depth_offset must be a finite, non-negative number (got {})",
                self.depth_offset
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub classifier: ClassifierConfig,
    pub output_directory: PathBuf,
    pub frame_width: u32,
    pub frame_height: u32,
    pub export_csv: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            output_directory: directories::UserDirs::new()
                .and_then(|dirs| dirs.document_dir().map(|p| p.join("Posturite")))
                .unwrap_or_else(|| PathBuf::from("./output")),
            frame_width: 640,
            frame_height: 480,
            export_csv: true,
        }
    }
}

impl AppSettings {
    /// Reads settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> PostureResult<Self> {
        let content = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> PostureResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> PostureResult<()> {
        self.classifier.validate()?;

        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(PostureError::InvalidConfig(format!(
                "frame size must be non-zero (got {}x{})",
                self.frame_width, self.frame_height
            )));
        }

        Ok(())
    }
}
