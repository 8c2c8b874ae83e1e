// src/data.rs
use crate::classifier::Mode;
use crate::config::ClassifierConfig;
use crate::error::PostureResult;
use crate::session::{FrameReport, SessionStats};
use chrono::{DateTime, Local};
use csv::Writer;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct PostureRecord {
    frame: u64,
    timestamp_ms: u64,
    mode: Mode,
    alert: bool,
    nose_depth: Option<f64>,
    baseline: Option<f64>,
    nose_x: Option<i32>,
    nose_y: Option<i32>,
    neck_angle: Option<f64>,
}

impl From<&FrameReport> for PostureRecord {
    fn from(report: &FrameReport) -> Self {
        Self {
            frame: report.frame_index,
            timestamp_ms: report.timestamp_ms,
            mode: report.mode,
            alert: report.alert,
            nose_depth: report.nose_depth,
            baseline: report.baseline,
            nose_x: report.nose_position.map(|(x, _)| x),
            nose_y: report.nose_position.map(|(_, y)| y),
            neck_angle: report.neck_angle,
        }
    }
}

#[derive(Debug, Serialize)]
struct SessionSummary<'a> {
    session: &'a str,
    started_at: String,
    config: &'a ClassifierConfig,
    final_baseline: Option<f64>,
    alert_ratio: f64,
    stats: &'a SessionStats,
}

/// Collects frame reports for one session and writes them to disk.
pub struct SessionExporter {
    output_dir: PathBuf,
    session_name: String,
    started_at: DateTime<Local>,
    reports: Vec<FrameReport>,
}

impl SessionExporter {
    pub fn new(output_dir: impl AsRef<Path>, session_name: Option<String>) -> Self {
        let started_at = Local::now();
        let session_name = session_name
            .unwrap_or_else(|| format!("session_{}", started_at.format("%Y%m%d_%H%M%S")));

        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            session_name,
            started_at,
            reports: Vec::new(),
        }
    }

    pub fn add_frame(&mut self, report: FrameReport) {
        self.reports.push(report);
    }

    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    pub fn session_dir(&self) -> PathBuf {
        self.output_dir.join(&self.session_name)
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn export_csv(&self) -> PostureResult<PathBuf> {
        let csv_path = self.session_dir().join("posture_data.csv");
        std::fs::create_dir_all(self.session_dir())?;

        let file = File::create(&csv_path)?;
        let mut writer = Writer::from_writer(file);
        for report in &self.reports {
            writer.serialize(PostureRecord::from(report))?;
        }
        writer.flush()?;

        Ok(csv_path)
    }

    pub fn write_summary(
        &self,
        config: &ClassifierConfig,
        stats: &SessionStats,
    ) -> PostureResult<PathBuf> {
        let summary_path = self.session_dir().join("summary.json");
        std::fs::create_dir_all(self.session_dir())?;

        let summary = SessionSummary {
            session: &self.session_name,
            started_at: self.started_at.to_rfc3339(),
            config,
            final_baseline: self.reports.last().and_then(|r| r.baseline),
            alert_ratio: stats.alert_ratio(),
            stats,
        };
        std::fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;

        Ok(summary_path)
    }
}
