// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use image::DynamicImage;
use std::path::PathBuf;
use tracing::info;

use posturite::data::SessionExporter;
use posturite::{AppSettings, Mode, PostureSession, ReplaySource};

/// Replay recorded body landmarks and report forward head posture.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
struct CliArgs {
    /// JSON-lines landmark recording, one frame per line.
    recording: PathBuf,
    /// Settings file (JSON); defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory to write the session export into.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn run(args: CliArgs) -> Result<()> {
    let mut settings = match &args.config {
        Some(path) => AppSettings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => AppSettings::default(),
    };
    if let Some(output) = args.output {
        settings.output_directory = output;
    }

    let mut source = ReplaySource::open(&args.recording)?;
    let mut session = PostureSession::new(&settings)?;
    let mut exporter = SessionExporter::new(&settings.output_directory, None);

    // Replayed landmarks carry no pixels; the frame only supplies the size.
    let (width, height) = session.frame_size();
    let frame = DynamicImage::new_rgb8(width, height);

    session.start()?;

    let mut last_mode = Mode::Calibrating;
    while let Some(report) = session.process_frame(&frame, &mut source)? {
        if report.mode != last_mode {
            info!(frame = report.frame_index, baseline = ?report.baseline, "Monitoring posture");
            last_mode = report.mode;
        }
        exporter.add_frame(report);
    }

    let stats = session.end();
    println!("Frames processed: {}", stats.frames);
    println!("Calibration frames: {}", stats.calibration_frames);
    println!("Frames without a nose: {}", stats.skipped_frames);
    println!("Forward head frames: {}", stats.alert_frames);
    println!("Alert ratio: {:.1}%", stats.alert_ratio() * 100.0);
    if last_mode == Mode::Calibrating {
        println!("Calibration never completed; no posture judgments were made.");
    }

    if settings.export_csv && !exporter.is_empty() {
        let csv_path = exporter.export_csv().context("Failed to export CSV")?;
        let summary_path = exporter
            .write_summary(&settings.classifier, &stats)
            .context("Failed to write session summary")?;
        println!("Saved {} and {}", csv_path.display(), summary_path.display());
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt::init();

    let args = CliArgs::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}
