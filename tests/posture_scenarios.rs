use posturite::data::SessionExporter;
use posturite::{
    AppSettings, ClassifierConfig, Landmark, LandmarkSet, Mode, PostureClassifier,
    PostureSession, ReplaySource,
};
use image::DynamicImage;
use std::fs;
use tempfile::tempdir;

fn nose(depth: f64) -> LandmarkSet {
    LandmarkSet::new(vec![
        Landmark::new(0, depth, 320, 120),
        Landmark::new(11, 0.1, 260, 260),
        Landmark::new(12, 0.1, 380, 260),
    ])
}

#[test]
fn calibrate_three_samples_then_monitor() {
    let config = ClassifierConfig::new(3, 0.05).unwrap();
    let mut classifier = PostureClassifier::new(config).unwrap();

    for depth in [-0.10, -0.12, -0.11] {
        assert!(!classifier.process(&nose(depth)).alert);
    }

    assert_eq!(classifier.mode(), Mode::Monitoring);
    let baseline = classifier.baseline().expect("baseline after calibration");
    assert!((baseline - -0.11).abs() < 1e-9);

    assert!(classifier.process(&nose(-0.20)).alert);
    assert!(!classifier.process(&nose(-0.12)).alert);
}

#[test]
fn no_nose_ever_keeps_calibrating() {
    let mut classifier = PostureClassifier::new(ClassifierConfig::default()).unwrap();
    let headless = LandmarkSet::new(vec![Landmark::new(11, -3.0, 10, 10)]);

    for _ in 0..500 {
        assert!(!classifier.process(&headless).alert);
        assert!(!classifier.process(&LandmarkSet::empty()).alert);
    }

    assert_eq!(classifier.mode(), Mode::Calibrating);
    assert_eq!(classifier.baseline(), None);
    assert_eq!(classifier.calibration_progress(), (0, 60));
}

#[test]
fn replayed_session_exports_csv_and_summary() {
    let dir = tempdir().unwrap();
    let recording = dir.path().join("recording.jsonl");

    let mut lines = Vec::new();
    for _ in 0..3 {
        lines.push(r#"{"landmarks":[{"x":0.5,"y":0.25,"z":-0.10}]}"#);
    }
    lines.push(r#"{"landmarks":[]}"#);
    lines.push(r#"{"landmarks":[{"x":0.5,"y":0.30,"z":-0.30}]}"#);
    lines.push(r#"{"landmarks":[{"x":0.5,"y":0.25,"z":-0.11}]}"#);
    fs::write(&recording, lines.join("\n")).unwrap();

    let config = ClassifierConfig::new(3, 0.05).unwrap();
    let settings = AppSettings {
        classifier: config.clone(),
        ..AppSettings::default()
    };
    let mut session = PostureSession::new(&settings).unwrap();
    session.start().unwrap();
    let mut source = ReplaySource::open(&recording).unwrap();
    let (width, height) = session.frame_size();
    let frame = DynamicImage::new_rgb8(width, height);
    let mut exporter = SessionExporter::new(dir.path().join("out"), Some("replay".to_string()));

    let mut alerts = Vec::new();
    while let Some(report) = session.process_frame(&frame, &mut source).unwrap() {
        alerts.push(report.alert);
        exporter.add_frame(report);
    }
    assert_eq!(alerts, vec![false, false, false, false, true, false]);

    let stats = session.end();
    assert_eq!(stats.frames, 6);
    assert_eq!(stats.calibration_frames, 3);
    assert_eq!(stats.skipped_frames, 1);
    assert_eq!(stats.alert_frames, 1);

    let csv_path = exporter.export_csv().unwrap();
    let csv = fs::read_to_string(csv_path).unwrap();
    assert_eq!(csv.lines().count(), 7);
    assert!(csv.lines().nth(5).unwrap().starts_with("4,"));
    assert!(csv.lines().nth(5).unwrap().contains(",monitoring,true,-0.3,"));

    let summary_path = exporter.write_summary(&config, &stats).unwrap();
    assert!(summary_path.ends_with("replay/summary.json"));
}
