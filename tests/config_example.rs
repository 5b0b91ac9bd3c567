//! Runs the CLI example configuration through the library pipeline.

use kptrack::{
    retain_best, retain_in_roi, suppress_frames, Candidate, FootprintShape, NmsConfig, RingBuffer,
    Roi,
};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ShapeJson {
    Circle,
    Square,
}

#[derive(Debug, Deserialize)]
struct NmsJson {
    max_overlap: f32,
    shape: ShapeJson,
    min_score: Option<f32>,
    parallel: bool,
}

#[derive(Debug, Deserialize)]
struct RoiJson {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize)]
struct CandidateJson {
    x: f32,
    y: f32,
    size: f32,
    score: f32,
}

#[derive(Debug, Deserialize)]
struct FrameJson {
    name: String,
    candidates: Vec<CandidateJson>,
}

#[derive(Debug, Deserialize)]
struct ExampleConfig {
    history_capacity: usize,
    nms: NmsJson,
    roi: RoiJson,
    retain_best: usize,
    frames: Vec<FrameJson>,
}

fn example_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("kptrack-cli/config.example.json")
}

fn load_example() -> ExampleConfig {
    let text = fs::read_to_string(example_path()).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn example_config_parses_with_valid_settings() {
    let cfg = load_example();
    assert_eq!(cfg.history_capacity, 2);
    assert_eq!(cfg.frames.len(), 2);
    assert!(matches!(cfg.nms.shape, ShapeJson::Circle | ShapeJson::Square));

    let nms = NmsConfig {
        max_overlap: cfg.nms.max_overlap,
        shape: FootprintShape::Circle,
        min_score: cfg.nms.min_score,
        parallel: cfg.nms.parallel,
    };
    assert!(nms.validate().is_ok());
    assert!(Roi::new(cfg.roi.x, cfg.roi.y, cfg.roi.width, cfg.roi.height).is_ok());
}

#[test]
fn example_config_runs_through_pipeline() {
    let cfg = load_example();
    let shape = match cfg.nms.shape {
        ShapeJson::Circle => FootprintShape::Circle,
        ShapeJson::Square => FootprintShape::Square,
    };
    let nms = NmsConfig {
        max_overlap: cfg.nms.max_overlap,
        shape,
        min_score: cfg.nms.min_score,
        parallel: cfg.nms.parallel,
    };
    let roi = Roi::new(cfg.roi.x, cfg.roi.y, cfg.roi.width, cfg.roi.height).unwrap();

    let mut names = Vec::new();
    let mut batch = Vec::new();
    for frame in cfg.frames {
        let mut candidates: Vec<Candidate> = frame
            .candidates
            .iter()
            .map(|c| Candidate::new(c.x, c.y, c.size, c.score))
            .collect();
        retain_in_roi(&mut candidates, &roi);
        names.push(frame.name);
        batch.push(candidates);
    }

    let mut history = RingBuffer::new(cfg.history_capacity).unwrap();
    for (name, kept) in names.into_iter().zip(suppress_frames(&batch, &nms).unwrap()) {
        history.push_back((name, retain_best(&kept, cfg.retain_best)));
    }

    let (prev, curr) = history.latest_pair().unwrap();
    assert_eq!(prev.0, "000000");
    assert_eq!(
        prev.1,
        vec![
            Candidate::new(11.0, 12.0, 6.0, 180.0),
            Candidate::new(30.0, 20.0, 6.0, 120.0),
        ]
    );
    assert_eq!(curr.0, "000001");
    assert_eq!(curr.1, vec![Candidate::new(12.0, 12.0, 6.0, 175.0)]);
}
