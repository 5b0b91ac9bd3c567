use clap::Parser;
use kptrack::{
    retain_best, retain_in_roi, suppress_frames, Candidate, FootprintShape, NmsConfig, RingBuffer,
    Roi,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "kptrack CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ShapeConfig {
    Circle,
    Square,
}

impl From<ShapeConfig> for FootprintShape {
    fn from(value: ShapeConfig) -> Self {
        match value {
            ShapeConfig::Circle => FootprintShape::Circle,
            ShapeConfig::Square => FootprintShape::Square,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct NmsConfigJson {
    max_overlap: f32,
    shape: ShapeConfig,
    min_score: Option<f32>,
    parallel: bool,
}

impl Default for NmsConfigJson {
    fn default() -> Self {
        let cfg = NmsConfig::default();
        Self {
            max_overlap: cfg.max_overlap,
            shape: ShapeConfig::Circle,
            min_score: cfg.min_score,
            parallel: cfg.parallel,
        }
    }
}

impl From<NmsConfigJson> for NmsConfig {
    fn from(value: NmsConfigJson) -> Self {
        Self {
            max_overlap: value.max_overlap,
            shape: value.shape.into(),
            min_score: value.min_score,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RoiJson {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
struct CandidateRecord {
    x: f32,
    y: f32,
    size: f32,
    score: f32,
}

impl From<CandidateRecord> for Candidate {
    fn from(value: CandidateRecord) -> Self {
        Candidate::new(value.x, value.y, value.size, value.score)
    }
}

impl From<Candidate> for CandidateRecord {
    fn from(value: Candidate) -> Self {
        Self {
            x: value.x,
            y: value.y,
            size: value.size,
            score: value.score,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FrameJson {
    name: Option<String>,
    candidates: Vec<CandidateRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    history_capacity: usize,
    nms: NmsConfigJson,
    roi: Option<RoiJson>,
    retain_best: Option<usize>,
    frames_path: Option<String>,
    frames: Vec<FrameJson>,
    output_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_capacity: 2,
            nms: NmsConfigJson::default(),
            roi: None,
            retain_best: None,
            frames_path: None,
            frames: Vec::new(),
            output_path: None,
        }
    }
}

/// What the history keeps for each processed frame.
#[derive(Debug, Serialize)]
struct FrameRecord {
    name: String,
    raw: usize,
    in_roi: usize,
    keypoints: Vec<CandidateRecord>,
}

#[derive(Debug, Serialize)]
struct Output {
    frames_processed: usize,
    history: Vec<FrameRecord>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env()
                    .add_directive("kptrack=info".parse()?)
                    .add_directive("kptrack_cli=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let mut config: Config = serde_json::from_str(&config_text)?;
    if let Some(path) = config.frames_path.take() {
        let frames_text = fs::read_to_string(&path)?;
        let extra: Vec<FrameJson> = serde_json::from_str(&frames_text)?;
        config.frames.extend(extra);
    }
    if config.frames.is_empty() {
        return Err("no frames given: set frames or frames_path in the config".into());
    }

    let roi = config
        .roi
        .as_ref()
        .map(|r| Roi::new(r.x, r.y, r.width, r.height))
        .transpose()?;
    let nms_cfg: NmsConfig = config.nms.into();
    let mut history = RingBuffer::new(config.history_capacity)?;

    let mut names = Vec::with_capacity(config.frames.len());
    let mut raw_counts = Vec::with_capacity(config.frames.len());
    let mut in_roi_counts = Vec::with_capacity(config.frames.len());
    let mut batch = Vec::with_capacity(config.frames.len());
    for (idx, frame) in config.frames.into_iter().enumerate() {
        let mut candidates: Vec<Candidate> =
            frame.candidates.into_iter().map(Candidate::from).collect();
        raw_counts.push(candidates.len());
        if let Some(roi) = &roi {
            retain_in_roi(&mut candidates, roi);
        }
        in_roi_counts.push(candidates.len());
        names.push(frame.name.unwrap_or_else(|| format!("{idx:06}")));
        batch.push(candidates);
    }

    let kept_frames = suppress_frames(&batch, &nms_cfg)?;
    let frames_processed = kept_frames.len();
    for (((name, raw), in_roi), kept) in names
        .into_iter()
        .zip(raw_counts)
        .zip(in_roi_counts)
        .zip(kept_frames)
    {
        let keypoints = match config.retain_best {
            Some(n) => retain_best(&kept, n),
            None => kept,
        };
        tracing::info!(
            frame = name.as_str(),
            raw,
            in_roi,
            kept = keypoints.len(),
            "frame processed"
        );
        let evicted = history.push_back(FrameRecord {
            name,
            raw,
            in_roi,
            keypoints: keypoints.into_iter().map(CandidateRecord::from).collect(),
        });
        if let Some(old) = evicted {
            tracing::debug!(frame = old.name.as_str(), "evicted from history");
        }
    }

    let output = Output {
        frames_processed,
        history: history.into_iter().collect(),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
