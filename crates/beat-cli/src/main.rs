mod render;

use anyhow::{Context, Result};
use beat_lib::{
    config::{load_config, PipelineConfig},
    detectors::ecg::detect_r_peaks,
    io::{load_recording_with_text_rate, text as text_io, DEFAULT_TEXT_SAMPLING_RATE},
    normalize::{stats, z_score_normalize},
    pipeline::{run_beat_pipeline, RecordingSummary},
    plot::{figure_from_beats, figure_from_waveform, PlotBackend},
    segment::beat_windows,
    signal::{EcgRecording, Events},
    synthetic::{demo_recording, synthetic_ecg, DEMO_DURATION_S, DEMO_SAMPLING_RATE},
};
use clap::{Args, Parser, Subcommand};
use render::PngBackend;
use serde::Serialize;
use std::{
    io::{self, Read},
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(
    name = "beat",
    version,
    about = "Normalize single-lead ECG, find R-peaks and cut beat windows"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the samples come from.
#[derive(Args, Debug, Clone)]
struct InputArgs {
    /// Recording file (.json, .csv or .txt). Reads delimited samples from stdin when omitted.
    #[arg(long, conflicts_with = "demo")]
    input: Option<PathBuf>,
    /// Sampling rate in Hz for CSV/TXT/stdin input (default 360); overrides the rate stored in JSON.
    #[arg(long)]
    fs: Option<f64>,
    /// Use the built-in synthetic recording instead of an input file.
    #[arg(long)]
    demo: bool,
}

#[derive(Args, Debug, Clone, Default)]
struct DetectorArgs {
    /// R-peak threshold in z-score units [default: 1.0]
    #[arg(long)]
    threshold_z: Option<f32>,
    /// Minimum time between R-peaks in seconds [default: 0.20]
    #[arg(long)]
    refractory_s: Option<f64>,
}

#[derive(Args, Debug, Clone, Default)]
struct SegmenterArgs {
    /// Window span before each R-peak in seconds [default: 0.20]
    #[arg(long)]
    pre_s: Option<f64>,
    /// Window span after each R-peak in seconds [default: 0.40]
    #[arg(long)]
    post_s: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a recording: status line, stats and the first samples
    Info {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Mean, population std, min and max of the samples
    Stats {
        #[command(flatten)]
        input: InputArgs,
        /// Report stats of the z-score normalized samples instead of the raw ones
        #[arg(long)]
        normalized: bool,
    },
    /// Z-score normalize and print the result as a recording
    Normalize {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Detect R-peaks (on the normalized signal unless --raw)
    FindRpeaks {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        detector: DetectorArgs,
        /// Threshold the samples as given, skipping normalization
        #[arg(long)]
        raw: bool,
    },
    /// Cut beat windows around peak indices listed one per line in --peaks
    SegmentBeats {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        peaks: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        segmenter: SegmenterArgs,
    },
    /// Normalize → detect → segment in one shot
    Pipeline {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        detector: DetectorArgs,
        #[command(flatten)]
        segmenter: SegmenterArgs,
    },
    /// Write the synthetic demo recording as JSON
    Demo {
        #[arg(long, default_value_t = DEMO_SAMPLING_RATE)]
        fs: f64,
        #[arg(long, default_value_t = DEMO_DURATION_S)]
        duration_s: f64,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Render the waveform with R-peaks, or the overlaid beats, to a PNG
    Plot {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        detector: DetectorArgs,
        #[command(flatten)]
        segmenter: SegmenterArgs,
        #[arg(long)]
        out: PathBuf,
        /// Overlay the beat windows instead of drawing the full trace
        #[arg(long)]
        beats: bool,
        /// Draw raw samples instead of the normalized trace
        #[arg(long)]
        raw: bool,
        #[arg(long, default_value_t = 1024)]
        width: u32,
        #[arg(long, default_value_t = 480)]
        height: u32,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Info { input } => cmd_info(&input)?,
        Commands::Stats { input, normalized } => cmd_stats(&input, normalized)?,
        Commands::Normalize { input } => cmd_normalize(&input)?,
        Commands::FindRpeaks {
            input,
            config,
            detector,
            raw,
        } => cmd_find_rpeaks(&input, config.as_deref(), &detector, raw)?,
        Commands::SegmentBeats {
            input,
            peaks,
            config,
            segmenter,
        } => cmd_segment_beats(&input, &peaks, config.as_deref(), &segmenter)?,
        Commands::Pipeline {
            input,
            config,
            detector,
            segmenter,
        } => cmd_pipeline(&input, config.as_deref(), &detector, &segmenter)?,
        Commands::Demo {
            fs,
            duration_s,
            out,
        } => cmd_demo(fs, duration_s, out.as_deref())?,
        Commands::Plot {
            input,
            config,
            detector,
            segmenter,
            out,
            beats,
            raw,
            width,
            height,
        } => cmd_plot(
            &input,
            config.as_deref(),
            &detector,
            &segmenter,
            out,
            beats,
            raw,
            (width, height),
        )?,
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

/// Load the recording and a display name for it.
fn load_input(args: &InputArgs) -> Result<(EcgRecording, String)> {
    if args.demo {
        let recording = match args.fs {
            Some(fs) => synthetic_ecg(fs, DEMO_DURATION_S),
            None => demo_recording(),
        };
        return Ok((recording, "Dummy".into()));
    }
    let text_rate = args.fs.unwrap_or(DEFAULT_TEXT_SAMPLING_RATE);
    match &args.input {
        Some(path) => {
            let mut recording = load_recording_with_text_rate(path, text_rate)
                .with_context(|| format!("loading recording {}", path.display()))?;
            if let Some(fs) = args.fs {
                recording.sampling_rate = fs;
            }
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Ok((recording, name))
        }
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            let samples = text_io::parse_f32_series(&buf).context("parsing samples from stdin")?;
            Ok((EcgRecording::new(samples, text_rate), "stdin".into()))
        }
    }
}

/// Config file (or defaults) with command-line overrides applied on top.
fn resolve_config(
    config: Option<&Path>,
    detector: &DetectorArgs,
    segmenter: &SegmenterArgs,
) -> Result<PipelineConfig> {
    let mut cfg = match config {
        Some(path) => load_config(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(v) = detector.threshold_z {
        cfg.detector.threshold_z = v;
    }
    if let Some(v) = detector.refractory_s {
        cfg.detector.refractory_s = v;
    }
    if let Some(v) = segmenter.pre_s {
        cfg.segmenter.pre_s = v;
    }
    if let Some(v) = segmenter.post_s {
        cfg.segmenter.post_s = v;
    }
    cfg.validate()?;
    log::debug!("pipeline config: {:?}", cfg);
    Ok(cfg)
}

fn cmd_info(input: &InputArgs) -> Result<()> {
    let (recording, name) = load_input(input)?;
    let summary = RecordingSummary::new(&name, &recording);
    log::info!("Loaded: {}", summary.status);
    print_json(&summary)
}

fn cmd_stats(input: &InputArgs, normalized: bool) -> Result<()> {
    let (recording, _) = load_input(input)?;
    let summary = if normalized {
        stats(&z_score_normalize(&recording.samples))
    } else {
        stats(&recording.samples)
    };
    print_json(&summary)
}

fn cmd_normalize(input: &InputArgs) -> Result<()> {
    let (recording, _) = load_input(input)?;
    let normalized = EcgRecording::new(
        z_score_normalize(&recording.samples),
        recording.sampling_rate,
    );
    print_json(&normalized)
}

fn cmd_find_rpeaks(
    input: &InputArgs,
    config: Option<&Path>,
    detector: &DetectorArgs,
    raw: bool,
) -> Result<()> {
    let (recording, _) = load_input(input)?;
    let cfg = resolve_config(config, detector, &SegmenterArgs::default())?;
    let samples = if raw {
        recording.samples
    } else {
        z_score_normalize(&recording.samples)
    };
    let peaks = detect_r_peaks(&samples, recording.sampling_rate, &cfg.detector);
    print_json(&Events::from_indices(peaks))
}

fn cmd_segment_beats(
    input: &InputArgs,
    peaks: &Path,
    config: Option<&Path>,
    segmenter: &SegmenterArgs,
) -> Result<()> {
    let (recording, _) = load_input(input)?;
    let cfg = resolve_config(config, &DetectorArgs::default(), segmenter)?;
    let indices = text_io::read_event_indices(peaks)?;
    if indices.windows(2).any(|w| w[1] <= w[0]) {
        log::warn!("peak list is not strictly increasing; windows follow file order");
    }
    let windows = beat_windows(
        &indices,
        recording.len(),
        recording.sampling_rate,
        &cfg.segmenter,
    );
    print_json(&windows)
}

fn cmd_pipeline(
    input: &InputArgs,
    config: Option<&Path>,
    detector: &DetectorArgs,
    segmenter: &SegmenterArgs,
) -> Result<()> {
    let (recording, name) = load_input(input)?;
    let cfg = resolve_config(config, detector, segmenter)?;
    let result = run_beat_pipeline(&recording, &cfg);
    log::info!(
        "{}: {} R-peaks, {} beat windows",
        name,
        result.peaks.len(),
        result.windows.len()
    );
    print_json(&result)
}

fn cmd_demo(fs: f64, duration_s: f64, out: Option<&Path>) -> Result<()> {
    let recording = synthetic_ecg(fs, duration_s);
    let js = serde_json::to_string(&recording)?;
    match out {
        Some(path) => {
            std::fs::write(path, js).with_context(|| format!("writing {}", path.display()))?;
            log::info!("wrote {} samples to {}", recording.len(), path.display());
        }
        None => println!("{}", js),
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_plot(
    input: &InputArgs,
    config: Option<&Path>,
    detector: &DetectorArgs,
    segmenter: &SegmenterArgs,
    out: PathBuf,
    beats: bool,
    raw: bool,
    size: (u32, u32),
) -> Result<()> {
    let (recording, name) = load_input(input)?;
    let cfg = resolve_config(config, detector, segmenter)?;
    let result = run_beat_pipeline(&recording, &cfg);
    let trace: &[f32] = if raw {
        &recording.samples
    } else {
        &result.normalized
    };
    let fig = if beats {
        figure_from_beats(
            &format!("{} beats", name),
            trace,
            &result.windows,
            recording.sampling_rate,
        )
    } else {
        figure_from_waveform(
            &name,
            trace,
            recording.sampling_rate,
            &result.peaks.indices,
            size.0 as usize * 2,
        )
    };
    PngBackend::new(out, size).draw(&fig)
}
