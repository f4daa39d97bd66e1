use clap::{Parser, ValueEnum};
use image::{DynamicImage, ImageReader};
use std::path::PathBuf;

use veinlight::{
    AppConfig, DetectionOrchestrator, DetectionState, FilterPipeline, FrameProcessor, HeuristicContourDetector,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Vein-highlighted grayscale view
    Enhance,
    /// Foreground mask used by the heuristic detector
    Binary,
    /// Heuristic detection with overlay
    Detect,
}

#[derive(Parser)]
#[command(name = "veinlight")]
#[command(about = "Highlight and detect veins in near-infrared frames")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Where to write the result
    #[arg(short, long, value_name = "FILE", default_value = "veinlight_out.png")]
    output: PathBuf,

    #[arg(short, long, value_enum, default_value_t = Mode::Detect)]
    mode: Mode,

    /// TOML settings file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Save intermediate stage images to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let cfg = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    log::info!("loading image: {}", args.image_path.display());
    let img = ImageReader::open(&args.image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;
    log::info!("image loaded: {}x{}", img.width(), img.height());

    let debug_dir = args
        .debug_out
        .clone()
        .or_else(|| cfg.application.debug_mode.then(|| PathBuf::from("veinlight_debug")));
    let pipeline = || -> anyhow::Result<FilterPipeline> {
        match &debug_dir {
            Some(dir) => FilterPipeline::new().with_debug(dir.clone()),
            None => Ok(FilterPipeline::new()),
        }
    };

    match args.mode {
        Mode::Enhance => {
            let enhanced = pipeline()?.enhance(&img, &cfg.filters);
            save(DynamicImage::ImageLuma8(enhanced), &args.output)?;
        }
        Mode::Binary => {
            let binary = pipeline()?.binarize(&img, &cfg.filters);
            save(DynamicImage::ImageLuma8(binary), &args.output)?;
        }
        Mode::Detect => {
            let heuristic = HeuristicContourDetector::with_pipeline(pipeline()?, cfg.filters.clone());
            let processor = FrameProcessor::new(DetectionOrchestrator::new(heuristic), cfg.visualization.clone())
                .with_frame_budget(cfg.detection.frame_budget());
            let state = DetectionState {
                model_available: false,
                detection_enabled: cfg.detection.enabled,
            };

            let result = processor.process(&img, state);
            log::info!(
                "{} detections in {:.1} ms",
                result.detections.len(),
                result.elapsed.as_secs_f64() * 1000.0
            );
            for (i, detection) in result.detections.iter().enumerate() {
                let b = &detection.bbox;
                println!(
                    "  {}: {} at ({}, {}) {}x{} - confidence: {:.2}",
                    i + 1,
                    detection.class_name,
                    b.x,
                    b.y,
                    b.width,
                    b.height,
                    detection.confidence
                );
            }
            save(DynamicImage::ImageRgb8(result.image), &args.output)?;
        }
    }

    Ok(())
}

fn save(image: DynamicImage, path: &PathBuf) -> anyhow::Result<()> {
    image
        .save(path)
        .map_err(|e| anyhow::anyhow!("Failed to save {}: {}", path.display(), e))?;
    log::info!("wrote {}", path.display());
    Ok(())
}
