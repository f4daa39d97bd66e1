use anyhow::Result;
use image::GrayImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::FilterConfig;
use crate::detection::preprocessing;
use crate::detection::steps::*;
use crate::models::{BinaryFrame, EnhancedFrame, Frame};

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Directory receiving one PNG per executed step
    pub output_dir: PathBuf,
}

/// Context available to all pipeline steps
#[derive(Clone, Default)]
pub struct PipelineContext {
    pub debug: Option<DebugConfig>,
}

/// A single grayscale stage of the filter pipeline.
///
/// Steps read their parameters from the `FilterConfig` snapshot handed to
/// each run, so one pipeline instance serves any configuration.
pub trait PipelineStep: Send + Sync {
    /// Whether this step runs under the given configuration
    fn is_enabled(&self, config: &FilterConfig) -> bool;

    /// Transform the frame
    fn process(&self, image: GrayImage, config: &FilterConfig) -> GrayImage;

    /// Human-readable name (used in logs and debug output)
    fn name(&self) -> &str;
}

/// Ordered sequence of steps
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    context: PipelineContext,
}

impl Pipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            context: PipelineContext::default(),
        }
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        prepare_debug_dir(&output_dir)?;
        self.context.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    /// Add a processing step to the pipeline
    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every enabled step in order
    pub fn run(&self, input: GrayImage, config: &FilterConfig) -> GrayImage {
        self.run_partial(input, config, self.steps.len())
    }

    /// Run only the first `num_steps` steps, e.g. to inspect a stage in isolation
    pub fn run_partial(&self, input: GrayImage, config: &FilterConfig, num_steps: usize) -> GrayImage {
        let mut image = input;

        for (step_idx, step) in self.steps.iter().take(num_steps).enumerate() {
            if !step.is_enabled(config) {
                log::debug!("skipping step: {}", step.name());
                continue;
            }
            log::debug!("running step: {}", step.name());
            image = step.process(image, config);
            self.save_debug_output(step_idx + 1, step.name(), &image);
        }

        image
    }

    /// Dump an intermediate frame; failures are logged, never propagated
    fn save_debug_output(&self, index: usize, step_name: &str, image: &GrayImage) {
        let Some(debug_config) = &self.context.debug else {
            return;
        };

        let filename = format!("{:02}_{}.png", index, step_name.to_lowercase().replace(' ', "_"));
        let output_path = debug_config.output_dir.join(&filename);
        match image.save(&output_path) {
            Ok(()) => log::debug!("debug: saved {}", filename),
            Err(e) => log::warn!("failed to save debug image {}: {}", output_path.display(), e),
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn prepare_debug_dir(output_dir: &Path) -> Result<()> {
    if output_dir.exists() {
        let entries = std::fs::read_dir(output_dir)?;
        if entries.count() > 0 {
            return Err(anyhow::anyhow!(
                "Debug directory is not empty: {}",
                output_dir.display()
            ));
        }
    } else {
        std::fs::create_dir_all(output_dir)?;
    }
    Ok(())
}

/// Vein enhancement and binarization.
///
/// Stage order is fixed: noise reduction first, then contrast, then
/// structure enhancement. Only per-stage toggles and parameters vary.
pub struct FilterPipeline {
    enhancement: Pipeline,
    binarization: Pipeline,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self {
            enhancement: enhancement_pipeline(),
            binarization: binarization_pipeline(),
        }
    }

    /// Dump every stage output below `output_dir`.
    ///
    /// Enhancement stages go to `enhance/`, thresholding stages to `binarize/`.
    pub fn with_debug(self, output_dir: PathBuf) -> Result<Self> {
        prepare_debug_dir(&output_dir)?;
        Ok(Self {
            enhancement: self.enhancement.with_debug(output_dir.join("enhance"))?,
            binarization: self.binarization.with_debug(output_dir.join("binarize"))?,
        })
    }

    pub fn enhancement_steps(&self) -> Vec<&str> {
        self.enhancement.step_names()
    }

    pub fn binarization_steps(&self) -> Vec<&str> {
        self.binarization.step_names()
    }

    /// Grayscale vein-highlighted view of the frame.
    ///
    /// An empty frame is logged and returned as an empty grayscale frame.
    pub fn enhance(&self, frame: &Frame, config: &FilterConfig) -> EnhancedFrame {
        let gray = preprocessing::to_grayscale(frame);
        if is_empty(&gray) {
            log::warn!("enhance: empty input frame");
            return gray;
        }
        self.enhancement.run(gray, config)
    }

    /// Foreground/background mask, foreground = locally darker structures
    pub fn binarize(&self, frame: &Frame, config: &FilterConfig) -> BinaryFrame {
        let gray = preprocessing::to_grayscale(frame);
        if is_empty(&gray) {
            log::warn!("binarize: empty input frame");
            return gray;
        }
        let enhanced = self.enhancement.run(gray, config);
        self.binarization.run(enhanced, config)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn is_empty(image: &GrayImage) -> bool {
    image.width() == 0 || image.height() == 0
}

/// The six enhancement stages in their fixed order
pub fn enhancement_pipeline() -> Pipeline {
    Pipeline::new()
        .add_step(Arc::new(MedianStep))
        .add_step(Arc::new(GaussianStep))
        .add_step(Arc::new(BilateralStep))
        .add_step(Arc::new(ClaheStep))
        .add_step(Arc::new(ContrastStep))
        .add_step(Arc::new(StructureEnhancementStep))
}

/// Thresholding followed by the optional morphology stage
pub fn binarization_pipeline() -> Pipeline {
    Pipeline::new()
        .add_step(Arc::new(ThresholdStep))
        .add_step(Arc::new(MorphologyStep))
}
