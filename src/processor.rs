use image::DynamicImage;
use std::time::{Duration, Instant};

use crate::config::{DEFAULT_FRAME_BUDGET_MS, DetectionState, FilterConfig, VisualizationConfig};
use crate::detection::DetectionOrchestrator;
use crate::models::{AnnotatedFrame, Detection, Frame};
use crate::overlay;
use crate::pipeline::FilterPipeline;

/// What a single call to [`FrameProcessor::process`] produced
pub struct ProcessedFrame {
    pub image: AnnotatedFrame,
    /// Empty when detection was disabled
    pub detections: Vec<Detection>,
    pub elapsed: Duration,
    /// The caller should drop the frame instead of queueing more work
    pub over_budget: bool,
}

/// Per-frame driver: detection plus overlay when detection is enabled,
/// the vein-highlighted view otherwise.
///
/// Holds no state between frames other than its configuration.
pub struct FrameProcessor {
    orchestrator: DetectionOrchestrator,
    pipeline: FilterPipeline,
    visualization: VisualizationConfig,
    frame_budget: Duration,
}

impl FrameProcessor {
    pub fn new(orchestrator: DetectionOrchestrator, visualization: VisualizationConfig) -> Self {
        Self {
            orchestrator,
            pipeline: FilterPipeline::new(),
            visualization,
            frame_budget: Duration::from_millis(DEFAULT_FRAME_BUDGET_MS),
        }
    }

    pub fn with_frame_budget(mut self, budget: Duration) -> Self {
        self.frame_budget = budget;
        self
    }

    pub fn with_pipeline(mut self, pipeline: FilterPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn filter_config(&self) -> &FilterConfig {
        self.orchestrator.heuristic().config()
    }

    pub fn visualization(&self) -> &VisualizationConfig {
        &self.visualization
    }

    pub fn set_visualization(&mut self, visualization: VisualizationConfig) {
        self.visualization = visualization;
    }

    pub fn process(&self, frame: &Frame, state: DetectionState) -> ProcessedFrame {
        let started = Instant::now();

        let (image, detections) = if state.detection_enabled {
            let detections = self.orchestrator.detect(frame, state, &self.visualization);
            let annotated = overlay::render(frame, &detections, &self.visualization);
            (annotated, detections)
        } else {
            let enhanced = self.pipeline.enhance(frame, self.filter_config());
            (DynamicImage::ImageLuma8(enhanced).to_rgb8(), Vec::new())
        };

        let elapsed = started.elapsed();
        let over_budget = elapsed > self.frame_budget;
        if over_budget {
            log::warn!(
                "frame took {:.1} ms, budget is {} ms",
                elapsed.as_secs_f64() * 1000.0,
                self.frame_budget.as_millis()
            );
        }

        ProcessedFrame {
            image,
            detections,
            elapsed,
            over_budget,
        }
    }
}
