pub mod clahe;
pub mod contours;
pub mod model;
pub mod preprocessing;
pub mod steps;

use anyhow::Result;

use crate::config::{DetectionState, FilterConfig, MODEL_CONFIDENCE_THRESHOLD, VisualizationConfig};
use crate::models::{Detection, Frame};
use crate::pipeline::FilterPipeline;

pub use model::{ExternalModelDetector, ModelBackend, ModelResponse};

/// A source of detections for one frame
pub trait Detector {
    /// Backend identifier.
    fn name(&self) -> &str;

    /// Run detection, dropping candidates below `confidence_threshold`
    fn detect(&self, frame: &Frame, confidence_threshold: f32) -> Result<Vec<Detection>>;
}

/// Geometric fallback: binarize the frame and score external contours.
///
/// Needs no trained parameters and is deterministic for a given frame and
/// configuration.
pub struct HeuristicContourDetector {
    pipeline: FilterPipeline,
    config: FilterConfig,
}

impl HeuristicContourDetector {
    pub fn new(config: FilterConfig) -> Self {
        Self::with_pipeline(FilterPipeline::new(), config)
    }

    pub fn with_pipeline(pipeline: FilterPipeline, config: FilterConfig) -> Self {
        Self { pipeline, config }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: FilterConfig) {
        self.config = config;
    }

    pub fn pipeline(&self) -> &FilterPipeline {
        &self.pipeline
    }
}

impl Default for HeuristicContourDetector {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}

impl Detector for HeuristicContourDetector {
    fn name(&self) -> &str {
        "heuristic-contours"
    }

    fn detect(&self, frame: &Frame, confidence_threshold: f32) -> Result<Vec<Detection>> {
        let binary = self.pipeline.binarize(frame, &self.config);
        Ok(contours::find_regions(&binary, confidence_threshold))
    }
}

/// Picks exactly one detection path per frame.
///
/// With a model available and attached, the external detector runs with
/// [`MODEL_CONFIDENCE_THRESHOLD`]; otherwise the heuristic detector runs
/// with the visualization threshold. Failures yield zero detections.
pub struct DetectionOrchestrator {
    model: Option<Box<dyn Detector>>,
    heuristic: HeuristicContourDetector,
}

impl DetectionOrchestrator {
    pub fn new(heuristic: HeuristicContourDetector) -> Self {
        Self { model: None, heuristic }
    }

    pub fn with_model(mut self, model: Box<dyn Detector>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn heuristic(&self) -> &HeuristicContourDetector {
        &self.heuristic
    }

    pub fn heuristic_mut(&mut self) -> &mut HeuristicContourDetector {
        &mut self.heuristic
    }

    /// The detector that runs for `state`, with the threshold it gets
    pub fn active_detector(&self, state: DetectionState, visual: &VisualizationConfig) -> (&dyn Detector, f32) {
        match &self.model {
            Some(model) if state.model_available => (model.as_ref() as &dyn Detector, MODEL_CONFIDENCE_THRESHOLD),
            _ => {
                if state.model_available {
                    log::warn!("model reported available but none is attached, using heuristic detector");
                }
                (&self.heuristic as &dyn Detector, visual.confidence_threshold)
            }
        }
    }

    pub fn detect(&self, frame: &Frame, state: DetectionState, visual: &VisualizationConfig) -> Vec<Detection> {
        let (detector, threshold) = self.active_detector(state, visual);
        match detector.detect(frame, threshold) {
            Ok(detections) => {
                log::debug!("{}: {} detections", detector.name(), detections.len());
                detections
            }
            Err(e) => {
                log::warn!("{} detection failed: {:#}", detector.name(), e);
                Vec::new()
            }
        }
    }
}

impl Default for DetectionOrchestrator {
    fn default() -> Self {
        Self::new(HeuristicContourDetector::default())
    }
}
