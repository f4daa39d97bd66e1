mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from veinlight for tests
pub use veinlight::{
    BoundingBox, Detection, DetectionOrchestrator, DetectionState, Detector, FilterConfig, FilterPipeline,
    HeuristicContourDetector, ModelBackend, ModelResponse, VisualizationConfig,
};
