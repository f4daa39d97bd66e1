pub mod config;
pub mod detection;
pub mod models;
pub mod overlay;
pub mod pipeline;
pub mod processor;

pub use config::{AppConfig, DetectionState, FilterConfig, MorphologyOperation, VisualizationConfig};
pub use detection::{
    DetectionOrchestrator, Detector, ExternalModelDetector, HeuristicContourDetector, ModelBackend, ModelResponse,
};
pub use models::{AnnotatedFrame, BinaryFrame, BoundingBox, Detection, EnhancedFrame, Frame, Region};
pub use overlay::render;
pub use pipeline::{FilterPipeline, Pipeline, PipelineContext, PipelineStep, DebugConfig};
pub use processor::{FrameProcessor, ProcessedFrame};
