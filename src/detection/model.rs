use anyhow::Result;

use crate::detection::Detector;
use crate::models::{BoundingBox, Detection, Frame};

/// Class name used when the backend returns fewer names than detections
pub const UNKNOWN_CLASS_NAME: &str = "unknown";

/// Raw answer of a learned-model backend, as parallel arrays
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelResponse {
    /// `[x, y, width, height]` per detection
    pub boxes: Vec<[i32; 4]>,
    pub confidences: Vec<f32>,
    pub class_ids: Vec<i32>,
    pub class_names: Vec<String>,
}

impl ModelResponse {
    /// Pair the arrays index-for-index.
    ///
    /// The count is bounded by the shortest of boxes, confidences and class
    /// ids; a missing class name becomes [`UNKNOWN_CLASS_NAME`].
    pub fn into_detections(self) -> Vec<Detection> {
        let count = self
            .boxes
            .len()
            .min(self.confidences.len())
            .min(self.class_ids.len());
        if count != self.boxes.len() || count != self.confidences.len() || count != self.class_ids.len() {
            log::warn!(
                "mismatched model response: {} boxes, {} confidences, {} class ids",
                self.boxes.len(),
                self.confidences.len(),
                self.class_ids.len()
            );
        }

        let mut names = self.class_names.into_iter();
        self.boxes
            .into_iter()
            .zip(self.confidences)
            .zip(self.class_ids)
            .take(count)
            .map(|(([x, y, w, h], confidence), class_id)| Detection {
                bbox: BoundingBox::new(x, y, w, h),
                confidence: confidence.clamp(0.0, 1.0),
                class_id,
                class_name: names.next().unwrap_or_else(|| UNKNOWN_CLASS_NAME.to_string()),
            })
            .collect()
    }
}

/// Contract of the external learned-model service.
///
/// Implementations own model loading and inference; this crate only
/// marshals frames in and [`ModelResponse`]s out.
pub trait ModelBackend: Send {
    /// Backend identifier.
    fn name(&self) -> &str;

    /// Run inference, keeping only detections at or above `confidence_threshold`
    fn infer(&self, frame: &Frame, confidence_threshold: f32) -> Result<ModelResponse>;
}

/// [`Detector`] adapter over a [`ModelBackend`]
pub struct ExternalModelDetector {
    backend: Box<dyn ModelBackend>,
}

impl ExternalModelDetector {
    pub fn new(backend: Box<dyn ModelBackend>) -> Self {
        Self { backend }
    }
}

impl Detector for ExternalModelDetector {
    fn name(&self) -> &str {
        self.backend.name()
    }

    fn detect(&self, frame: &Frame, confidence_threshold: f32) -> Result<Vec<Detection>> {
        let response = self.backend.infer(frame, confidence_threshold)?;
        Ok(response.into_detections())
    }
}
