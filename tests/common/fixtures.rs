#![allow(dead_code)]

use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb};
use veinlight::{Frame, ModelBackend, ModelResponse};

pub const BRIGHT: u8 = 200;
pub const DARK: u8 = 50;

/// Uniform single-channel frame
pub fn solid_frame(width: u32, height: u32, value: u8) -> Frame {
    DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([value])))
}

/// Colour gradient, handy for checking grayscale conversion
pub fn gradient_rgb_frame(width: u32, height: u32) -> Frame {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 128u8])
    });
    DynamicImage::ImageRgb8(img)
}

/// Bright background with dark filled rectangles `(x, y, width, height)`
pub fn blob_frame(width: u32, height: u32, blobs: &[(u32, u32, u32, u32)]) -> Frame {
    let img = GrayImage::from_fn(width, height, |px, py| {
        let inside = blobs
            .iter()
            .any(|&(x, y, w, h)| px >= x && px < x + w && py >= y && py < y + h);
        if inside { Luma([DARK]) } else { Luma([BRIGHT]) }
    });
    DynamicImage::ImageLuma8(img)
}

/// Binary mask with filled foreground rectangles `(x, y, width, height)`
pub fn binary_mask(width: u32, height: u32, rects: &[(u32, u32, u32, u32)]) -> GrayImage {
    GrayImage::from_fn(width, height, |px, py| {
        let inside = rects
            .iter()
            .any(|&(x, y, w, h)| px >= x && px < x + w && py >= y && py < y + h);
        if inside { Luma([255]) } else { Luma([0]) }
    })
}

/// Dark elongated blob: 34x17 at (40, 40) in a 120x100 frame
pub fn single_vein_frame() -> Frame {
    blob_frame(120, 100, &[(40, 40, 34, 17)])
}

/// Backend that always answers with the same response
pub struct FixedBackend {
    pub response: ModelResponse,
}

impl ModelBackend for FixedBackend {
    fn name(&self) -> &str {
        "fixed"
    }

    fn infer(&self, _frame: &Frame, _confidence_threshold: f32) -> anyhow::Result<ModelResponse> {
        Ok(self.response.clone())
    }
}

/// Backend whose inference always fails
pub struct FailingBackend;

impl ModelBackend for FailingBackend {
    fn name(&self) -> &str {
        "failing"
    }

    fn infer(&self, _frame: &Frame, _confidence_threshold: f32) -> anyhow::Result<ModelResponse> {
        Err(anyhow::anyhow!("inference backend crashed"))
    }
}

pub fn model_response(count: usize, names: &[&str]) -> ModelResponse {
    ModelResponse {
        boxes: (0..count as i32).map(|i| [10 + i * 20, 10, 15, 30]).collect(),
        confidences: (0..count).map(|i| 0.9 - i as f32 * 0.1).collect(),
        class_ids: (0..count as i32).collect(),
        class_names: names.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn detection_at(x: i32, y: i32, width: i32, height: i32, confidence: f32) -> veinlight::Detection {
    veinlight::Detection {
        bbox: veinlight::BoundingBox::new(x, y, width, height),
        confidence,
        class_id: 0,
        class_name: "vein".to_string(),
    }
}
