use image::{GrayImage, imageops};
use imageproc::contours::{BorderType, find_contours};
use std::cmp::Ordering;

use crate::models::{BinaryFrame, Detection, Region};

/// Regions must be strictly larger than this (pixel²)
pub const MIN_REGION_AREA: f64 = 100.0;
/// ... and no larger than this
pub const MAX_REGION_AREA: f64 = 10_000.0;
pub const MIN_ASPECT_RATIO: f64 = 0.2;
pub const MAX_ASPECT_RATIO: f64 = 5.0;
/// Area at which the confidence proxy saturates at 1.0
pub const FULL_CONFIDENCE_AREA: f64 = 1000.0;
pub const MAX_REGIONS: usize = 10;

pub const REGION_CLASS_ID: i32 = 0;
pub const REGION_CLASS_NAME: &str = "vein";

/// Trace the outermost borders of the foreground (non-zero) components.
///
/// Components touching the frame edge are traced like any other.
pub fn trace_regions(binary: &GrayImage) -> Vec<Region> {
    if binary.width() == 0 || binary.height() == 0 {
        return Vec::new();
    }

    // Outer borders only start next to a background pixel, so give every
    // component one by padding with a zero border
    let mut padded = GrayImage::new(binary.width() + 2, binary.height() + 2);
    imageops::replace(&mut padded, binary, 1, 1);

    find_contours::<u32>(&padded)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .filter_map(|c| {
            let points: Vec<(u32, u32)> = c.points.iter().map(|p| (p.x - 1, p.y - 1)).collect();
            Region::from_points(&points)
        })
        .collect()
}

pub fn is_vein_shaped(region: &Region) -> bool {
    let aspect = region.aspect_ratio();
    region.area > MIN_REGION_AREA
        && region.area <= MAX_REGION_AREA
        && (MIN_ASPECT_RATIO..=MAX_ASPECT_RATIO).contains(&aspect)
}

/// Monotonic size proxy, not a calibrated probability
pub fn region_confidence(region: &Region) -> f32 {
    (region.area / FULL_CONFIDENCE_AREA).min(1.0) as f32
}

/// Extract vein candidates from a binary frame.
///
/// Admits regions by area and aspect ratio, keeps those whose confidence is
/// strictly above `confidence_threshold`, and returns at most
/// [`MAX_REGIONS`] of them ordered by descending confidence.
pub fn find_regions(binary: &BinaryFrame, confidence_threshold: f32) -> Vec<Detection> {
    if binary.width() == 0 || binary.height() == 0 {
        log::warn!("find_regions: empty binary frame");
        return Vec::new();
    }

    let regions = trace_regions(binary);
    let traced = regions.len();

    let mut detections: Vec<Detection> = regions
        .iter()
        .filter(|r| is_vein_shaped(r))
        .map(|r| Detection {
            bbox: r.bounding_box(),
            confidence: region_confidence(r),
            class_id: REGION_CLASS_ID,
            class_name: REGION_CLASS_NAME.to_string(),
        })
        .filter(|d| d.confidence > confidence_threshold)
        .collect();

    // Stable, so equal confidences keep trace order
    detections.sort_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap_or(Ordering::Equal));
    detections.truncate(MAX_REGIONS);

    log::debug!("traced {} regions, kept {}", traced, detections.len());
    detections
}
