pub mod font;

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::config::VisualizationConfig;
use crate::models::{AnnotatedFrame, BoundingBox, Detection, Frame};

/// Arm length of the L-shaped corner accents
pub const CORNER_ARM_LENGTH: i32 = 20;
/// Label baseline sits this far above the box...
pub const LABEL_OFFSET_ABOVE: i32 = 10;
/// ...or this far below its top edge when there is no room above
pub const LABEL_OFFSET_BELOW: i32 = 25;
/// Total padding added around the label text
pub const LABEL_PADDING: i32 = 10;

/// Draw detections onto an RGB copy of the frame.
///
/// Each detection is drawn independently; the frame and detections are
/// left untouched.
pub fn render(frame: &Frame, detections: &[Detection], config: &VisualizationConfig) -> AnnotatedFrame {
    let mut canvas = frame.to_rgb8();
    for detection in detections {
        draw_detection(&mut canvas, detection, config);
    }
    canvas
}

/// Intersect a box with the frame rectangle, None if nothing is left
pub fn clamp_to_frame(bbox: &BoundingBox, width: u32, height: u32) -> Option<BoundingBox> {
    let frame = BoundingBox::new(0, 0, width as i32, height as i32);
    let clamped = bbox.intersect(&frame);
    if clamped.is_empty() { None } else { Some(clamped) }
}

/// Label text: class name, integer percentage, or both joined by ": "
pub fn label_text(detection: &Detection, config: &VisualizationConfig) -> Option<String> {
    let percent = format!("{}%", (detection.confidence * 100.0) as i32);
    match (config.show_labels, config.show_confidence) {
        (true, true) => Some(format!("{}: {}", detection.class_name, percent)),
        (true, false) => Some(detection.class_name.clone()),
        (false, true) => Some(percent),
        (false, false) => None,
    }
}

/// Baseline anchor for a label `text_height` pixels tall attached to `bbox`.
///
/// The label sits above the box unless its padded top would leave the frame,
/// in which case it moves inside the box below the top edge.
pub fn label_anchor(bbox: &BoundingBox, text_height: u32) -> (i32, i32) {
    let above = bbox.y - LABEL_OFFSET_ABOVE;
    let label_top = above - text_height as i32 - LABEL_PADDING / 2;
    if label_top < 0 {
        (bbox.x, bbox.y + LABEL_OFFSET_BELOW)
    } else {
        (bbox.x, above)
    }
}

fn draw_detection(canvas: &mut RgbImage, detection: &Detection, config: &VisualizationConfig) {
    let Some(bbox) = clamp_to_frame(&detection.bbox, canvas.width(), canvas.height()) else {
        log::debug!("skipping detection outside frame: {:?}", detection.bbox);
        return;
    };
    let box_color = Rgb(config.box_color);
    // Anything thicker than the frame paints the same pixels
    let max_thickness = canvas.width().max(canvas.height()).min(i32::MAX as u32 - 1) as i32;
    let thickness = config.box_thickness.clamp(1, max_thickness);

    if config.show_boxes {
        draw_box(canvas, &bbox, box_color, thickness);
        draw_corner_accents(canvas, &bbox, box_color, thickness + 1);
    }

    if let Some(text) = label_text(detection, config) {
        draw_label(canvas, &bbox, &text, config);
    }
}

// Lines grow inward so the outline stays inside the box
fn draw_box(canvas: &mut RgbImage, bbox: &BoundingBox, color: Rgb<u8>, thickness: i32) {
    for inset in 0..thickness {
        let w = bbox.width - 2 * inset;
        let h = bbox.height - 2 * inset;
        if w <= 0 || h <= 0 {
            break;
        }
        let rect = Rect::at(bbox.x + inset, bbox.y + inset).of_size(w as u32, h as u32);
        draw_hollow_rect_mut(canvas, rect, color);
    }
}

fn draw_corner_accents(canvas: &mut RgbImage, bbox: &BoundingBox, color: Rgb<u8>, thickness: i32) {
    let arm = CORNER_ARM_LENGTH;
    let (left, top) = (bbox.x, bbox.y);
    let (right, bottom) = (bbox.right(), bbox.bottom());

    // (x, y, width, height) of the two arms at each corner
    let arms = [
        (left, top, arm, thickness),
        (left, top, thickness, arm),
        (right - arm, top, arm, thickness),
        (right - thickness, top, thickness, arm),
        (left, bottom - thickness, arm, thickness),
        (left, bottom - arm, thickness, arm),
        (right - arm, bottom - thickness, arm, thickness),
        (right - thickness, bottom - arm, thickness, arm),
    ];

    for (x, y, w, h) in arms {
        // Accents never leave the (already clamped) box
        let arm_rect = BoundingBox::new(x, y, w, h).intersect(bbox);
        if arm_rect.is_empty() {
            continue;
        }
        let rect = Rect::at(arm_rect.x, arm_rect.y).of_size(arm_rect.width as u32, arm_rect.height as u32);
        draw_filled_rect_mut(canvas, rect, color);
    }
}

fn draw_label(canvas: &mut RgbImage, bbox: &BoundingBox, text: &str, config: &VisualizationConfig) {
    let (text_w, text_h) = font::text_size(text, config.font_scale);
    let (anchor_x, anchor_y) = label_anchor(bbox, text_h);
    let half_pad = LABEL_PADDING / 2;

    let background = Rect::at(anchor_x, anchor_y - text_h as i32 - half_pad).of_size(
        text_w.saturating_add(LABEL_PADDING as u32),
        text_h + LABEL_PADDING as u32,
    );
    draw_filled_rect_mut(canvas, background, Rgb(config.box_color));

    font::draw_text(
        canvas,
        anchor_x + half_pad,
        anchor_y - text_h as i32,
        text,
        config.font_scale,
        Rgb(config.text_color),
    );
}
