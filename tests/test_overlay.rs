//! Integration tests for the overlay renderer.

mod common;

use common::*;
use image::Rgb;
use veinlight::overlay::{clamp_to_frame, font, label_anchor, label_text, render};

#[test]
fn test_clamp_partially_outside_box() {
    let clamped = clamp_to_frame(&BoundingBox::new(-10, 90, 40, 30), 100, 100);
    assert_eq!(clamped, Some(BoundingBox::new(0, 90, 30, 10)));
}

#[test]
fn test_clamp_rejects_empty_boxes() {
    assert_eq!(clamp_to_frame(&BoundingBox::new(120, 10, 20, 20), 100, 100), None);
    assert_eq!(clamp_to_frame(&BoundingBox::new(-30, 10, 30, 20), 100, 100), None);
    assert_eq!(clamp_to_frame(&BoundingBox::new(10, 10, 0, 20), 100, 100), None);
    assert_eq!(clamp_to_frame(&BoundingBox::new(10, 10, 5, -4), 100, 100), None);
}

#[test]
fn test_clamped_boxes_stay_in_frame() {
    for bbox in [
        BoundingBox::new(-50, -50, 500, 500),
        BoundingBox::new(95, 95, 10, 10),
        BoundingBox::new(0, 0, 100, 100),
    ] {
        let clamped = clamp_to_frame(&bbox, 100, 100).expect("overlaps frame");
        assert!(clamped.x >= 0 && clamped.y >= 0);
        assert!(clamped.right() <= 100 && clamped.bottom() <= 100);
        assert!(!clamped.is_empty());
    }
}

#[test]
fn test_label_text_variants() {
    let detection = detection_at(10, 10, 20, 20, 0.876);
    let mut config = VisualizationConfig::default();

    assert_eq!(label_text(&detection, &config).as_deref(), Some("vein: 87%"));

    config.show_confidence = false;
    assert_eq!(label_text(&detection, &config).as_deref(), Some("vein"));

    config.show_labels = false;
    config.show_confidence = true;
    assert_eq!(label_text(&detection, &config).as_deref(), Some("87%"));

    config.show_confidence = false;
    assert_eq!(label_text(&detection, &config), None);
}

#[test]
fn test_label_anchor_moves_below_near_top_edge() {
    // 7 px text: the padded label spans 12 rows above its baseline
    assert_eq!(label_anchor(&BoundingBox::new(20, 50, 30, 30), 7), (20, 40));
    assert_eq!(label_anchor(&BoundingBox::new(20, 22, 30, 30), 7), (20, 12));
    assert_eq!(label_anchor(&BoundingBox::new(20, 21, 30, 30), 7), (20, 46));
    assert_eq!(label_anchor(&BoundingBox::new(20, 10, 30, 30), 7), (20, 35));
    assert_eq!(label_anchor(&BoundingBox::new(20, 5, 30, 30), 7), (20, 30));
}

#[test]
fn test_label_anchor_accounts_for_text_height() {
    let bbox = BoundingBox::new(0, 40, 30, 30);
    assert_eq!(label_anchor(&bbox, 7), (0, 30));
    assert_eq!(label_anchor(&bbox, 28), (0, 65));
}

fn count_pixels(image: &image::RgbImage, color: [u8; 3]) -> usize {
    image.pixels().filter(|p| p.0 == color).count()
}

#[test]
fn test_label_text_visible_for_boxes_near_top() {
    let frame = solid_frame(100, 80, 0);
    let config = VisualizationConfig {
        show_boxes: false,
        ..VisualizationConfig::default()
    };

    for y in [2, 10, 15, 21, 22, 40] {
        let rendered = render(&frame, &[detection_at(20, y, 40, 30, 0.9)], &config);
        assert!(
            count_pixels(&rendered, config.text_color) > 0,
            "label text hidden for box at y = {}",
            y
        );
    }
}

#[test]
fn test_oversized_style_values_do_not_panic() {
    let frame = solid_frame(60, 40, 0);
    let detections = vec![detection_at(10, 10, 30, 20, 0.9)];

    let thick = VisualizationConfig {
        box_thickness: i32::MAX,
        ..VisualizationConfig::default()
    };
    let rendered = render(&frame, &detections, &thick);
    assert_eq!(rendered.dimensions(), (60, 40));
    assert_eq!(*rendered.get_pixel(25, 20), Rgb(thick.box_color));

    let huge_font = VisualizationConfig {
        font_scale: 1e9,
        ..VisualizationConfig::default()
    };
    let rendered = render(&frame, &detections, &huge_font);
    assert_eq!(rendered.dimensions(), (60, 40));

    let negative = VisualizationConfig {
        box_thickness: -4,
        font_scale: -1.0,
        ..VisualizationConfig::default()
    };
    let rendered = render(&frame, &detections, &negative);
    assert_eq!(*rendered.get_pixel(10, 10), Rgb(negative.box_color));
}

#[test]
fn test_render_without_detections_is_plain_copy() {
    let frame = gradient_rgb_frame(64, 48);
    let rendered = render(&frame, &[], &VisualizationConfig::default());
    assert_eq!(rendered, frame.to_rgb8());
}

#[test]
fn test_render_draws_box_in_box_color() {
    let frame = solid_frame(120, 100, 0);
    let detections = vec![detection_at(40, 40, 34, 17, 0.53)];
    let config = VisualizationConfig::default();

    let rendered = render(&frame, &detections, &config);

    assert_eq!(rendered.dimensions(), (120, 100));
    assert_eq!(*rendered.get_pixel(40, 40), Rgb(config.box_color));
    assert_eq!(*rendered.get_pixel(73, 56), Rgb(config.box_color));
    // Interior is untouched
    assert_eq!(*rendered.get_pixel(56, 48), Rgb([0, 0, 0]));
    // Nothing right of the box on its middle row
    assert_eq!(*rendered.get_pixel(80, 48), Rgb([0, 0, 0]));
}

#[test]
fn test_render_skips_boxes_outside_frame() {
    let frame = gradient_rgb_frame(64, 48);
    let detections = vec![detection_at(100, 100, 20, 20, 0.9), detection_at(-40, 5, 30, 10, 0.9)];

    let rendered = render(&frame, &detections, &VisualizationConfig::default());

    assert_eq!(rendered, frame.to_rgb8());
}

#[test]
fn test_render_clips_partial_boxes() {
    let frame = solid_frame(50, 50, 0);
    let detections = vec![detection_at(30, 30, 60, 60, 0.9)];
    let config = VisualizationConfig {
        show_labels: false,
        show_confidence: false,
        ..VisualizationConfig::default()
    };

    let rendered = render(&frame, &detections, &config);

    // Clamped box is (30, 30)-(49, 49): its far edges lie on the frame border
    assert_eq!(*rendered.get_pixel(49, 40), Rgb(config.box_color));
    assert_eq!(*rendered.get_pixel(40, 49), Rgb(config.box_color));
    assert_eq!(*rendered.get_pixel(20, 20), Rgb([0, 0, 0]));
}

#[test]
fn test_render_all_toggles_off_draws_nothing() {
    let frame = gradient_rgb_frame(64, 48);
    let config = VisualizationConfig {
        show_boxes: false,
        show_labels: false,
        show_confidence: false,
        ..VisualizationConfig::default()
    };

    let rendered = render(&frame, &[detection_at(10, 10, 20, 20, 0.9)], &config);

    assert_eq!(rendered, frame.to_rgb8());
}

#[test]
fn test_render_leaves_detections_untouched() {
    let detections = vec![detection_at(-5, 10, 40, 20, 0.7)];
    let before = detections.clone();

    render(&solid_frame(60, 60, 30), &detections, &VisualizationConfig::default());

    assert_eq!(detections, before);
}

#[test]
fn test_label_background_uses_box_color() {
    let frame = solid_frame(120, 100, 0);
    let config = VisualizationConfig::default();

    let rendered = render(&frame, &[detection_at(40, 40, 34, 17, 0.53)], &config);

    // Baseline at y = 30; the padded background spans y 18..35 from x = 40
    assert_eq!(*rendered.get_pixel(41, 19), Rgb(config.box_color));
}

#[test]
fn test_text_metrics_scale_with_font() {
    assert_eq!(font::text_size("87%", 0.5), (17, 7));
    assert_eq!(font::text_size("87%", 1.0), (34, 14));
    assert_eq!(font::text_size("", 0.5), (0, 7));
}

#[test]
fn test_font_pixel_size_is_bounded() {
    assert_eq!(font::pixel_size(0.0), 1);
    assert_eq!(font::pixel_size(f32::NAN), 1);
    assert_eq!(font::pixel_size(1e9), font::MAX_PIXEL_SIZE);

    let (width, height) = font::text_size("vein: 99%", 1e9);
    assert_eq!(height, 7 * font::MAX_PIXEL_SIZE);
    assert!(width > 0);
}
