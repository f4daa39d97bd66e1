use image::{DynamicImage, GrayImage, Luma};
use veinlight::{DetectionOrchestrator, DetectionState, FilterPipeline, FrameProcessor, VisualizationConfig};

// Bright tissue with a few darker, slightly blurred vein-like bands
fn synthetic_nir_frame(width: u32, height: u32) -> GrayImage {
    let veins = [(60.0f32, 0.35f32, 6.0f32), (220.0, -0.2, 5.0), (400.0, 0.1, 7.0)];
    GrayImage::from_fn(width, height, |x, y| {
        let mut value = 190.0 - (y as f32 / height as f32) * 20.0;
        for &(x0, slope, half_width) in &veins {
            let centre = x0 + slope * y as f32;
            let d = (x as f32 - centre).abs();
            if d < half_width {
                value -= 70.0 * (1.0 - d / half_width);
            }
        }
        Luma([value.clamp(0.0, 255.0) as u8])
    })
}

fn main() -> anyhow::Result<()> {
    let frame = DynamicImage::ImageLuma8(synthetic_nir_frame(640, 480));
    frame.save("synthetic_nir.png")?;
    println!("Created synthetic_nir.png (640x480 grayscale)");

    let processor = FrameProcessor::new(DetectionOrchestrator::default(), VisualizationConfig::default());

    let enhanced = FilterPipeline::new().enhance(&frame, processor.filter_config());
    enhanced.save("synthetic_enhanced.png")?;

    let state = DetectionState {
        model_available: false,
        detection_enabled: true,
    };
    let result = processor.process(&frame, state);
    result.image.save("synthetic_detections.png")?;

    println!(
        "{} detections in {:.1} ms (over budget: {})",
        result.detections.len(),
        result.elapsed.as_secs_f64() * 1000.0,
        result.over_budget
    );
    for detection in &result.detections {
        println!("  {:?} confidence {:.2}", detection.bbox, detection.confidence);
    }

    Ok(())
}
