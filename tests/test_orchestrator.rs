//! Integration tests for detector selection and model response handling.

mod common;

use common::*;
use veinlight::ExternalModelDetector;
use veinlight::detection::model::UNKNOWN_CLASS_NAME;

fn model_state(model_available: bool) -> DetectionState {
    DetectionState {
        model_available,
        detection_enabled: true,
    }
}

#[test]
fn test_missing_class_names_become_unknown() {
    let detections = model_response(3, &["vein", "artery"]).into_detections();

    assert_eq!(detections.len(), 3);
    assert_eq!(detections[0].class_name, "vein");
    assert_eq!(detections[1].class_name, "artery");
    assert_eq!(detections[2].class_name, UNKNOWN_CLASS_NAME);
    assert_eq!(detections[2].class_id, 2);
    assert_eq!(detections[2].bbox, BoundingBox::new(50, 10, 15, 30));
}

#[test]
fn test_response_pairs_by_shortest_array() {
    let mut response = model_response(3, &["vein", "vein", "vein"]);
    response.confidences.truncate(2);

    let detections = response.into_detections();

    assert_eq!(detections.len(), 2);
    assert!((detections[1].confidence - 0.8).abs() < 1e-6);
}

#[test]
fn test_model_path_used_when_available() {
    let backend = FixedBackend {
        response: model_response(2, &["vein", "vein"]),
    };
    let orchestrator =
        DetectionOrchestrator::default().with_model(Box::new(ExternalModelDetector::new(Box::new(backend))));
    let frame = solid_frame(100, 100, 128);

    let detections = orchestrator.detect(&frame, model_state(true), &VisualizationConfig::default());

    assert_eq!(detections.len(), 2);
}

#[test]
fn test_heuristic_path_used_when_model_unavailable() {
    let backend = FixedBackend {
        response: model_response(2, &["vein", "vein"]),
    };
    let orchestrator =
        DetectionOrchestrator::default().with_model(Box::new(ExternalModelDetector::new(Box::new(backend))));
    let visual = VisualizationConfig::default();

    // Uniform frame: the heuristic finds nothing, the model would have found two
    let detections = orchestrator.detect(&solid_frame(100, 100, 128), model_state(false), &visual);
    assert!(detections.is_empty());

    let (detector, threshold) = orchestrator.active_detector(model_state(false), &visual);
    assert_eq!(detector.name(), "heuristic-contours");
    assert_eq!(threshold, visual.confidence_threshold);
}

#[test]
fn test_model_threshold_is_fixed() {
    let backend = FixedBackend {
        response: ModelResponse::default(),
    };
    let orchestrator =
        DetectionOrchestrator::default().with_model(Box::new(ExternalModelDetector::new(Box::new(backend))));
    let visual = VisualizationConfig {
        confidence_threshold: 0.9,
        ..VisualizationConfig::default()
    };

    let (detector, threshold) = orchestrator.active_detector(model_state(true), &visual);

    assert_eq!(detector.name(), "fixed");
    assert_eq!(threshold, veinlight::config::MODEL_CONFIDENCE_THRESHOLD);
}

#[test]
fn test_model_failure_yields_no_detections() {
    let orchestrator = DetectionOrchestrator::default()
        .with_model(Box::new(ExternalModelDetector::new(Box::new(FailingBackend))));

    let detections = orchestrator.detect(&single_vein_frame(), model_state(true), &VisualizationConfig::default());

    assert!(detections.is_empty());
}

#[test]
fn test_available_flag_without_model_falls_back() {
    let mut orchestrator = DetectionOrchestrator::default();
    orchestrator
        .heuristic_mut()
        .set_config(FilterConfig::default().without_enhancement());

    let detections = orchestrator.detect(&single_vein_frame(), model_state(true), &VisualizationConfig::default());

    assert_eq!(detections.len(), 1);
}

#[test]
fn test_heuristic_detector_on_vein_frame() {
    let detector = HeuristicContourDetector::new(FilterConfig::default().without_enhancement());

    let detections = detector.detect(&single_vein_frame(), 0.5).expect("heuristic detection");

    assert_eq!(detections.len(), 1);
    assert!(detections[0].confidence > 0.5);
}
