use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use tailorx::measure::{MeasurementParams, RandomBodyTypeClassifier};
use tailorx::{
    AnalysisRequest, AnalyzeError, BodyAnalyzer, Gender, GarmentMeasurementEngine,
    MeasurementKind, PoseDetector, RecordedPoseDetector,
};

fn testdata_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../testdata")
        .join(name)
}

fn analyzer() -> BodyAnalyzer<RecordedPoseDetector, RandomBodyTypeClassifier> {
    BodyAnalyzer::new(
        RecordedPoseDetector::default(),
        GarmentMeasurementEngine::new(MeasurementParams::default()).expect("default params"),
        RandomBodyTypeClassifier::with_seed(2024),
    )
}

#[test]
fn standing_pose_measurements_at_180_cm() {
    let front = testdata_path("front_standing.json");
    let side = testdata_path("side_standing.json");
    let request = AnalysisRequest::new(Some(front.as_path()), Some(side.as_path()))
        .with_height(180.0)
        .with_gender(Gender::Male);
    let analysis = analyzer().analyze(&request).expect("analysis");

    assert_eq!(analysis.landmarks_detected(), 33);
    assert_relative_eq!(analysis.scale.cm_per_px, 180.0 / 460.0, epsilon = 1e-6);

    let expected = [
        (MeasurementKind::Chest, 78.3),
        (MeasurementKind::ShoulderWidth, 39.1),
        (MeasurementKind::SleeveLength, 58.8),
        (MeasurementKind::TorsoLength, 78.3),
        (MeasurementKind::TopWaist, 62.6),
        (MeasurementKind::PantsWaist, 62.6),
        (MeasurementKind::Hip, 68.9),
        (MeasurementKind::LegLength, 66.5),
        (MeasurementKind::Rise, 78.3),
        (MeasurementKind::Thigh, 63.5),
    ];
    for (kind, value) in expected {
        let m = analysis.measurements.get(kind).expect("measurement present");
        assert_relative_eq!(m.value, value, epsilon = 1e-4);
    }
    assert!(analysis.body_type.body_type.is_valid_for(Gender::Male));
    assert_eq!(analysis.side_landmarks.len(), 10);
}

#[test]
fn normalized_capture_matches_pixel_capture() {
    let pixel = RecordedPoseDetector::default()
        .detect(&testdata_path("front_standing.json"))
        .expect("pixel capture");
    let normalized = RecordedPoseDetector::default()
        .detect(&testdata_path("front_standing_normalized.json"))
        .expect("normalized capture");
    assert_eq!(pixel.len(), normalized.len());
    for (a, b) in pixel.iter().zip(normalized.iter()) {
        assert_eq!(a.id, b.id);
        assert_relative_eq!(a.position.x, b.position.x, epsilon = 1e-3);
        assert_relative_eq!(a.position.y, b.position.y, epsilon = 1e-3);
    }
}

#[test]
fn no_person_is_a_successful_empty_response() {
    let front = testdata_path("no_person.json");
    let side = testdata_path("side_standing.json");
    let response = analyzer().respond(&AnalysisRequest::new(
        Some(front.as_path()),
        Some(side.as_path()),
    ));

    assert!(response.success);
    assert_eq!(response.landmarks_detected, Some(0));
    assert!(response.polera_measurements.as_ref().is_some_and(|m| m.is_empty()));
    assert!(response.pantalon_measurements.as_ref().is_some_and(|m| m.is_empty()));
    assert!(response.body_type.is_some());
    assert_eq!(response.message, "Sistema calculó 0 medidas polera y 0 medidas pantalón");
}

#[test]
fn low_detection_score_counts_as_no_person() {
    let front = testdata_path("low_score.json");
    let side = testdata_path("side_standing.json");
    let analysis = analyzer()
        .analyze(&AnalysisRequest::new(Some(front.as_path()), Some(side.as_path())))
        .expect("analysis");
    assert_eq!(analysis.landmarks_detected(), 0);
}

#[test]
fn five_landmarks_are_too_few() {
    let front = testdata_path("five_points.json");
    let side = testdata_path("side_standing.json");
    let response = analyzer().respond(&AnalysisRequest::new(
        Some(front.as_path()),
        Some(side.as_path()),
    ));

    assert!(response.success);
    assert_eq!(response.landmarks_detected, Some(5));
    assert_eq!(response.polera_measurements.map(|m| m.len()), Some(0));
    assert_eq!(response.pantalon_measurements.map(|m| m.len()), Some(0));
}

#[test]
fn missing_side_image_is_input_missing() {
    let front = testdata_path("front_standing.json");
    let response = analyzer().respond(&AnalysisRequest::new(Some(front.as_path()), None));

    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("input_missing"));
    assert!(response.polera_measurements.is_none());
}

#[test]
fn unreadable_capture_is_processing_error() {
    let front = testdata_path("does_not_exist.json");
    let side = testdata_path("side_standing.json");
    let request = AnalysisRequest::new(Some(front.as_path()), Some(side.as_path()));
    let err = analyzer().analyze(&request).expect_err("missing file");
    assert!(matches!(err, AnalyzeError::Detector(_)));
    assert_eq!(err.category(), "processing_error");
}

#[test]
fn response_json_shape() {
    let front = testdata_path("front_standing.json");
    let side = testdata_path("side_standing.json");
    let response = analyzer().respond(
        &AnalysisRequest::new(Some(front.as_path()), Some(side.as_path()))
            .with_gender(Gender::Female),
    );
    let json = serde_json::to_value(&response).expect("serialize");

    assert_eq!(json["success"], true);
    assert_eq!(json["landmarks_detected"], 33);
    assert_eq!(json["polera_measurements"]["pecho_polera"]["category"], "polera");
    assert_eq!(json["pantalon_measurements"]["largo_tiro"]["confidence"], 0.7f32 as f64);
    assert_eq!(
        json["body_type"]["characteristic"],
        "Proporciones detectadas por IA"
    );
    assert_eq!(
        json["clothing_recommendations"].as_array().map(|a| a.len()),
        Some(4)
    );
    assert!(json.get("error").is_none());
    assert_eq!(json["message"], "Sistema calculó 5 medidas polera y 5 medidas pantalón");
}

#[test]
fn analyzer_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BodyAnalyzer<RecordedPoseDetector, RandomBodyTypeClassifier>>();
}
