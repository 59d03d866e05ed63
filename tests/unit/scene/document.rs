use super::*;

fn fixture() -> Scene {
    let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("scene.json");
    Scene::from_path(path).unwrap()
}

#[test]
fn fixture_parses_and_validates() {
    let scene = fixture();
    scene.validate().unwrap();
    let def = scene.def();
    assert_eq!(def.cadence, Fps::new(60, 1).unwrap());
    assert_eq!(def.bindings.len(), 7);
    assert_eq!(def.bindings[3].kind(), "skew");
    assert!(def.bindings[4].needs_velocity());
}

#[test]
fn defaults_fill_missing_sections() {
    let scene = Scene::from_reader(r#"{"bindings":[]}"#.as_bytes()).unwrap();
    assert_eq!(scene.def().cadence, Fps::default());
    assert_eq!(scene.def().initial, ScrollMetrics::default());
    scene.validate().unwrap();
}

#[test]
fn parse_errors_are_serde_errors() {
    let err = Scene::from_reader("{".as_bytes()).unwrap_err();
    assert!(matches!(err, MotionError::Serde(_)));
    let err = Scene::from_reader(r#"{"bindings":[{"kind":"wobble","element":"a"}]}"#.as_bytes())
        .unwrap_err();
    assert!(matches!(err, MotionError::Serde(_)));
}

#[test]
fn rejects_non_monotonic_breakpoints() {
    let json = r#"{"bindings":[{
        "kind":"scroll_progress","element":"a","property":"opacity",
        "input":[0,0.6,0.5],"output":[0,1,0]
    }]}"#;
    let err = Scene::from_reader(json.as_bytes())
        .unwrap()
        .validate()
        .unwrap_err();
    assert!(matches!(err, MotionError::Validation(_)));
    assert!(err.to_string().contains("binding 0 (scroll_progress)"), "{err}");
}

#[test]
fn rejects_two_writers_of_one_property() {
    let json = r#"{"bindings":[
        {"kind":"skew","element":"a"},
        {"kind":"scroll_progress","element":"a","property":"skew_y","input":[0,1],"output":[0,1]}
    ]}"#;
    let err = Scene::from_reader(json.as_bytes())
        .unwrap()
        .validate()
        .unwrap_err();
    assert!(err.to_string().contains("already driven"), "{err}");
}

#[test]
fn rejects_bad_hover_factor_and_empty_rect() {
    let json = r#"{"bindings":[{
        "kind":"hover_distortion","element":"img",
        "rect":{"x0":0,"y0":0,"x1":10,"y1":10},"config":{"factor":1.5}
    }]}"#;
    assert!(Scene::from_reader(json.as_bytes()).unwrap().validate().is_err());

    let json = r#"{"bindings":[{
        "kind":"spotlight","element":"card","rect":{"x0":0,"y0":0,"x1":0,"y1":10}
    }]}"#;
    assert!(Scene::from_reader(json.as_bytes()).unwrap().validate().is_err());
}

#[test]
fn rejects_zero_cadence() {
    let json = r#"{"cadence":{"num":0,"den":1},"bindings":[]}"#;
    let err = Scene::from_reader(json.as_bytes())
        .unwrap()
        .validate()
        .unwrap_err();
    assert!(err.to_string().contains("cadence"), "{err}");
}

#[test]
fn missing_file_is_reported_with_path() {
    let err = Scene::from_path("does/not/exist.json").unwrap_err();
    assert!(err.to_string().contains("does/not/exist.json"), "{err}");
}
