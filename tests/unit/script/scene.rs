use super::*;

const MINIMAL: &str = r#"{
    "sprite": {"width": 8, "height": 8},
    "action": {"kind": "delay", "duration": 100}
}"#;

#[test]
fn defaults_fill_in() {
    let script = Script::from_json_str(MINIMAL).unwrap();
    assert_eq!(script.tick_ms, 16);
    assert_eq!(script.max_ticks, 10_000);
    assert_eq!(script.sprite.color, [255, 255, 255, 255]);
    assert_eq!(script.sprite.position, [0.0, 0.0]);
    assert_eq!(script.canvas, CanvasDef::default());
    script.validate().unwrap();
}

#[test]
fn validation_rejects_degenerate_values() {
    let mut script = Script::from_json_str(MINIMAL).unwrap();
    script.tick_ms = 0;
    assert!(matches!(script.validate(), Err(KinemaError::Config(_))));

    let mut script = Script::from_json_str(MINIMAL).unwrap();
    script.sprite.width = 0;
    let err = script.validate().unwrap_err();
    assert!(err.to_string().contains("sprite.width"));

    let mut script = Script::from_json_str(MINIMAL).unwrap();
    script.sprite.position = [f64::NAN, 0.0];
    assert!(script.validate().is_err());
}

#[test]
fn parse_errors_are_config_errors() {
    let err = Script::from_json_str(r#"{"sprite": {"width": 1, "height": 1}}"#).unwrap_err();
    assert!(err.to_string().starts_with("configuration error: parse script"));
    assert!(Script::from_json_str(r#"{"sprite": {"width": 1, "height": 1, "depth": 2}, "action": {"kind": "end"}}"#).is_err());
}

#[test]
fn missing_file_carries_the_path() {
    let err = Script::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
    assert!(format!("{err:#}").contains("here.json"));
}
