use super::*;
use crate::action::model::ActionKind;

fn def(json: &str) -> ActionDef {
    serde_json::from_str(json).expect("valid action json")
}

#[test]
fn builds_leaf_with_timing() {
    let action = def(
        r#"{"kind": "fade_in", "duration": 500, "interval": 20, "total": 3, "interp": "out_quad"}"#,
    )
    .build(&Hooks::new())
    .unwrap();
    let expected = Action::fade_in(500)
        .with_interval(20)
        .with_total(Total::Times(3))
        .with_interp(Ease::OutQuad);
    assert_eq!(action, expected);
}

#[test]
fn unknown_parameter_is_a_config_error() {
    let err = def(r#"{"kind": "fade", "params": {"colour": 3}}"#)
        .build(&Hooks::new())
        .unwrap_err();
    assert!(matches!(err, KinemaError::Config(_)));
    assert!(err.to_string().contains("'colour'"));
}

#[test]
fn unknown_kind_and_top_level_field_are_rejected() {
    let err = def(r#"{"kind": "teleport"}"#).build(&Hooks::new()).unwrap_err();
    assert!(err.to_string().starts_with("configuration error:"));
    assert!(serde_json::from_str::<ActionDef>(r#"{"kind": "delay", "speed": 2}"#).is_err());
}

#[test]
fn ranges_accept_pairs_and_bare_ends() {
    let hooks = Hooks::new();
    let pair = def(r#"{"kind": "move_by", "duration": 10, "params": {"range": [[1, 2], [3, 4]]}}"#)
        .build(&hooks)
        .unwrap();
    assert_eq!(
        pair.kind(),
        &ActionKind::Leaf(Leaf::MoveBy(MoveBy {
            range: Span::new(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)),
        }))
    );
    let bare = def(r#"{"kind": "move_by", "duration": 10, "params": {"range": [3, 4]}}"#)
        .build(&hooks)
        .unwrap();
    assert_eq!(bare, Action::move_by(10, Vec2::new(3.0, 4.0)));

    let size = def(r#"{"kind": "scale_to", "duration": 10, "params": {"range": [64, 32]}}"#)
        .build(&hooks)
        .unwrap();
    assert_eq!(size, Action::scale_to(10, crate::Size::new(64.0, 32.0)));

    let partial = def(r#"{"kind": "fade", "params": {"range": [null, 10]}}"#)
        .build(&hooks)
        .unwrap();
    assert_eq!(
        partial.kind(),
        &ActionKind::Leaf(Leaf::Fade(Fade {
            range: Span::to(10.0)
        }))
    );
}

#[test]
fn groups_build_recursively() {
    let action = def(
        r#"{
            "kind": "sequence",
            "total": "infinite",
            "children": [
                {"kind": "delay", "duration": 100},
                {"kind": "delay", "duration": 100},
                {"kind": "parallel", "children": [
                    {"kind": "move_to", "duration": 50, "params": {"range": [5, 5], "anchor": "center"}},
                    {"kind": "shake", "duration": 50, "params": {"dist": [2, 0], "waves": ["saw", "zero"]}}
                ]},
                {"kind": "kill", "params": {"call_end": false}}
            ]
        }"#,
    )
    .build(&Hooks::new())
    .unwrap();
    let expected = (Action::delay(100) * 2
        >> (Action::move_to(50, Point::new(5.0, 5.0), Anchor::Center)
            + Action::leaf(
                50,
                Shake {
                    dist: Vec2::new(2.0, 0.0),
                    waves: (Wave::Saw, Wave::Zero),
                },
            ))
        >> Action::kill_with(false))
    .forever();
    assert_eq!(action, expected);
}

#[test]
fn hooks_resolve_by_name() {
    let hooks = Hooks::new().with_call("ping", |_| Ok(()));
    let action = def(r#"{"kind": "call", "params": {"hook": "ping"}}"#)
        .build(&hooks)
        .unwrap();
    assert_eq!(action.name(), "Call");

    let missing = def(r#"{"kind": "call", "params": {"hook": "pong"}}"#)
        .build(&hooks)
        .unwrap_err();
    assert!(matches!(missing, KinemaError::Config(_)));
    let no_name = def(r#"{"kind": "act", "duration": 5}"#).build(&hooks).unwrap_err();
    assert!(no_name.to_string().contains("requires parameter 'hook'"));
}

#[test]
fn cover_override_and_children_on_leaves() {
    let action = def(r#"{"kind": "move_by", "cover": false, "params": {"range": [1, 1]}}"#)
        .build(&Hooks::new())
        .unwrap();
    assert!(!action.timing().cover);

    let err = def(r#"{"kind": "delay", "children": [{"kind": "delay"}]}"#)
        .build(&Hooks::new())
        .unwrap_err();
    assert!(matches!(err, KinemaError::Config(_)));
}

#[test]
fn bad_parameter_types_are_config_errors() {
    let err = def(r#"{"kind": "flip", "params": {"x": "yes"}}"#)
        .build(&Hooks::new())
        .unwrap_err();
    assert!(err.to_string().starts_with("configuration error: flip.x"));
}

#[test]
fn erase_stamps_a_registered_image() {
    let stamp = crate::Surface::solid(2, 2, [255, 0, 0, 255]);
    let hooks = Hooks::new().with_image("stamp", stamp.clone());
    let json = r#"{"kind": "erase", "duration": 10, "params": {"eraser": "stamp", "fill": false}}"#;
    let action = def(json).build(&hooks).unwrap();
    let ActionKind::Leaf(Leaf::Erase(erase)) = action.kind() else {
        panic!("expected an erase leaf, got {action}");
    };
    assert_eq!(erase.eraser.as_ref(), Some(&stamp));
    assert!(!erase.fill);

    let err = def(json).build(&Hooks::new()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "configuration error: no image registered as 'stamp'"
    );
}
