use super::*;

fn script(action: &str, tick_ms: u64) -> Script {
    Script::from_json_str(&format!(
        r#"{{
            "sprite": {{"width": 4, "height": 4, "color": [255, 0, 0, 255], "position": [10, 10]}},
            "canvas": {{"width": 32, "height": 32, "background": [0, 0, 0, 255]}},
            "tick_ms": {tick_ms},
            "action": {action}
        }}"#
    ))
    .unwrap()
}

#[test]
fn runs_until_the_action_completes() {
    let s = script(
        r#"{"kind": "move_by", "duration": 100, "params": {"range": [20, 0]}}"#,
        25,
    );
    let mut sim = Simulation::new(&s, &Hooks::new()).unwrap();
    let mut records = Vec::new();
    let ticks = sim.run(|r| records.push(r.clone())).unwrap();
    assert_eq!(ticks, 5);
    let xs: Vec<f64> = records.iter().map(|r| r.rect[0]).collect();
    assert_eq!(xs, [10.0, 15.0, 20.0, 25.0, 30.0]);
    assert_eq!(records[4].state, Some(PlayState::Completed));
    assert!(sim.is_finished());
}

#[test]
fn tick_limit_stops_endless_actions() {
    let mut s = script(r#"{"kind": "remain"}"#, 10);
    s.max_ticks = 7;
    let mut sim = Simulation::new(&s, &Hooks::new()).unwrap();
    assert_eq!(sim.run(|_| {}).unwrap(), 7);
}

#[test]
fn kill_ends_the_simulation() {
    let s = script(
        r#"{"kind": "sequence", "children": [{"kind": "delay", "duration": 30}, {"kind": "kill"}]}"#,
        10,
    );
    let mut sim = Simulation::new(&s, &Hooks::new()).unwrap();
    let mut last = None;
    sim.run(|r| last = Some(r.clone())).unwrap();
    let last = last.unwrap();
    assert_eq!(last.t_ms, 30);
    assert!(!last.alive);
}

#[test]
fn render_draws_the_live_sprite() {
    let s = script(
        r#"{"kind": "fade", "duration": 100, "params": {"range": [255, 0]}}"#,
        50,
    );
    let mut sim = Simulation::new(&s, &Hooks::new()).unwrap();
    sim.advance_to(50).unwrap();
    assert_eq!(sim.sprite().image().alpha(), 128);
    let frame = sim.render();
    assert_eq!(frame.dimensions(), (32, 32));
    assert_eq!(frame.get_pixel(0, 0).0, [0, 0, 0, 255]);
    let px = frame.get_pixel(11, 11).0;
    assert!(px[0] > 100 && px[0] < 160, "{px:?}");
    assert_eq!(px[3], 255);
}

#[test]
fn same_script_replays_identically() {
    let s = script(
        r#"{"kind": "parallel", "children": [
            {"kind": "scale_by", "duration": 90, "params": {"range": [1, 2]}},
            {"kind": "shake", "duration": 90, "params": {"dist": [3, 1], "waves": ["sin", "cos"]}}
        ]}"#,
        7,
    );
    let collect = || {
        let mut sim = Simulation::new(&s, &Hooks::new()).unwrap();
        let mut out = Vec::new();
        sim.run(|r| out.push(r.clone())).unwrap();
        out
    };
    assert_eq!(collect(), collect());
}
