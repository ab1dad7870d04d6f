use super::*;

#[test]
fn manual_clock_moves_only_when_told() {
    let clock = ManualClock::new(5);
    assert_eq!(clock.now_ms(), 5);
    clock.advance(10);
    assert_eq!(clock.now_ms(), 15);
    clock.set(3);
    assert_eq!(clock.now_ms(), 3);
}

#[test]
fn paused_game_clock_stands_still() {
    let clock = GameClock::new();
    clock.pause();
    assert!(clock.is_paused());
    let frozen = clock.now_ms();
    std::thread::sleep(std::time::Duration::from_millis(5));
    assert_eq!(clock.now_ms(), frozen);
    clock.resume();
    assert!(!clock.is_paused());
    assert!(clock.now_ms() >= frozen);
    assert!(clock.now_ms() < frozen + 1_000);
}

#[test]
fn offset_never_underflows() {
    let clock = GameClock::new();
    clock.offset_by(u64::MAX);
    assert_eq!(clock.now_ms(), 0);
}

#[test]
fn shared_clock_is_a_trait_object() {
    let manual = Rc::new(ManualClock::new(0));
    let shared: SharedClock = manual.clone();
    manual.set(42);
    assert_eq!(shared.now_ms(), 42);
}
