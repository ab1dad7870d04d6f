use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::foundation::core::{Point, Vec2};
use crate::runtime::clock::ManualClock;
use crate::visual::surface::Surface;

#[derive(Default)]
struct Puppet {
    live: Option<Visual>,
    killed: bool,
}

impl Actor for Puppet {
    fn base(&self) -> Visual {
        Visual::at(Surface::solid(2, 2, [0, 0, 255, 255]), Point::new(1.0, 1.0))
    }

    fn present(&mut self, visual: Visual) {
        self.live = Some(visual);
    }

    fn kill(&mut self) {
        self.killed = true;
    }

    fn end(&mut self) {}
}

fn counting_end_hook() -> (EndHook, Rc<Cell<u32>>) {
    let calls = Rc::new(Cell::new(0));
    let c = calls.clone();
    let hook = EndHook::new(move |_, _| {
        c.set(c.get() + 1);
        Ok(())
    });
    (hook, calls)
}

fn live_x(puppet: &Puppet) -> f64 {
    puppet.live.as_ref().map(|v| v.rect.x0).unwrap_or(f64::NAN)
}

#[test]
fn first_update_starts_the_clock() {
    let clock = Rc::new(ManualClock::new(1_000));
    let mut m = ActionManager::new(Action::move_by(100, Vec2::new(10.0, 0.0)), None, clock.clone());
    let mut puppet = Puppet::default();
    assert_eq!(m.state(), PlayState::Pending);

    assert_eq!(m.update(&mut puppet).unwrap(), PlayState::Running);
    assert_eq!(live_x(&puppet), 1.0);
    clock.set(1_050);
    m.update(&mut puppet).unwrap();
    assert_eq!(live_x(&puppet), 6.0);
    clock.set(1_100);
    assert_eq!(m.update(&mut puppet).unwrap(), PlayState::Completed);
    assert_eq!(live_x(&puppet), 11.0);
}

#[test]
fn end_hook_fires_once_after_completion() {
    let clock = Rc::new(ManualClock::new(0));
    let (hook, calls) = counting_end_hook();
    let mut m = ActionManager::new(Action::delay(10), Some(hook), clock.clone());
    let mut puppet = Puppet::default();
    m.update(&mut puppet).unwrap();
    assert_eq!(calls.get(), 0);
    clock.set(10);
    m.update(&mut puppet).unwrap();
    clock.set(20);
    m.update(&mut puppet).unwrap();
    assert_eq!(calls.get(), 1);
}

#[test]
fn covers_persist_after_completion() {
    let clock = Rc::new(ManualClock::new(0));
    let mut m = ActionManager::new(Action::move_by(0, Vec2::new(3.0, 0.0)), None, clock);
    let mut puppet = Puppet::default();
    assert_eq!(m.update(&mut puppet).unwrap(), PlayState::Completed);
    puppet.live = None;
    m.update(&mut puppet).unwrap();
    assert_eq!(live_x(&puppet), 4.0);

    m.clear_cover();
    m.update(&mut puppet).unwrap();
    assert_eq!(live_x(&puppet), 1.0);
}

#[test]
fn kill_runs_the_end_hook_once_and_detaches() {
    let clock = Rc::new(ManualClock::new(0));
    let (hook, calls) = counting_end_hook();
    let mut m = ActionManager::new(Action::delay(0) >> Action::kill(), Some(hook), clock);
    let mut puppet = Puppet::default();
    assert_eq!(m.update(&mut puppet).unwrap(), PlayState::Killed);
    assert!(puppet.killed);
    assert_eq!(calls.get(), 1);
    assert!(m.state().is_detached());
    m.update(&mut puppet).unwrap();
    assert_eq!(calls.get(), 1);
}

#[test]
fn silent_kill_skips_the_end_hook() {
    let clock = Rc::new(ManualClock::new(0));
    let (hook, calls) = counting_end_hook();
    let mut m = ActionManager::new(Action::kill_with(false), Some(hook), clock);
    let mut puppet = Puppet::default();
    m.update(&mut puppet).unwrap();
    assert!(puppet.killed);
    assert_eq!(calls.get(), 0);
}

#[test]
fn recover_replays_covering_leaves() {
    let clock = Rc::new(ManualClock::new(0));
    let root = Action::fade(50, 255.0, 90.0)
        >> Action::delay(10)
        >> Action::move_by(10, Vec2::new(5.0, 0.0)) * 2;
    let mut m = ActionManager::new(root, None, clock);
    let puppet = Puppet::default();
    m.recover(&puppet.base()).unwrap();
    assert_eq!(m.covers().len(), 3);
    let v = m.compose(&puppet).unwrap();
    assert_eq!(v.image.alpha(), 90);
    assert_eq!(v.rect.x0, 11.0);
    assert_eq!(m.leaves().len(), 3);
}

#[test]
fn failing_end_hook_is_reported() {
    let clock = Rc::new(ManualClock::new(0));
    let hook = EndHook::new(|_, _| Err(anyhow::anyhow!("no")));
    let mut m = ActionManager::new(Action::delay(0), Some(hook), clock);
    let mut puppet = Puppet::default();
    let err = m.update(&mut puppet).unwrap_err();
    assert!(err.is_callback());
}
