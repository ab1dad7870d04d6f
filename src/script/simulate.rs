use std::rc::Rc;

use image::{Rgba, RgbaImage};

use crate::foundation::core::Point;
use crate::foundation::error::KinemaResult;
use crate::runtime::clock::{ManualClock, SharedClock};
use crate::runtime::manager::PlayState;
use crate::runtime::sprite::ActionSprite;
use crate::script::hooks::Hooks;
use crate::script::scene::{CanvasDef, Script};
use crate::visual::ops;
use crate::visual::surface::Surface;

/// Observable sprite state after one tick.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TickRecord {
    pub tick: u64,
    pub t_ms: u64,
    /// `[x0, y0, x1, y1]`.
    pub rect: [f64; 4],
    pub size: [u32; 2],
    pub alpha: u8,
    pub state: Option<PlayState>,
    pub alive: bool,
    pub ended: bool,
}

/// Plays a [`Script`] on a manual clock, one fixed tick at a time.
pub struct Simulation {
    clock: Rc<ManualClock>,
    sprite: ActionSprite,
    canvas: CanvasDef,
    tick_ms: u64,
    max_ticks: u64,
    tick: u64,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("canvas", &self.canvas)
            .field("tick_ms", &self.tick_ms)
            .field("max_ticks", &self.max_ticks)
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn new(script: &Script, hooks: &Hooks) -> KinemaResult<Self> {
        script.validate()?;
        let action = script.action.build(hooks)?;
        tracing::debug!(action = %action, "script built");

        let clock = Rc::new(ManualClock::new(0));
        let shared: SharedClock = clock.clone();
        let [x, y] = script.sprite.position;
        let image = Surface::solid(script.sprite.width, script.sprite.height, script.sprite.color);
        let mut sprite = ActionSprite::new(image, Point::new(x, y), shared);
        sprite.act(action, None)?;

        Ok(Self {
            clock,
            sprite,
            canvas: script.canvas.clone(),
            tick_ms: script.tick_ms,
            max_ticks: script.max_ticks,
            tick: 0,
        })
    }

    pub fn sprite(&self) -> &ActionSprite {
        &self.sprite
    }

    /// Time of the next tick.
    pub fn next_ms(&self) -> u64 {
        self.tick.saturating_mul(self.tick_ms)
    }

    pub fn is_finished(&self) -> bool {
        self.tick >= self.max_ticks
            || !self.sprite.is_alive()
            || self.sprite.is_ended()
            || !self.sprite.is_acting()
    }

    pub fn step(&mut self) -> KinemaResult<TickRecord> {
        let t_ms = self.next_ms();
        self.clock.set(t_ms);
        self.sprite.update()?;
        let record = self.record(t_ms);
        self.tick += 1;
        Ok(record)
    }

    /// Step until finished, handing every record to `observe`.
    pub fn run(&mut self, mut observe: impl FnMut(&TickRecord)) -> KinemaResult<u64> {
        while !self.is_finished() {
            let record = self.step()?;
            observe(&record);
        }
        Ok(self.tick)
    }

    /// Step every tick scheduled at or before `t_ms`.
    pub fn advance_to(&mut self, t_ms: u64) -> KinemaResult<()> {
        while !self.is_finished() && self.next_ms() <= t_ms {
            self.step()?;
        }
        Ok(())
    }

    /// Draw the sprite's live state onto the canvas background.
    pub fn render(&self) -> RgbaImage {
        let mut canvas = RgbaImage::from_pixel(
            self.canvas.width,
            self.canvas.height,
            Rgba(self.canvas.background),
        );
        if self.sprite.is_alive() {
            let visual = self.sprite.visual();
            ops::stamp(&mut canvas, &visual.image.to_rgba8(), visual.rect.origin());
        }
        canvas
    }

    fn record(&self, t_ms: u64) -> TickRecord {
        let visual = self.sprite.visual();
        let r = visual.rect;
        TickRecord {
            tick: self.tick,
            t_ms,
            rect: [r.x0, r.y0, r.x1, r.y1],
            size: [visual.image.width(), visual.image.height()],
            alpha: visual.image.alpha(),
            state: self.sprite.state(),
            alive: self.sprite.is_alive(),
            ended: self.sprite.is_ended(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/simulate.rs"]
mod tests;
