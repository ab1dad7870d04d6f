use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Monotonic millisecond time source driving every action manager.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

pub type SharedClock = Rc<dyn Clock>;

/// Wall clock that can be paused; paused time is subtracted from every later reading.
#[derive(Debug)]
pub struct GameClock {
    origin: Instant,
    offset_ms: Cell<u64>,
    paused_at: Cell<Option<u64>>,
}

impl GameClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_ms: Cell::new(0),
            paused_at: Cell::new(None),
        }
    }

    fn raw_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    pub fn pause(&self) {
        if self.paused_at.get().is_none() {
            self.paused_at.set(Some(self.raw_ms()));
        }
    }

    pub fn resume(&self) {
        if let Some(at) = self.paused_at.take() {
            self.offset_by(self.raw_ms().saturating_sub(at));
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.get().is_some()
    }

    /// Discount `ms` of elapsed time, e.g. a stall the game should not see.
    pub fn offset_by(&self, ms: u64) {
        self.offset_ms.set(self.offset_ms.get().saturating_add(ms));
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for GameClock {
    fn now_ms(&self) -> u64 {
        let raw = self.paused_at.get().unwrap_or_else(|| self.raw_ms());
        raw.saturating_sub(self.offset_ms.get())
    }
}

/// Clock advanced explicitly; used for deterministic playback and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/clock.rs"]
mod tests;
