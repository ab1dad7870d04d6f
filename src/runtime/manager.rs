use crate::action::cover::{Cover, compose};
use crate::action::model::{Action, EndHook};
use crate::foundation::core::Total;
use crate::foundation::error::KinemaResult;
use crate::runtime::actor::Actor;
use crate::runtime::clock::SharedClock;
use crate::runtime::runner::{Halt, Runner, Step, StepCtx};
use crate::visual::surface::Visual;

/// Lifecycle of one [`ActionManager`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayState {
    /// Attached, waiting for the first update.
    Pending,
    Running,
    /// The root finished; covers keep being applied.
    Completed,
    Killed,
    Ended,
}

impl PlayState {
    /// `true` once the entity should drop this manager.
    pub fn is_detached(self) -> bool {
        matches!(self, Self::Killed | Self::Ended)
    }
}

/// Drives one action tree for one entity and owns that entity's covers.
pub struct ActionManager {
    root: Action,
    runner: Option<Runner>,
    on_end: Option<EndHook>,
    covers: Vec<Cover>,
    clock: SharedClock,
    state: PlayState,
}

impl ActionManager {
    pub fn new(root: Action, on_end: Option<EndHook>, clock: SharedClock) -> Self {
        Self {
            root,
            runner: None,
            on_end,
            covers: Vec::new(),
            clock,
            state: PlayState::Pending,
        }
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn root(&self) -> &Action {
        &self.root
    }

    pub fn on_end(&self) -> Option<&EndHook> {
        self.on_end.as_ref()
    }

    pub fn leaves(&self) -> Vec<&Action> {
        self.root.leaves()
    }

    pub fn covers(&self) -> &[Cover] {
        &self.covers
    }

    pub fn add_cover(&mut self, cover: Cover) {
        self.covers.push(cover);
    }

    pub fn clear_cover(&mut self) {
        self.covers.clear();
    }

    /// The actor's base with every cover folded over it.
    pub fn compose(&self, actor: &dyn Actor) -> KinemaResult<Visual> {
        compose(actor.base(), &self.covers)
    }

    /// Rebuild the cover list as if every covering leaf of the root had already finished.
    ///
    /// Each leaf resolves against the state left by the covers before it; a leaf repeated `n`
    /// times contributes `n` covers, and endless leaves contribute none.
    pub fn recover(&mut self, base: &Visual) -> KinemaResult<()> {
        self.covers.clear();
        let mut visual = base.clone();
        for leaf in self.root.leaves() {
            if !leaf.timing().cover {
                continue;
            }
            let passes = match leaf.total() {
                Total::Times(n) => n,
                Total::Infinite => 0,
            };
            for _ in 0..passes {
                let cover = Cover::resolved(leaf, &visual, base)?;
                visual = cover.apply(visual)?;
                self.covers.push(cover);
            }
        }
        Ok(())
    }

    /// Advance playback to the clock's current time and present the result on `actor`.
    ///
    /// The end callback fires after the final state has been presented. A `Kill` or `End`
    /// action detaches the manager without firing it again.
    #[tracing::instrument(level = "trace", skip_all, fields(root = self.root.name()))]
    pub fn update(&mut self, actor: &mut dyn Actor) -> KinemaResult<PlayState> {
        match self.state {
            PlayState::Killed | PlayState::Ended => return Ok(self.state),
            PlayState::Completed => {
                let visual = self.compose(actor)?;
                actor.present(visual);
                return Ok(self.state);
            }
            PlayState::Pending | PlayState::Running => {}
        }

        let now = self.clock.now_ms();
        let input = self.compose(actor)?;
        let Self {
            root,
            runner,
            on_end,
            covers,
            ..
        } = self;
        let runner = runner.get_or_insert_with(|| {
            tracing::debug!(now, action = %root, "playback started");
            Runner::new(root.clone(), now)
        });
        let mut ctx = StepCtx::new(now, &mut *actor, covers, root, on_end.as_ref());
        let step = runner.step(&mut ctx, &input);
        let halt = ctx.halt;
        self.state = PlayState::Running;

        let (delta, done) = match step? {
            Step::Running(delta) => (delta, false),
            Step::Done { delta, .. } => (delta, true),
        };
        let visual = match delta {
            Some(visual) => visual,
            None => self.compose(actor)?,
        };
        actor.present(visual);

        if let Some(halt) = halt {
            self.runner = None;
            self.state = match halt {
                Halt::Killed => PlayState::Killed,
                Halt::Ended => PlayState::Ended,
            };
            tracing::debug!(now, state = ?self.state, "playback halted");
            return Ok(self.state);
        }
        if done {
            self.runner = None;
            self.state = PlayState::Completed;
            tracing::debug!(now, covers = self.covers.len(), "playback completed");
            if let Some(on_end) = &self.on_end {
                on_end.invoke(actor, &self.root)?;
            }
        }
        Ok(self.state)
    }
}

impl std::fmt::Debug for ActionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionManager")
            .field("root", &self.root.to_string())
            .field("state", &self.state)
            .field("covers", &self.covers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/manager.rs"]
mod tests;
