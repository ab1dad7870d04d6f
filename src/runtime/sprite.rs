use crate::action::cover::Cover;
use crate::action::model::{Action, EndHook};
use crate::foundation::core::{Anchor, Point, Rect, Vec2};
use crate::foundation::error::{KinemaError, KinemaResult};
use crate::runtime::actor::Actor;
use crate::runtime::clock::SharedClock;
use crate::runtime::manager::{ActionManager, PlayState};
use crate::visual::surface::{Surface, Visual};

/// Ready-made [`Actor`]: an image with a position that runs one action tree at a time.
///
/// The sprite keeps two visual states: the undecorated `base` (what the sprite is) and the `live`
/// state the current action last presented (what should be drawn).
pub struct ActionSprite {
    base: Visual,
    live: Visual,
    manager: Option<ActionManager>,
    on_end: Option<EndHook>,
    clock: SharedClock,
    alive: bool,
    ended: bool,
}

impl ActionSprite {
    pub fn new(image: Surface, origin: Point, clock: SharedClock) -> Self {
        Self::from_visual(Visual::at(image, origin), clock)
    }

    pub fn from_visual(visual: Visual, clock: SharedClock) -> Self {
        Self {
            base: visual.clone(),
            live: visual,
            manager: None,
            on_end: None,
            clock,
            alive: true,
            ended: false,
        }
    }

    /// Default end callback for actions started without their own.
    pub fn with_end_hook(mut self, on_end: EndHook) -> Self {
        self.on_end = Some(on_end);
        self
    }

    /// Start `action`, replacing whatever was running. The replaced manager is dropped with its
    /// covers and without running its end callback.
    pub fn act(&mut self, action: impl Into<Action>, on_end: Option<EndHook>) -> KinemaResult<()> {
        if self.ended {
            return Err(KinemaError::invalid_argument(
                "an ended sprite accepts no further actions",
            ));
        }
        let action = action.into();
        tracing::debug!(action = %action, superseded = self.manager.is_some(), "act");
        let on_end = on_end.or_else(|| self.on_end.clone());
        self.manager = Some(ActionManager::new(action, on_end, self.clock.clone()));
        Ok(())
    }

    /// Detach the running action, optionally firing its end callback.
    pub fn stop(&mut self, call_end: bool) -> KinemaResult<()> {
        let Some(manager) = self.manager.take() else {
            return Ok(());
        };
        if call_end {
            if let Some(on_end) = manager.on_end() {
                on_end.invoke(self, manager.root())?;
            }
        }
        self.live = self.base.clone();
        Ok(())
    }

    /// Advance the running action to the clock's current time.
    pub fn update(&mut self) -> KinemaResult<()> {
        if !self.alive || self.ended {
            return Ok(());
        }
        let Some(mut manager) = self.manager.take() else {
            return Ok(());
        };
        let state = manager.update(self)?;
        if !state.is_detached() {
            self.manager = Some(manager);
        }
        Ok(())
    }

    pub fn state(&self) -> Option<PlayState> {
        self.manager.as_ref().map(ActionManager::state)
    }

    /// `true` while an attached action still has steps to run.
    pub fn is_acting(&self) -> bool {
        matches!(
            self.state(),
            Some(PlayState::Pending | PlayState::Running)
        )
    }

    pub fn manager(&self) -> Option<&ActionManager> {
        self.manager.as_ref()
    }

    pub fn add_cover(&mut self, cover: Cover) -> KinemaResult<()> {
        let Some(manager) = self.manager.as_mut() else {
            return Err(KinemaError::invalid_argument(
                "covers need an attached action manager",
            ));
        };
        manager.add_cover(cover);
        Ok(())
    }

    pub fn clear_cover(&mut self) {
        if let Some(manager) = self.manager.as_mut() {
            manager.clear_cover();
        }
    }

    pub fn image(&self) -> &Surface {
        &self.live.image
    }

    pub fn rect(&self) -> Rect {
        self.live.rect
    }

    pub fn visual(&self) -> &Visual {
        &self.live
    }

    pub fn base_visual(&self) -> &Visual {
        &self.base
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Shift both the base and the live position.
    pub fn move_by(&mut self, offset: Vec2) {
        self.base.rect = self.base.rect + offset;
        self.live.rect = self.live.rect + offset;
    }

    /// Move so that `anchor` of the live rect lands on `at`.
    pub fn move_to(&mut self, at: Point, anchor: Anchor) {
        self.move_by(at - anchor.point(self.live.rect));
    }

    /// Swap the image, keeping the top-left corner.
    pub fn set_image(&mut self, image: Surface) {
        self.base = Visual::at(image.clone(), self.base.rect.origin());
        self.live = Visual::at(image, self.live.rect.origin());
    }
}

impl Actor for ActionSprite {
    fn base(&self) -> Visual {
        self.base.clone()
    }

    fn present(&mut self, visual: Visual) {
        self.live = visual;
    }

    fn kill(&mut self) {
        self.alive = false;
    }

    fn end(&mut self) {
        self.ended = true;
    }
}

impl std::fmt::Debug for ActionSprite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionSprite")
            .field("rect", &self.live.rect)
            .field("alpha", &self.live.image.alpha())
            .field("manager", &self.manager)
            .field("alive", &self.alive)
            .field("ended", &self.ended)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/sprite.rs"]
mod tests;
