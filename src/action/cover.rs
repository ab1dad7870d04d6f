use crate::action::ease::Ease;
use crate::action::leaf::Effect;
use crate::action::model::{Action, ActionKind};
use crate::foundation::error::{KinemaError, KinemaResult};
use crate::visual::surface::Visual;

/// Persisted final state of a finished leaf.
///
/// Covers are folded, in registration order, over an entity's undecorated state at the start of
/// every tick, so a finished fade or move keeps its effect until the covers are cleared.
#[derive(Clone, Debug, PartialEq)]
pub struct Cover {
    effect: Effect,
    interp: Ease,
}

impl Cover {
    pub(crate) fn new(effect: Effect, interp: Ease) -> Self {
        Self { effect, interp }
    }

    /// Resolve `action` (a leaf) against `base` and keep its end state.
    pub fn from_leaf(action: &Action, base: &Visual) -> KinemaResult<Self> {
        Self::resolved(action, base, base)
    }

    /// Like [`Cover::from_leaf`], with deferred defaults taken from `input` where the leaf
    /// reads the current state.
    pub(crate) fn resolved(action: &Action, input: &Visual, base: &Visual) -> KinemaResult<Self> {
        let ActionKind::Leaf(leaf) = action.kind() else {
            return Err(KinemaError::invalid_argument(format!(
                "only leaf actions can become covers, got {}",
                action.name()
            )));
        };
        Ok(Self::new(leaf.resolve(input, base)?, action.timing().interp))
    }

    pub fn kind(&self) -> &'static str {
        self.effect.kind()
    }

    pub fn apply(&self, visual: Visual) -> KinemaResult<Visual> {
        Ok(self
            .effect
            .sample(1.0, self.interp, &visual)?
            .unwrap_or(visual))
    }
}

/// Fold `covers` over `base`, in order.
pub(crate) fn compose(base: Visual, covers: &[Cover]) -> KinemaResult<Visual> {
    covers.iter().try_fold(base, |visual, cover| cover.apply(visual))
}

#[cfg(test)]
#[path = "../../tests/unit/action/cover.rs"]
mod tests;
