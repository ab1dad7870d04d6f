use std::fmt;
use std::rc::Rc;

use crate::action::ease::Ease;
use crate::action::leaf::Leaf;
use crate::foundation::core::Total;
use crate::foundation::error::{KinemaError, KinemaResult};
use crate::foundation::math::Value;
use crate::runtime::actor::Actor;
use crate::visual::surface::{Surface, Visual};

/// Shared user callback, compared by identity.
pub struct Hook<F: ?Sized>(Rc<F>);

impl<F: ?Sized> Clone for Hook<F> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<F: ?Sized> PartialEq for Hook<F> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<F: ?Sized> fmt::Debug for Hook<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hook({:p})", Rc::as_ptr(&self.0).cast::<()>())
    }
}

/// Instant side effect on the entity running the action.
pub type CallHook = Hook<dyn Fn(&mut dyn Actor) -> anyhow::Result<()>>;
/// Per-step observer of progress and the incoming visual state.
pub type ActHook = Hook<dyn Fn(f64, &Visual) -> anyhow::Result<()>>;
/// User supplied image transform for [`crate::TransformFn::Custom`].
pub type TransformHook = Hook<dyn Fn(&Surface, Value) -> anyhow::Result<Surface>>;
/// Completion callback, receiving the entity and the root action.
pub type EndHook = Hook<dyn Fn(&mut dyn Actor, &Action) -> anyhow::Result<()>>;

impl CallHook {
    pub fn new(f: impl Fn(&mut dyn Actor) -> anyhow::Result<()> + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub(crate) fn invoke(&self, actor: &mut dyn Actor) -> KinemaResult<()> {
        (self.0)(actor).map_err(KinemaError::callback)
    }
}

impl ActHook {
    pub fn new(f: impl Fn(f64, &Visual) -> anyhow::Result<()> + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub(crate) fn invoke(&self, progress: f64, visual: &Visual) -> KinemaResult<()> {
        (self.0)(progress, visual).map_err(KinemaError::callback)
    }
}

impl TransformHook {
    pub fn new(f: impl Fn(&Surface, Value) -> anyhow::Result<Surface> + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub(crate) fn invoke(&self, image: &Surface, value: Value) -> KinemaResult<Surface> {
        (self.0)(image, value).map_err(KinemaError::callback)
    }
}

impl EndHook {
    pub fn new(f: impl Fn(&mut dyn Actor, &Action) -> anyhow::Result<()> + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub(crate) fn invoke(&self, actor: &mut dyn Actor, root: &Action) -> KinemaResult<()> {
        (self.0)(actor, root).map_err(KinemaError::callback)
    }
}

/// Zero-duration actions that act on the runtime rather than on the visual state.
#[derive(Clone, Debug, PartialEq)]
pub enum Special {
    /// Run a callback against the entity.
    Call(CallHook),
    /// Drop every cover registered so far.
    Clear,
    /// Kill the entity, optionally running the end callback first.
    Kill { call_end: bool },
    /// Retire the entity: it accepts no further actions.
    End,
    /// Never finishes; keeps a group alive.
    Remain,
}

impl Special {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Call(_) => "Call",
            Self::Clear => "Clear",
            Self::Kill { .. } => "Kill",
            Self::End => "End",
            Self::Remain => "Remain",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupMode {
    Sequential,
    Parallel,
}

impl GroupMode {
    fn sigil(self) -> &'static str {
        match self {
            Self::Sequential => ">>",
            Self::Parallel => "+",
        }
    }
}

/// Timing attributes shared by every action.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    /// Length of one pass in milliseconds.
    pub duration_ms: u64,
    /// Minimum time between two samples; `0` samples every tick.
    pub interval_ms: u64,
    pub total: Total,
    pub interp: Ease,
    /// Whether the final state persists after the pass ends.
    pub cover: bool,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            duration_ms: 0,
            interval_ms: 0,
            total: Total::ONCE,
            interp: Ease::Linear,
            cover: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ActionKind {
    Leaf(Leaf),
    Special(Special),
    Group {
        mode: GroupMode,
        children: Vec<Action>,
    },
}

/// Immutable description of a timed behavior.
///
/// Actions are plain values: building, combining, or cloning one never starts it, and the same
/// value may be handed to any number of entities.
#[derive(Clone, Debug, PartialEq)]
pub struct Action {
    pub(crate) timing: Timing,
    pub(crate) kind: ActionKind,
}

impl Action {
    pub fn leaf(duration_ms: u64, leaf: impl Into<Leaf>) -> Self {
        let leaf = leaf.into();
        Self {
            timing: Timing {
                duration_ms,
                cover: leaf.covers_by_default(),
                ..Timing::default()
            },
            kind: ActionKind::Leaf(leaf),
        }
    }

    pub fn special(special: Special) -> Self {
        Self {
            timing: Timing::default(),
            kind: ActionKind::Special(special),
        }
    }

    pub fn group(mode: GroupMode, children: Vec<Action>) -> Self {
        Self {
            timing: Timing::default(),
            kind: ActionKind::Group { mode, children },
        }
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    pub fn total(&self) -> Total {
        self.timing.total
    }

    pub fn duration_ms(&self) -> u64 {
        self.timing.duration_ms
    }

    pub fn with_duration(mut self, ms: u64) -> Self {
        self.timing.duration_ms = ms;
        self
    }

    pub fn with_interval(mut self, ms: u64) -> Self {
        self.timing.interval_ms = ms;
        self
    }

    pub fn with_total(mut self, total: Total) -> Self {
        self.timing.total = total;
        self
    }

    pub fn with_interp(mut self, interp: Ease) -> Self {
        self.timing.interp = interp;
        self
    }

    /// Only leaves register covers; the flag is ignored on groups and specials.
    pub fn with_cover(mut self, cover: bool) -> Self {
        self.timing.cover = cover;
        self
    }

    pub fn name(&self) -> &'static str {
        match &self.kind {
            ActionKind::Leaf(leaf) => leaf.name(),
            ActionKind::Special(special) => special.name(),
            ActionKind::Group {
                mode: GroupMode::Sequential,
                ..
            } => "Sequential",
            ActionKind::Group {
                mode: GroupMode::Parallel,
                ..
            } => "Parallel",
        }
    }

    pub fn children(&self) -> &[Action] {
        match &self.kind {
            ActionKind::Group { children, .. } => children,
            ActionKind::Leaf(_) | ActionKind::Special(_) => &[],
        }
    }

    pub fn mode(&self) -> Option<GroupMode> {
        match &self.kind {
            ActionKind::Group { mode, .. } => Some(*mode),
            ActionKind::Leaf(_) | ActionKind::Special(_) => None,
        }
    }

    /// An empty action contributes no steps: a zero total, or a group without children.
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            ActionKind::Group { children, .. } => self.timing.total.is_zero() || children.is_empty(),
            ActionKind::Leaf(_) | ActionKind::Special(_) => self.timing.total.is_zero(),
        }
    }

    /// Structural equality ignoring `total`; adjacent actions that match this way merge.
    pub fn same_shape(&self, other: &Action) -> bool {
        let Timing {
            duration_ms,
            interval_ms,
            interp,
            cover,
            total: _,
        } = self.timing;
        duration_ms == other.timing.duration_ms
            && interval_ms == other.timing.interval_ms
            && interp == other.timing.interp
            && cover == other.timing.cover
            && self.kind == other.kind
    }

    /// Every leaf below this action, depth first.
    pub fn leaves(&self) -> Vec<&Action> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Action>) {
        match &self.kind {
            ActionKind::Leaf(_) => out.push(self),
            ActionKind::Special(_) => {}
            ActionKind::Group { children, .. } => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ActionKind::Group { mode, children } => {
                write!(f, "<{} total={} [", self.name(), self.timing.total)?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", mode.sigil())?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str("]>")
            }
            ActionKind::Leaf(_) | ActionKind::Special(_) => write!(
                f,
                "<{}{} duration={}ms total={}>",
                if self.timing.cover { "+" } else { "" },
                self.name(),
                self.timing.duration_ms,
                self.timing.total
            ),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/action/model.rs"]
mod tests;
