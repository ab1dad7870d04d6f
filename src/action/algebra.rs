use std::ops::{Add, Mul, Neg, Not, Shr};

use crate::action::model::{Action, ActionKind, GroupMode, Special};
use crate::foundation::core::Total;
use crate::foundation::error::{KinemaError, KinemaResult};
use crate::runtime::actor::Actor;

impl Action {
    /// `self`, then `next`. Same as `self >> next`.
    pub fn then(self, next: impl Into<Action>) -> Action {
        combine(GroupMode::Sequential, self, next.into())
    }

    /// `self` and `other` at the same time. Same as `self + other`.
    pub fn alongside(self, other: impl Into<Action>) -> Action {
        combine(GroupMode::Parallel, self, other.into())
    }

    /// `n` passes of this action. Same as `self * n`; `0` yields an empty action.
    pub fn repeat(mut self, n: u32) -> Action {
        self.timing.total = self.timing.total.times(n);
        self
    }

    pub fn forever(mut self) -> Action {
        self.timing.total = Total::Infinite;
        self
    }

    /// Play backwards: ranges swap their endpoints and groups run their children in reverse.
    /// Same as `-self`.
    pub fn reverse(mut self) -> Action {
        self.kind = match self.kind {
            ActionKind::Leaf(leaf) => ActionKind::Leaf(leaf.reversed()),
            ActionKind::Special(special) => ActionKind::Special(special),
            ActionKind::Group { mode, children } => ActionKind::Group {
                mode,
                children: children.into_iter().rev().map(Action::reverse).collect(),
            },
        };
        self
    }

    /// Reverse only the child order of a group; leaves are unchanged. Same as `!self`.
    pub fn invert(mut self) -> Action {
        if let ActionKind::Group { children, .. } = &mut self.kind {
            children.reverse();
        }
        self
    }

    /// Append to a group, merging with the last child when both have the same shape.
    pub fn push(&mut self, action: impl Into<Action>) -> KinemaResult<()> {
        let len = self.group_children_mut()?.len();
        self.insert(len, action)
    }

    /// Insert into a group at `index`, merging with the preceding child when both have the same
    /// shape.
    pub fn insert(&mut self, index: usize, action: impl Into<Action>) -> KinemaResult<()> {
        let children = self.group_children_mut()?;
        if index > children.len() {
            return Err(KinemaError::invalid_argument(format!(
                "insert index {index} is out of bounds for a group of {}",
                children.len()
            )));
        }
        insert_merged(children, index, action.into());
        Ok(())
    }

    pub(crate) fn push_merged(&mut self, action: Action) {
        if let ActionKind::Group { children, .. } = &mut self.kind {
            let len = children.len();
            insert_merged(children, len, action);
        }
    }

    fn group_children_mut(&mut self) -> KinemaResult<&mut Vec<Action>> {
        match &mut self.kind {
            ActionKind::Group { children, .. } => Ok(children),
            ActionKind::Leaf(_) | ActionKind::Special(_) => Err(KinemaError::invalid_argument(
                "only sequential and parallel groups accept children",
            )),
        }
    }

    /// The operands `combine` splices in: a single-pass group of the same mode contributes its
    /// children, anything else contributes itself.
    fn into_items(self, mode: GroupMode) -> Vec<Action> {
        match self.kind {
            ActionKind::Group {
                mode: m,
                children,
            } if m == mode && self.timing.total == Total::ONCE => children,
            kind => vec![Action {
                timing: self.timing,
                kind,
            }],
        }
    }
}

fn insert_merged(children: &mut Vec<Action>, index: usize, action: Action) {
    if index > 0 && children[index - 1].same_shape(&action) {
        let prev = &mut children[index - 1];
        prev.timing.total = prev.timing.total.plus(action.timing.total);
        return;
    }
    children.insert(index, action);
}

fn combine(mode: GroupMode, a: Action, b: Action) -> Action {
    let mut group = Action::group(mode, Vec::new());
    for item in a.into_items(mode).into_iter().chain(b.into_items(mode)) {
        if !item.is_empty() {
            group.push_merged(item);
        }
    }
    group
}

impl<F> From<F> for Action
where
    F: Fn(&mut dyn Actor) -> anyhow::Result<()> + 'static,
{
    /// A bare callback stands for an instant `Call` action.
    fn from(f: F) -> Self {
        Action::call(f)
    }
}

impl<T: Into<Action>> Shr<T> for Action {
    type Output = Action;

    fn shr(self, rhs: T) -> Action {
        self.then(rhs)
    }
}

impl<T: Into<Action>> Add<T> for Action {
    type Output = Action;

    fn add(self, rhs: T) -> Action {
        self.alongside(rhs)
    }
}

impl Mul<u32> for Action {
    type Output = Action;

    fn mul(self, rhs: u32) -> Action {
        self.repeat(rhs)
    }
}

impl Neg for Action {
    type Output = Action;

    fn neg(self) -> Action {
        self.reverse()
    }
}

impl Not for Action {
    type Output = Action;

    fn not(self) -> Action {
        self.invert()
    }
}

impl From<Special> for Action {
    fn from(value: Special) -> Self {
        Action::special(value)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/action/algebra.rs"]
mod tests;
