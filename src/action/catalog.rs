//! Named constructors for every action kind.
//!
//! Each returns a plain [`Action`] with that kind's default cover behavior; timing attributes are
//! adjusted afterwards with the `with_*` builders.

use crate::action::leaf::{Erase, Fade, Flip, Leaf, MoveBy, MoveTo, Shake, Span, Transform, TransformFn, Wave};
use crate::action::model::{ActHook, Action, CallHook, GroupMode, Special};
use crate::foundation::core::{Anchor, Point, Size, Vec2};
use crate::foundation::math::Value;
use crate::runtime::actor::Actor;
use crate::visual::surface::Visual;

impl Action {
    /// Passes the incoming visual state through unchanged for `ms`.
    pub fn delay(ms: u64) -> Self {
        Self::leaf(ms, Leaf::Delay)
    }

    /// Observe progress and the incoming visual state every sampled step.
    pub fn act(ms: u64, f: impl Fn(f64, &Visual) -> anyhow::Result<()> + 'static) -> Self {
        Self::leaf(ms, Leaf::Act(ActHook::new(f)))
    }

    pub fn fade(ms: u64, from: f64, to: f64) -> Self {
        Self::leaf(
            ms,
            Fade {
                range: Span::new(from, to),
            },
        )
    }

    pub fn fade_in(ms: u64) -> Self {
        Self::fade(ms, 0.0, 255.0)
    }

    pub fn fade_out(ms: u64) -> Self {
        Self::fade(ms, 255.0, 0.0)
    }

    pub fn scale_by(ms: u64, from: impl Into<Value>, to: impl Into<Value>) -> Self {
        Self::leaf(
            ms,
            Transform {
                range: Span::new(from.into(), to.into()),
                ..Transform::default()
            },
        )
    }

    /// Scale from the current size to `size`.
    pub fn scale_to(ms: u64, size: Size) -> Self {
        Self::leaf(
            ms,
            Transform {
                range: Span::to(Value::from(size)),
                func: TransformFn::ScaleTo,
                ..Transform::default()
            },
        )
    }

    /// Counter-clockwise rotation between two angles in degrees.
    pub fn rotate(ms: u64, from_deg: f64, to_deg: f64) -> Self {
        Self::leaf(
            ms,
            Transform {
                range: Span::new(Value::Scalar(from_deg), Value::Scalar(to_deg)),
                func: TransformFn::Rotate,
                ..Transform::default()
            },
        )
    }

    /// Instant mirror along the chosen axes.
    pub fn flip(x: bool, y: bool) -> Self {
        Self::leaf(0, Flip { x, y })
    }

    /// Move by `offset` relative to where the entity is when the action starts.
    pub fn move_by(ms: u64, offset: Vec2) -> Self {
        Self::leaf(
            ms,
            MoveBy {
                range: Span::to(offset),
            },
        )
    }

    /// Move `anchor` of the entity from wherever it is to `to`.
    pub fn move_to(ms: u64, to: Point, anchor: Anchor) -> Self {
        Self::leaf(
            ms,
            MoveTo {
                range: Span::to(to),
                anchor,
            },
        )
    }

    pub fn erase(ms: u64, erase: Erase) -> Self {
        Self::leaf(ms, erase)
    }

    pub fn shake(ms: u64, dist: Vec2) -> Self {
        Self::leaf(
            ms,
            Shake {
                dist,
                waves: (Wave::Sin, Wave::Sin),
            },
        )
    }

    pub fn call(f: impl Fn(&mut dyn Actor) -> anyhow::Result<()> + 'static) -> Self {
        Self::special(Special::Call(CallHook::new(f)))
    }

    pub fn clear() -> Self {
        Self::special(Special::Clear)
    }

    /// Kill the entity after running its end callback.
    pub fn kill() -> Self {
        Self::kill_with(true)
    }

    pub fn kill_with(call_end: bool) -> Self {
        Self::special(Special::Kill { call_end })
    }

    pub fn end() -> Self {
        Self::special(Special::End)
    }

    pub fn remain() -> Self {
        Self::special(Special::Remain)
    }

    /// Sequential group of `items`, merging adjacent equal actions.
    pub fn sequence<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Action>,
    {
        Self::grouped(GroupMode::Sequential, items)
    }

    /// Parallel group of `items`, merging adjacent equal actions.
    pub fn parallel<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Action>,
    {
        Self::grouped(GroupMode::Parallel, items)
    }

    fn grouped<I>(mode: GroupMode, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Action>,
    {
        let mut group = Self::group(mode, Vec::new());
        for item in items {
            group.push_merged(item.into());
        }
        group
    }
}

#[cfg(test)]
#[path = "../../tests/unit/action/catalog.rs"]
mod tests;
