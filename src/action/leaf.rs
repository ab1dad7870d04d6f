use std::f64::consts::TAU;

use crate::action::ease::Ease;
use crate::action::model::{ActHook, TransformHook};
use crate::foundation::core::{Anchor, Point, Rect, Size, Vec2};
use crate::foundation::error::{KinemaError, KinemaResult};
use crate::foundation::math::{Value, mix};
use crate::visual::surface::{Surface, Visual};

/// A range whose endpoints may be left unset.
///
/// Unset endpoints are resolved when the action starts (not when it is built), against the
/// visual state flowing into it at that moment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span<T> {
    pub start: Option<T>,
    pub end: Option<T>,
}

impl<T> Span<T> {
    pub fn new(start: T, end: T) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Only the end is known; the start resolves at init.
    pub fn to(end: T) -> Self {
        Self {
            start: None,
            end: Some(end),
        }
    }

    pub fn unset() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    pub fn reversed(self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }

    fn resolve(self, fallback: impl Fn() -> KinemaResult<T>) -> KinemaResult<(T, T)> {
        let start = match self.start {
            Some(v) => v,
            None => fallback()?,
        };
        let end = match self.end {
            Some(v) => v,
            None => fallback()?,
        };
        Ok((start, end))
    }
}

/// Periodic function driving one axis of a [`Shake`].
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Wave {
    #[default]
    Sin,
    Cos,
    Triangle,
    Square,
    Saw,
    Zero,
}

impl Wave {
    /// Value in `[-1, 1]` at `phase` radians.
    pub fn eval(self, phase: f64) -> f64 {
        let cycle = (phase / TAU).rem_euclid(1.0);
        match self {
            Self::Sin => phase.sin(),
            Self::Cos => phase.cos(),
            Self::Triangle => {
                if cycle < 0.25 {
                    4.0 * cycle
                } else if cycle < 0.75 {
                    2.0 - 4.0 * cycle
                } else {
                    4.0 * cycle - 4.0
                }
            }
            Self::Square => {
                if cycle < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Self::Saw => 2.0 * cycle - 1.0,
            Self::Zero => 0.0,
        }
    }
}

/// Geometric image transform driven by a mixed [`Value`].
#[derive(Clone, Debug, PartialEq)]
pub enum TransformFn {
    /// Scalar factor, or a per-axis `(fx, fy)` pair.
    ScaleBy,
    /// Absolute `(width, height)`.
    ScaleTo,
    /// Counter-clockwise degrees.
    Rotate,
    Custom(TransformHook),
}

impl TransformFn {
    /// Value an unset range endpoint takes. `ScaleTo` falls back to the undecorated size.
    fn identity(&self, base: &Visual) -> KinemaResult<Value> {
        match self {
            Self::ScaleBy => Ok(Value::Scalar(1.0)),
            Self::ScaleTo => Ok(Value::from(base.image.size())),
            Self::Rotate => Ok(Value::Scalar(0.0)),
            Self::Custom(_) => Err(KinemaError::invalid_argument(
                "custom transforms need both range endpoints",
            )),
        }
    }

    fn apply(&self, image: &Surface, value: Value) -> KinemaResult<Surface> {
        match (self, value) {
            (Self::ScaleBy, Value::Scalar(f)) => image.scaled_by(f, f),
            (Self::ScaleBy, Value::Pair(fx, fy)) => image.scaled_by(fx, fy),
            (Self::ScaleTo, Value::Pair(w, h)) => image.scaled(Size::new(w, h)),
            (Self::Rotate, Value::Scalar(deg)) => image.rotated(deg),
            (Self::Custom(hook), v) => hook.invoke(image, v),
            (f, v) => Err(KinemaError::invalid_argument(format!(
                "{} expects a {}, got a {}",
                f.name(),
                if matches!(f, Self::ScaleTo) {
                    "pair"
                } else {
                    "scalar"
                },
                v.shape()
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ScaleBy => "scale_by",
            Self::ScaleTo => "scale_to",
            Self::Rotate => "rotate",
            Self::Custom(_) => "custom",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Fade {
    /// Opacity endpoints in `0..=255`.
    pub range: Span<f64>,
}

impl Default for Fade {
    fn default() -> Self {
        Self {
            range: Span::new(0.0, 255.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    pub range: Span<Value>,
    pub anchor: Anchor,
    pub func: TransformFn,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            range: Span::new(Value::Scalar(1.0), Value::Scalar(2.0)),
            anchor: Anchor::Center,
            func: TransformFn::ScaleBy,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Flip {
    pub x: bool,
    pub y: bool,
}

impl Default for Flip {
    fn default() -> Self {
        Self { x: true, y: false }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MoveBy {
    /// Offset endpoints; an unset start means "from where it is".
    pub range: Span<Vec2>,
}

impl Default for MoveBy {
    fn default() -> Self {
        Self {
            range: Span::to(Vec2::ZERO),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MoveTo {
    pub range: Span<Point>,
    pub anchor: Anchor,
}

impl Default for MoveTo {
    fn default() -> Self {
        Self {
            range: Span::unset(),
            anchor: Anchor::TopLeft,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Erase {
    /// Eraser positions as fractions of the entity size.
    pub range: Span<Point>,
    pub anchor: Anchor,
    /// Eraser size as a fraction of the entity size.
    pub size: Vec2,
    /// Image stamped at the eraser position after clearing.
    pub eraser: Option<Surface>,
    /// Clear the eraser rect to transparent.
    pub fill: bool,
}

impl Default for Erase {
    fn default() -> Self {
        Self {
            range: Span::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0)),
            anchor: Anchor::TopLeft,
            size: Vec2::new(1.0, 1.0),
            eraser: None,
            fill: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Shake {
    /// Amplitude per axis in pixels.
    pub dist: Vec2,
    pub waves: (Wave, Wave),
}

impl Default for Shake {
    fn default() -> Self {
        Self {
            dist: Vec2::new(10.0, 0.0),
            waves: (Wave::Sin, Wave::Sin),
        }
    }
}

/// Catalog of timed effects: each maps progress in `[0, 1]` to a visual state.
#[derive(Clone, Debug, PartialEq)]
pub enum Leaf {
    Delay,
    Act(ActHook),
    Fade(Fade),
    Transform(Transform),
    Flip(Flip),
    MoveBy(MoveBy),
    MoveTo(MoveTo),
    Erase(Erase),
    Shake(Shake),
}

impl Leaf {
    /// Whether this kind persists its final state as a cover unless told otherwise.
    pub fn covers_by_default(&self) -> bool {
        matches!(
            self,
            Self::Fade(_) | Self::Transform(_) | Self::Flip(_) | Self::MoveBy(_) | Self::MoveTo(_)
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Delay => "Delay",
            Self::Act(_) => "Act",
            Self::Fade(_) => "Fade",
            Self::Transform(t) => match t.func {
                TransformFn::ScaleBy => "ScaleBy",
                TransformFn::ScaleTo => "ScaleTo",
                TransformFn::Rotate => "Rotate",
                TransformFn::Custom(_) => "Transform",
            },
            Self::Flip(_) => "Flip",
            Self::MoveBy(_) => "MoveBy",
            Self::MoveTo(_) => "MoveTo",
            Self::Erase(_) => "Erase",
            Self::Shake(_) => "Shake",
        }
    }

    /// Same effect travelling in the opposite direction.
    pub fn reversed(&self) -> Self {
        let mut out = self.clone();
        match &mut out {
            Self::Fade(f) => f.range = f.range.reversed(),
            Self::Transform(t) => t.range = t.range.reversed(),
            Self::MoveBy(m) => m.range = m.range.reversed(),
            Self::MoveTo(m) => m.range = m.range.reversed(),
            Self::Erase(e) => e.range = e.range.reversed(),
            Self::Delay | Self::Act(_) | Self::Flip(_) | Self::Shake(_) => {}
        }
        out
    }

    /// Fill in every deferred default at start time.
    ///
    /// `input` is the visual state flowing into the leaf; `base` is the entity without any cover
    /// or action applied, which only `ScaleTo` consults.
    pub(crate) fn resolve(&self, input: &Visual, base: &Visual) -> KinemaResult<Effect> {
        Ok(match self {
            Self::Delay => Effect::Delay,
            Self::Act(hook) => Effect::Act(hook.clone()),
            Self::Fade(f) => {
                let (from, to) = f.range.resolve(|| Ok(f64::from(input.image.alpha())))?;
                Effect::Fade { from, to }
            }
            Self::Transform(t) => {
                let (from, to) = t.range.resolve(|| t.func.identity(base))?;
                Effect::Transform {
                    from,
                    to,
                    anchor: t.anchor,
                    func: t.func.clone(),
                }
            }
            Self::Flip(f) => Effect::Flip { x: f.x, y: f.y },
            Self::MoveBy(m) => {
                let (from, to) = m.range.resolve(|| Ok(Vec2::ZERO))?;
                Effect::MoveBy { from, to }
            }
            Self::MoveTo(m) => {
                let here = m.anchor.point(input.rect);
                let (from, to) = m.range.resolve(|| Ok(here))?;
                Effect::MoveTo {
                    from,
                    to,
                    anchor: m.anchor,
                }
            }
            Self::Erase(e) => {
                let size = input.image.size();
                let (from, to) = e.range.resolve(|| Ok(Point::ORIGIN))?;
                let scale = |p: Point| Point::new(p.x * size.width, p.y * size.height);
                Effect::Erase {
                    from: scale(from),
                    to: scale(to),
                    anchor: e.anchor,
                    area: Rect::from_origin_size(
                        Point::ORIGIN,
                        Size::new(e.size.x * size.width, e.size.y * size.height),
                    ),
                    eraser: e.eraser.clone(),
                    fill: e.fill,
                }
            }
            Self::Shake(s) => Effect::Shake {
                dist: s.dist,
                waves: s.waves,
            },
        })
    }
}

impl From<Fade> for Leaf {
    fn from(value: Fade) -> Self {
        Self::Fade(value)
    }
}

impl From<Transform> for Leaf {
    fn from(value: Transform) -> Self {
        Self::Transform(value)
    }
}

impl From<Flip> for Leaf {
    fn from(value: Flip) -> Self {
        Self::Flip(value)
    }
}

impl From<MoveBy> for Leaf {
    fn from(value: MoveBy) -> Self {
        Self::MoveBy(value)
    }
}

impl From<MoveTo> for Leaf {
    fn from(value: MoveTo) -> Self {
        Self::MoveTo(value)
    }
}

impl From<Erase> for Leaf {
    fn from(value: Erase) -> Self {
        Self::Erase(value)
    }
}

impl From<Shake> for Leaf {
    fn from(value: Shake) -> Self {
        Self::Shake(value)
    }
}

/// A leaf with every endpoint resolved; samples visual states for one pass.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Effect {
    Delay,
    Act(ActHook),
    Fade {
        from: f64,
        to: f64,
    },
    Transform {
        from: Value,
        to: Value,
        anchor: Anchor,
        func: TransformFn,
    },
    Flip {
        x: bool,
        y: bool,
    },
    MoveBy {
        from: Vec2,
        to: Vec2,
    },
    MoveTo {
        from: Point,
        to: Point,
        anchor: Anchor,
    },
    Erase {
        from: Point,
        to: Point,
        anchor: Anchor,
        area: Rect,
        eraser: Option<Surface>,
        fill: bool,
    },
    Shake {
        dist: Vec2,
        waves: (Wave, Wave),
    },
}

impl Effect {
    /// Visual state at `progress`, or `None` when the effect draws nothing itself.
    pub(crate) fn sample(
        &self,
        progress: f64,
        interp: Ease,
        input: &Visual,
    ) -> KinemaResult<Option<Visual>> {
        let t = interp.apply(progress);
        let out = match self {
            Self::Delay => input.clone(),
            Self::Act(hook) => {
                hook.invoke(progress, input)?;
                return Ok(None);
            }
            Self::Fade { from, to } => {
                let alpha = mix(from, to, t).round().clamp(0.0, 255.0) as u8;
                Visual::new(input.image.with_alpha(alpha), input.rect)
            }
            Self::Transform {
                from,
                to,
                anchor,
                func,
            } => {
                let value = Value::try_mix(from, to, t)?;
                let image = func.apply(&input.image, value)?;
                let rect = anchor.place(image.bounds(), anchor.point(input.rect));
                Visual::new(image, rect)
            }
            Self::Flip { x, y } => Visual::new(input.image.flipped(*x, *y), input.rect),
            Self::MoveBy { from, to } => Visual::new(input.image.clone(), input.rect + mix(from, to, t)),
            Self::MoveTo { from, to, anchor } => Visual::new(
                input.image.clone(),
                anchor.place(input.rect, mix(from, to, t)),
            ),
            Self::Erase {
                from,
                to,
                anchor,
                area,
                eraser,
                fill,
            } => {
                let at = anchor.place(*area, mix(from, to, t));
                Visual::new(
                    input.image.erased(at, *fill, eraser.as_ref()),
                    input.rect,
                )
            }
            Self::Shake { dist, waves } => {
                let phase = progress * TAU;
                let offset = Vec2::new(waves.0.eval(phase) * dist.x, waves.1.eval(phase) * dist.y);
                Visual::new(input.image.clone(), input.rect + offset)
            }
        };
        Ok(Some(out))
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Delay => "delay",
            Self::Act(_) => "act",
            Self::Fade { .. } => "fade",
            Self::Transform { .. } => "transform",
            Self::Flip { .. } => "flip",
            Self::MoveBy { .. } => "move_by",
            Self::MoveTo { .. } => "move_to",
            Self::Erase { .. } => "erase",
            Self::Shake { .. } => "shake",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/action/leaf.rs"]
mod tests;
