use crate::foundation::core::{Point, Size, Vec2};
use crate::foundation::error::{KinemaError, KinemaResult};

/// Linear blend contract: `a + t * (b - a)`, applied element-wise for vector-likes.
///
/// `t` is not clamped, so callers may overshoot past either endpoint.
pub trait Mix: Sized {
    fn mix(a: &Self, b: &Self, t: f64) -> Self;
}

impl Mix for f64 {
    fn mix(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Mix for f32 {
    fn mix(a: &Self, b: &Self, t: f64) -> Self {
        (*a as f64 + ((*b as f64 - *a as f64) * t)) as f32
    }
}

impl Mix for Vec2 {
    fn mix(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Mix for Point {
    fn mix(a: &Self, b: &Self, t: f64) -> Self {
        Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Mix for Size {
    fn mix(a: &Self, b: &Self, t: f64) -> Self {
        Size::new(
            a.width + (b.width - a.width) * t,
            a.height + (b.height - a.height) * t,
        )
    }
}

pub fn mix<T: Mix>(a: &T, b: &T, t: f64) -> T {
    T::mix(a, b, t)
}

/// Loosely shaped range endpoint: a scalar or a fixed-size pair.
///
/// Used where one parameter slot accepts either shape (e.g. a scale factor vs. a target
/// size); mixing two endpoints of different shapes is an [`KinemaError::InvalidArgument`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(f64),
    Pair(f64, f64),
}

impl Value {
    pub fn try_mix(a: &Self, b: &Self, t: f64) -> KinemaResult<Self> {
        match (a, b) {
            (Self::Scalar(a), Self::Scalar(b)) => Ok(Self::Scalar(mix(a, b, t))),
            (Self::Pair(ax, ay), Self::Pair(bx, by)) => {
                Ok(Self::Pair(mix(ax, bx, t), mix(ay, by, t)))
            }
            _ => Err(KinemaError::invalid_argument(format!(
                "cannot mix {} with {}",
                a.shape(),
                b.shape()
            ))),
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Pair(..) => "pair",
        }
    }

    pub fn as_scalar(self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(v),
            Self::Pair(..) => None,
        }
    }

    pub fn as_pair(self) -> Option<(f64, f64)> {
        match self {
            Self::Pair(x, y) => Some((x, y)),
            Self::Scalar(_) => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        match *self {
            Self::Scalar(v) => v.is_finite(),
            Self::Pair(x, y) => x.is_finite() && y.is_finite(),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<(f64, f64)> for Value {
    fn from((x, y): (f64, f64)) -> Self {
        Self::Pair(x, y)
    }
}

impl From<Size> for Value {
    fn from(value: Size) -> Self {
        Self::Pair(value.width, value.height)
    }
}

impl From<Vec2> for Value {
    fn from(value: Vec2) -> Self {
        Self::Pair(value.x, value.y)
    }
}

/// `x * y / 255` with rounding, for scaling 8-bit channels by an 8-bit factor.
pub(crate) fn mul_div255(x: u8, y: u8) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
