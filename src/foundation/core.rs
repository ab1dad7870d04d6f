use crate::foundation::error::KinemaError;

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Named pivot on a bounding box, used to re-anchor a rect after its size changes.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    MidTop,
    MidBottom,
    MidLeft,
    MidRight,
    Center,
}

impl Anchor {
    /// Every anchor, in declaration order.
    pub const ALL: [Anchor; 9] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
        Self::MidTop,
        Self::MidBottom,
        Self::MidLeft,
        Self::MidRight,
        Self::Center,
    ];

    fn factors(self) -> (f64, f64) {
        match self {
            Self::TopLeft => (0.0, 0.0),
            Self::TopRight => (1.0, 0.0),
            Self::BottomLeft => (0.0, 1.0),
            Self::BottomRight => (1.0, 1.0),
            Self::MidTop => (0.5, 0.0),
            Self::MidBottom => (0.5, 1.0),
            Self::MidLeft => (0.0, 0.5),
            Self::MidRight => (1.0, 0.5),
            Self::Center => (0.5, 0.5),
        }
    }

    /// Location of this anchor on `rect`.
    pub fn point(self, rect: Rect) -> Point {
        let (fx, fy) = self.factors();
        Point::new(
            rect.x0 + fx * rect.width(),
            rect.y0 + fy * rect.height(),
        )
    }

    /// Move `rect` (keeping its size) so that this anchor lands on `at`.
    pub fn place(self, rect: Rect, at: Point) -> Rect {
        let (fx, fy) = self.factors();
        let size = rect.size();
        Rect::from_origin_size(
            Point::new(at.x - fx * size.width, at.y - fy * size.height),
            size,
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::TopLeft => "top_left",
            Self::TopRight => "top_right",
            Self::BottomLeft => "bottom_left",
            Self::BottomRight => "bottom_right",
            Self::MidTop => "mid_top",
            Self::MidBottom => "mid_bottom",
            Self::MidLeft => "mid_left",
            Self::MidRight => "mid_right",
            Self::Center => "center",
        }
    }
}

impl std::fmt::Display for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Repeat count of an action: a finite number of passes or unbounded.
///
/// `Times(0)` marks an empty action that contributes no steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "TotalRepr", into = "TotalRepr")]
pub enum Total {
    Times(u32),
    Infinite,
}

impl Total {
    pub const ONCE: Total = Total::Times(1);

    pub fn is_zero(self) -> bool {
        self == Self::Times(0)
    }

    /// `true` while another pass should run after `passes_done` completed ones.
    pub fn allows(self, passes_done: u64) -> bool {
        match self {
            Self::Times(n) => passes_done < u64::from(n),
            Self::Infinite => true,
        }
    }

    /// Repetition: `n` times as many passes.
    pub fn times(self, n: u32) -> Self {
        match self {
            Self::Times(a) => Self::Times(a.saturating_mul(n)),
            Self::Infinite if n == 0 => Self::Times(0),
            Self::Infinite => Self::Infinite,
        }
    }

    /// Merge of two adjacent runs of the same action.
    pub fn plus(self, other: Self) -> Self {
        match (self, other) {
            (Self::Times(a), Self::Times(b)) => Self::Times(a.saturating_add(b)),
            _ => Self::Infinite,
        }
    }
}

impl Default for Total {
    fn default() -> Self {
        Self::ONCE
    }
}

impl std::fmt::Display for Total {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Times(n) => write!(f, "{n}"),
            Self::Infinite => f.write_str("infinite"),
        }
    }
}

#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum TotalRepr {
    Count(u32),
    Word(String),
}

impl TryFrom<TotalRepr> for Total {
    type Error = KinemaError;

    fn try_from(value: TotalRepr) -> Result<Self, Self::Error> {
        match value {
            TotalRepr::Count(n) => Ok(Self::Times(n)),
            TotalRepr::Word(w) => match w.trim().to_ascii_lowercase().as_str() {
                "infinite" | "inf" | "forever" => Ok(Self::Infinite),
                other => Err(KinemaError::config(format!(
                    "total must be a count or \"infinite\", got '{other}'"
                ))),
            },
        }
    }
}

impl From<Total> for TotalRepr {
    fn from(value: Total) -> Self {
        match value {
            Total::Times(n) => Self::Count(n),
            Total::Infinite => Self::Word("infinite".to_owned()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
