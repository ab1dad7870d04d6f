use serde::de::DeserializeOwned;

use crate::action::ease::Ease;
use crate::action::leaf::{Erase, Fade, Flip, Leaf, MoveBy, MoveTo, Shake, Span, Transform, TransformFn, Wave};
use crate::action::model::{Action, GroupMode, Special};
use crate::foundation::core::{Anchor, Point, Total, Vec2};
use crate::foundation::error::{KinemaError, KinemaResult};
use crate::foundation::math::Value;
use crate::script::hooks::Hooks;

/// Serializable description of an action tree.
///
/// `params` holds the kind-specific parameters; each kind accepts a fixed set of names and any
/// other name is a [`KinemaError::Config`]. Callbacks and `erase`'s `eraser` image are
/// referenced by name through [`Hooks`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionDef {
    pub kind: String,
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub interval: u64,
    #[serde(default)]
    pub total: Total,
    #[serde(default)]
    pub interp: Ease,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<bool>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub params: serde_json::Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ActionDef>,
}

/// A range written either as `[start, end]` (each possibly `null`) or as a bare end value.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum SpanRepr<T> {
    Pair(Option<T>, Option<T>),
    End(T),
}

impl<T> SpanRepr<T> {
    fn into_span(self) -> Span<T> {
        match self {
            Self::Pair(start, end) => Span { start, end },
            Self::End(end) => Span::to(end),
        }
    }
}

fn params_for(kind: &str) -> KinemaResult<&'static [&'static str]> {
    Ok(match kind {
        "delay" | "clear" | "end" | "remain" | "sequence" | "parallel" => &[],
        "act" | "call" => &["hook"],
        "fade" | "fade_in" | "fade_out" | "move_by" => &["range"],
        "scale_by" | "scale_to" | "rotate" | "move_to" => &["range", "anchor"],
        "transform" => &["range", "anchor", "hook"],
        "flip" => &["x", "y"],
        "erase" => &["range", "anchor", "size", "eraser", "fill"],
        "shake" => &["dist", "waves"],
        "kill" => &["call_end"],
        other => {
            return Err(KinemaError::config(format!(
                "unknown action kind '{other}'"
            )));
        }
    })
}

fn vec2([x, y]: [f64; 2]) -> Vec2 {
    Vec2::new(x, y)
}

fn point([x, y]: [f64; 2]) -> Point {
    Point::new(x, y)
}

fn map_span<A, B>(span: Span<A>, f: impl Fn(A) -> B) -> Span<B> {
    Span {
        start: span.start.map(&f),
        end: span.end.map(&f),
    }
}

impl ActionDef {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            duration: 0,
            interval: 0,
            total: Total::ONCE,
            interp: Ease::Linear,
            cover: None,
            params: serde_json::Map::new(),
            children: Vec::new(),
        }
    }

    /// Turn this definition (and its children) into an [`Action`].
    #[tracing::instrument(level = "debug", skip_all, fields(kind = %self.kind))]
    pub fn build(&self, hooks: &Hooks) -> KinemaResult<Action> {
        let kind = self.kind.trim().to_ascii_lowercase().replace('-', "_");
        let accepted = params_for(&kind)?;
        if let Some(key) = self
            .params
            .keys()
            .find(|key| !accepted.contains(&key.as_str()))
        {
            return Err(KinemaError::config(format!(
                "{kind} does not accept parameter '{key}'"
            )));
        }
        let is_group = matches!(kind.as_str(), "sequence" | "parallel");
        if !is_group && !self.children.is_empty() {
            return Err(KinemaError::config(format!(
                "{kind} does not accept children"
            )));
        }

        let ms = self.duration;
        let action = match kind.as_str() {
            "delay" => Action::delay(ms),
            "act" => Action::leaf(ms, Leaf::Act(hooks.act(&self.required::<String>(&kind, "hook")?)?)),
            "fade" => Action::leaf(
                ms,
                Fade {
                    range: self.span::<f64>(&kind)?.unwrap_or(Fade::default().range),
                },
            ),
            "fade_in" => Action::leaf(
                ms,
                Fade {
                    range: self.span::<f64>(&kind)?.unwrap_or(Span::new(0.0, 255.0)),
                },
            ),
            "fade_out" => Action::leaf(
                ms,
                Fade {
                    range: self.span::<f64>(&kind)?.unwrap_or(Span::new(255.0, 0.0)),
                },
            ),
            "scale_by" => self.transform(&kind, TransformFn::ScaleBy, None)?,
            "scale_to" => {
                let range = self.span::<Value>(&kind)?.ok_or_else(|| {
                    KinemaError::config("scale_to requires a 'range' target size")
                })?;
                // `[w, h]` is a bare target size, not a range between two scalars.
                let range = match (range.start, range.end) {
                    (Some(Value::Scalar(w)), Some(Value::Scalar(h))) => {
                        Span::to(Value::Pair(w, h))
                    }
                    _ => range,
                };
                self.transform(&kind, TransformFn::ScaleTo, Some(range))?
            }
            "rotate" => self.transform(
                &kind,
                TransformFn::Rotate,
                Some(
                    map_span(self.span::<f64>(&kind)?.unwrap_or(Span::new(0.0, 360.0)), Value::Scalar),
                ),
            )?,
            "transform" => {
                let hook = hooks.transform(&self.required::<String>(&kind, "hook")?)?;
                let range = self.span::<Value>(&kind)?.ok_or_else(|| {
                    KinemaError::config("transform requires a 'range'")
                })?;
                self.transform(&kind, TransformFn::Custom(hook), Some(range))?
            }
            "flip" => Action::leaf(
                ms,
                Flip {
                    x: self.param(&kind, "x")?.unwrap_or(true),
                    y: self.param(&kind, "y")?.unwrap_or(false),
                },
            ),
            "move_by" => Action::leaf(
                ms,
                MoveBy {
                    range: self
                        .span::<[f64; 2]>(&kind)?
                        .map_or(MoveBy::default().range, |s| map_span(s, vec2)),
                },
            ),
            "move_to" => Action::leaf(
                ms,
                MoveTo {
                    range: self
                        .span::<[f64; 2]>(&kind)?
                        .map_or(Span::unset(), |s| map_span(s, point)),
                    anchor: self.param(&kind, "anchor")?.unwrap_or(Anchor::TopLeft),
                },
            ),
            "erase" => {
                let defaults = Erase::default();
                Action::leaf(
                    ms,
                    Erase {
                        range: self
                            .span::<[f64; 2]>(&kind)?
                            .map_or(defaults.range, |s| map_span(s, point)),
                        anchor: self.param(&kind, "anchor")?.unwrap_or(defaults.anchor),
                        size: self
                            .param::<[f64; 2]>(&kind, "size")?
                            .map_or(defaults.size, vec2),
                        eraser: self
                            .param::<String>(&kind, "eraser")?
                            .map(|name| hooks.image(&name))
                            .transpose()?,
                        fill: self.param(&kind, "fill")?.unwrap_or(defaults.fill),
                    },
                )
            }
            "shake" => {
                let defaults = Shake::default();
                let waves = self
                    .param::<[Wave; 2]>(&kind, "waves")?
                    .map_or(defaults.waves, |[x, y]| (x, y));
                Action::leaf(
                    ms,
                    Shake {
                        dist: self
                            .param::<[f64; 2]>(&kind, "dist")?
                            .map_or(defaults.dist, vec2),
                        waves,
                    },
                )
            }
            "call" => Action::special(Special::Call(
                hooks.call(&self.required::<String>(&kind, "hook")?)?,
            )),
            "clear" => Action::clear(),
            "kill" => Action::kill_with(self.param(&kind, "call_end")?.unwrap_or(true)),
            "end" => Action::end(),
            "remain" => Action::remain(),
            "sequence" | "parallel" => {
                let mode = if kind == "sequence" {
                    GroupMode::Sequential
                } else {
                    GroupMode::Parallel
                };
                let children = self
                    .children
                    .iter()
                    .map(|child| child.build(hooks))
                    .collect::<KinemaResult<Vec<_>>>()?;
                let group = match mode {
                    GroupMode::Sequential => Action::sequence(children),
                    GroupMode::Parallel => Action::parallel(children),
                };
                return Ok(group.with_total(self.total));
            }
            other => {
                return Err(KinemaError::config(format!(
                    "unknown action kind '{other}'"
                )));
            }
        };

        let mut action = action
            .with_interval(self.interval)
            .with_total(self.total)
            .with_interp(self.interp);
        if let Some(cover) = self.cover {
            action = action.with_cover(cover);
        }
        Ok(action)
    }

    fn transform(
        &self,
        kind: &str,
        func: TransformFn,
        range: Option<Span<Value>>,
    ) -> KinemaResult<Action> {
        let defaults = Transform::default();
        let range = match range {
            Some(range) => range,
            None => self.span::<Value>(kind)?.unwrap_or(defaults.range),
        };
        Ok(Action::leaf(
            self.duration,
            Transform {
                range,
                anchor: self.param(kind, "anchor")?.unwrap_or(defaults.anchor),
                func,
            },
        ))
    }

    fn param<T: DeserializeOwned>(&self, kind: &str, key: &str) -> KinemaResult<Option<T>> {
        self.params
            .get(key)
            .map(|v| {
                serde_json::from_value(v.clone())
                    .map_err(|e| KinemaError::config(format!("{kind}.{key}: {e}")))
            })
            .transpose()
    }

    fn required<T: DeserializeOwned>(&self, kind: &str, key: &str) -> KinemaResult<T> {
        self.param(kind, key)?.ok_or_else(|| {
            KinemaError::config(format!("{kind} requires parameter '{key}'"))
        })
    }

    fn span<T: DeserializeOwned>(&self, kind: &str) -> KinemaResult<Option<Span<T>>> {
        Ok(self
            .param::<SpanRepr<T>>(kind, "range")?
            .map(SpanRepr::into_span))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/def.rs"]
mod tests;
