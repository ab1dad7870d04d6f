use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{KinemaError, KinemaResult};
use crate::script::def::ActionDef;
use crate::visual::ops::MAX_EDGE_PX;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpriteDef {
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_sprite_color")]
    pub color: [u8; 4],
    /// Top-left corner in canvas pixels.
    #[serde(default)]
    pub position: [f64; 2],
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanvasDef {
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_background")]
    pub background: [u8; 4],
}

impl Default for CanvasDef {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            background: default_background(),
        }
    }
}

/// One sprite, one action tree, and the fixed tick used to play it back.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    pub sprite: SpriteDef,
    #[serde(default)]
    pub canvas: CanvasDef,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
    pub action: ActionDef,
}

fn default_sprite_color() -> [u8; 4] {
    [255, 255, 255, 255]
}

fn default_background() -> [u8; 4] {
    [0, 0, 0, 255]
}

fn default_tick_ms() -> u64 {
    16
}

fn default_max_ticks() -> u64 {
    10_000
}

impl Script {
    pub fn from_json_str(s: &str) -> KinemaResult<Self> {
        serde_json::from_str(s).map_err(|e| KinemaError::config(format!("parse script: {e}")))
    }

    #[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub fn from_path(path: &Path) -> KinemaResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read script '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> KinemaResult<()> {
        for (what, v) in [
            ("sprite.width", self.sprite.width),
            ("sprite.height", self.sprite.height),
            ("canvas.width", self.canvas.width),
            ("canvas.height", self.canvas.height),
        ] {
            if v == 0 || v > MAX_EDGE_PX {
                return Err(KinemaError::config(format!(
                    "{what} must be in 1..={MAX_EDGE_PX}, got {v}"
                )));
            }
        }
        if !self.sprite.position.iter().all(|v| v.is_finite()) {
            return Err(KinemaError::config("sprite.position must be finite"));
        }
        if self.tick_ms == 0 {
            return Err(KinemaError::config("tick_ms must be > 0"));
        }
        if self.max_ticks == 0 {
            return Err(KinemaError::config("max_ticks must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/scene.rs"]
mod tests;
