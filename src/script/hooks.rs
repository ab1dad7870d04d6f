use std::collections::BTreeMap;

use crate::action::model::{ActHook, CallHook, TransformHook};
use crate::foundation::error::{KinemaError, KinemaResult};
use crate::foundation::math::Value;
use crate::runtime::actor::Actor;
use crate::visual::surface::{Surface, Visual};

/// Named callbacks and images that JSON action scripts refer to by string.
#[derive(Clone, Default)]
pub struct Hooks {
    calls: BTreeMap<String, CallHook>,
    acts: BTreeMap<String, ActHook>,
    transforms: BTreeMap<String, TransformHook>,
    images: BTreeMap<String, Surface>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_call(
        mut self,
        name: impl Into<String>,
        f: impl Fn(&mut dyn Actor) -> anyhow::Result<()> + 'static,
    ) -> Self {
        self.calls.insert(name.into(), CallHook::new(f));
        self
    }

    pub fn with_act(
        mut self,
        name: impl Into<String>,
        f: impl Fn(f64, &Visual) -> anyhow::Result<()> + 'static,
    ) -> Self {
        self.acts.insert(name.into(), ActHook::new(f));
        self
    }

    pub fn with_transform(
        mut self,
        name: impl Into<String>,
        f: impl Fn(&Surface, Value) -> anyhow::Result<Surface> + 'static,
    ) -> Self {
        self.transforms.insert(name.into(), TransformHook::new(f));
        self
    }

    /// Image an `erase` action may stamp through its `eraser` parameter.
    pub fn with_image(mut self, name: impl Into<String>, image: Surface) -> Self {
        self.images.insert(name.into(), image);
        self
    }

    pub(crate) fn call(&self, name: &str) -> KinemaResult<CallHook> {
        lookup(&self.calls, "call hook", name)
    }

    pub(crate) fn act(&self, name: &str) -> KinemaResult<ActHook> {
        lookup(&self.acts, "act hook", name)
    }

    pub(crate) fn transform(&self, name: &str) -> KinemaResult<TransformHook> {
        lookup(&self.transforms, "transform hook", name)
    }

    pub(crate) fn image(&self, name: &str) -> KinemaResult<Surface> {
        lookup(&self.images, "image", name)
    }
}

fn lookup<H: Clone>(map: &BTreeMap<String, H>, what: &str, name: &str) -> KinemaResult<H> {
    map.get(name)
        .cloned()
        .ok_or_else(|| KinemaError::config(format!("no {what} registered as '{name}'")))
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("calls", &self.calls.keys().collect::<Vec<_>>())
            .field("acts", &self.acts.keys().collect::<Vec<_>>())
            .field("transforms", &self.transforms.keys().collect::<Vec<_>>())
            .field("images", &self.images.keys().collect::<Vec<_>>())
            .finish()
    }
}
