//! Kinema: composable timed actions for sprites.
//!
//! An [`Action`] is an immutable description (fade, move, scale, rotate, shake, erase, callbacks,
//! and sequential/parallel groups of them). An [`ActionManager`] plays one action tree for one
//! [`Actor`], stepping it once per game tick against a [`Clock`]; finished leaves leave their end
//! state behind as [`Cover`]s.
//!
//! ```
//! use std::rc::Rc;
//! use kinema::{Action, ActionSprite, ManualClock, Point, Surface, Vec2};
//!
//! let clock = Rc::new(ManualClock::new(0));
//! let mut sprite = ActionSprite::new(Surface::solid(8, 8, [255; 4]), Point::ORIGIN, clock.clone());
//! sprite.act(Action::fade_in(100) >> Action::move_by(100, Vec2::new(10.0, 0.0)), None).unwrap();
//! for t in [0, 50, 100, 150, 200] {
//!     clock.set(t);
//!     sprite.update().unwrap();
//! }
//! assert_eq!(sprite.rect().x0, 10.0);
//! ```
#![forbid(unsafe_code)]

mod action;
mod foundation;
mod runtime;
mod script;
mod visual;

pub use action::cover::Cover;
pub use action::ease::Ease;
pub use action::leaf::{Erase, Fade, Flip, Leaf, MoveBy, MoveTo, Shake, Span, Transform, TransformFn, Wave};
pub use action::model::{
    ActHook, Action, ActionKind, CallHook, EndHook, GroupMode, Hook, Special, Timing, TransformHook,
};
pub use foundation::core::{Affine, Anchor, Point, Rect, Size, Total, Vec2};
pub use foundation::error::{KinemaError, KinemaResult};
pub use foundation::math::{Mix, Value, mix};
pub use runtime::actor::Actor;
pub use runtime::clock::{Clock, GameClock, ManualClock, SharedClock};
pub use runtime::manager::{ActionManager, PlayState};
pub use runtime::sprite::ActionSprite;
pub use script::def::ActionDef;
pub use script::hooks::Hooks;
pub use script::scene::{CanvasDef, Script, SpriteDef};
pub use script::simulate::{Simulation, TickRecord};
pub use visual::surface::{Surface, Visual};
