use crate::visual::surface::Visual;

/// An entity that can run actions.
///
/// The engine never owns an actor's state: every tick it reads the undecorated [`Visual`] with
/// [`Actor::base`], composes covers and the running action over it, and hands the result back
/// through [`Actor::present`].
pub trait Actor {
    /// Visual state without any action applied.
    fn base(&self) -> Visual;

    /// Receive this tick's composed visual state.
    fn present(&mut self, visual: Visual);

    /// The entity was killed by a `Kill` action.
    fn kill(&mut self);

    /// The entity was retired by an `End` action.
    fn end(&mut self);
}
