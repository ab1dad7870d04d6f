pub(crate) mod actor;
pub(crate) mod clock;
pub(crate) mod manager;
pub(crate) mod runner;
pub(crate) mod sprite;
