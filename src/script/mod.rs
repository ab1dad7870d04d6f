pub(crate) mod def;
pub(crate) mod hooks;
pub(crate) mod scene;
pub(crate) mod simulate;
