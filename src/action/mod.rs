pub(crate) mod algebra;
pub(crate) mod catalog;
pub(crate) mod cover;
pub(crate) mod ease;
pub(crate) mod leaf;
pub(crate) mod model;
