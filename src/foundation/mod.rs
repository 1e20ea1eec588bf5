pub(crate) mod color;
pub(crate) mod core;
pub(crate) mod deadline;
pub(crate) mod error;
