pub(crate) mod composition;
pub(crate) mod content;
pub(crate) mod logo;
pub(crate) mod sequence;
pub(crate) mod style;
