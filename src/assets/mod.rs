//! Image decoding and encoding shared by the logo shaper and exports.

pub(crate) mod decode;
pub(crate) mod encode;
