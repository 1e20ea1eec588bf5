//! Render pipeline and QR render targets.
//!
//! State changes become a [`request::RenderRequest`] which a [`backend::QrRenderer`] consumes.

/// Render target trait and export types.
pub(crate) mod backend;
/// `qrcode` + `vello_cpu` render target.
pub(crate) mod cpu;
pub(crate) mod pipeline;
pub(crate) mod raster;
/// In-memory render target that only records requests.
pub(crate) mod recording;
pub(crate) mod request;
