//! qrcraft composes styled QR codes.
//!
//! A single [`CompositionState`] holds the content selection (text or an uploaded file's URL),
//! the visual style and an optional center logo. Every change derives a fresh [`RenderRequest`]
//! that is handed to a [`QrRenderer`] as a full replace:
//!
//! - Drive a [`QrEditor`] session (state + renderer + [`ObjectStore`])
//! - Shape logos into square, rectangle or circle PNGs with [`shape_logo`]
//! - Render and export symbols with [`CpuQrRenderer`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod config;
pub(crate) mod logo;
pub(crate) mod render;
pub(crate) mod session;
pub(crate) mod state;
pub(crate) mod storage;

pub use crate::assets::encode::ExportFormat;
pub use crate::config::{DEFAULT_TEXT, EditorConfig};
pub use crate::foundation::color::Rgba8;
pub use crate::foundation::core::{Affine, BezPath, Canvas, MAX_SURFACE_EDGE, Point, Rect};
pub use crate::foundation::deadline::run_with_timeout;
pub use crate::foundation::error::{QrCraftError, QrCraftResult};
pub use crate::logo::geometry::{
    ClipRegion, DEFAULT_BASE_SIZE, LogoFit, RECTANGLE_ASPECT, clip_region, image_placement,
    logo_canvas,
};
pub use crate::logo::shaper::{ShapeOptions, ShapedLogo, shape_logo, shape_logo_bounded};
pub use crate::render::backend::{ExportedImage, QrRenderer, export_file_name};
pub use crate::render::cpu::{CpuQrRenderer, CpuRendererOpts, ErrorCorrection, FrameRGBA};
pub use crate::render::pipeline::{build_request, submit};
pub use crate::render::recording::RecordingRenderer;
pub use crate::render::request::{IMAGE_MARGIN, RenderRequest};
pub use crate::session::{Notice, NoticeKind, PendingUpload, QrEditor};
pub use crate::state::composition::{CompositionState, StateSnapshot};
pub use crate::state::content::{ContentKind, ContentSelection};
pub use crate::state::logo::{
    DEFAULT_LOGO_SIZE, LogoJob, LogoPhase, LogoShape, LogoSpec, MAX_LOGO_SIZE, MIN_LOGO_SIZE,
    clamp_logo_size,
};
pub use crate::state::sequence::{Slot, Ticket};
pub use crate::state::style::{DotStyle, EyeStyle, StylePatch, StyleSpec};
pub use crate::storage::fs::FsObjectStore;
pub use crate::storage::memory::MemoryObjectStore;
pub use crate::storage::{FolderKey, ObjectStore, UploadFile, object_key};
