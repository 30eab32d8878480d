//! Photostrip is the compositing core of a photo-booth product.
//!
//! Four captured photos go through a filter pipeline (color transform plus
//! optional texture overlay), land in a template layout (classic strip or a
//! positional grid), get decorated with stickers under linear undo/redo, and
//! come out as one exported PNG. Every compositing step is an explicit
//! draw-op list replayed against an RGBA surface, so renders are pure and
//! replayable.
#![forbid(unsafe_code)]

pub mod assets;
pub mod capture;
pub mod compose;
pub mod effect;
pub mod error;
pub mod export;
pub mod filters;
pub mod history;
pub mod ops;
pub mod payment;
pub mod photo;
pub mod process;
pub mod session;
pub mod stickers;
pub mod surface;
pub mod templates;

pub use assets::{AssetStore, FsAssetStore, MemoryAssetStore, PreparedImage};
pub use capture::{AcquisitionMode, CaptureSession, PHOTO_COUNT};
pub use compose::{render_strip, DEFAULT_STRIP_WIDTH};
pub use error::{BoothError, BoothResult};
pub use filters::{FilterDescriptor, FilterRegistry};
pub use history::{History, HistoryAction};
pub use photo::{Photo, PhotoFormat};
pub use process::apply_filter;
pub use session::{SessionDocument, SessionState};
pub use stickers::{StickerCatalog, StickerId, StickerPlacement};
pub use surface::{BlendMode, Surface};
pub use templates::{TemplateDescriptor, TemplateRegistry};
