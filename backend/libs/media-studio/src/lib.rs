//! Media studio core
//!
//! Upload an image or video to the asset storage service, preview it under
//! social-media crop presets, export the rendered result and read the video
//! catalog. Side effects go through the [`storage`] traits so the state
//! machines in [`upload`], [`preview`] and [`studio`] stay synchronous.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod driver;
pub mod error;
pub mod export;
pub mod models;
pub mod presets;
pub mod preview;
pub mod size_guard;
pub mod storage;
pub mod studio;
pub mod transform;
pub mod upload;

pub use catalog::CatalogClient;
pub use config::StudioConfig;
pub use driver::StudioDriver;
pub use error::{ErrorCategory, ExportError, Result, StudioError, UploadError};
pub use export::{derive_filename, DirectorySink, Exporter, FileSink, SavedFile};
pub use models::*;
pub use presets::Preset;
pub use preview::{PreviewController, PreviewState, RenderKey, RenderRequest};
pub use size_guard::SizePolicy;
pub use storage::{AssetStore, HttpAssetStore, RenderFetcher};
pub use studio::{Command, Event, ExportState, Studio};
pub use transform::{RenderParams, TransformUrlBuilder};
pub use upload::{UploadSession, UploadState, UploadTicket};
