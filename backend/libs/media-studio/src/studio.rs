//! Studio dispatcher
//!
//! Single owner of the upload session, preview controller and export state.
//! Every outside happening arrives as an [`Event`]; every side effect leaves as
//! a [`Command`]. State only changes inside [`Studio::handle`].
use tracing::{debug, info};

use crate::config::StudioConfig;
use crate::error::{ExportError, StudioError, UploadError};
use crate::export::{derive_filename, SavedFile};
use crate::models::{AssetId, Resolution, UploadRequest};
use crate::preview::{PreviewController, RenderKey, RenderRequest};
use crate::size_guard::SizePolicy;
use crate::transform::TransformUrlBuilder;
use crate::upload::{UploadSession, UploadTicket};

#[derive(Debug)]
pub enum Event {
    /// The user submitted the upload form. `None` when no file was picked.
    UploadRequested(Option<UploadRequest>),
    UploadFinished {
        ticket: UploadTicket,
        result: Result<AssetId, UploadError>,
    },
    PresetSelected(String),
    RenderLoaded(RenderKey),
    RenderFailed {
        key: RenderKey,
        reason: String,
    },
    ExportRequested,
    ExportFinished(Result<SavedFile, ExportError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Upload {
        ticket: UploadTicket,
        request: UploadRequest,
    },
    LoadRender(RenderRequest),
    Export {
        url: String,
        preset_name: &'static str,
    },
    /// A failure the user should see
    Notify(StudioError),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExportState {
    #[default]
    Idle,
    Exporting {
        filename: String,
    },
    Saved(SavedFile),
    Failed(ExportError),
}

pub struct Studio {
    upload: UploadSession,
    preview: PreviewController,
    export: ExportState,
}

impl Studio {
    pub fn new(policy: SizePolicy, urls: TransformUrlBuilder) -> Self {
        Self {
            upload: UploadSession::new(policy),
            preview: PreviewController::new(urls),
            export: ExportState::Idle,
        }
    }

    pub fn from_config(config: &StudioConfig) -> Self {
        Self::new(
            config.size_policy,
            TransformUrlBuilder::new(config.delivery_base_url.clone())
                .with_video_base(config.video_delivery_base_url.clone()),
        )
    }

    pub fn upload(&self) -> &UploadSession {
        &self.upload
    }

    pub fn preview(&self) -> &PreviewController {
        &self.preview
    }

    pub fn export_state(&self) -> &ExportState {
        &self.export
    }

    pub fn handle(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::UploadRequested(request) => self.on_upload_requested(request),
            Event::UploadFinished { ticket, result } => self.on_upload_finished(ticket, result),
            Event::PresetSelected(name) => match self.preview.select_preset(&name) {
                Ok(Some(request)) => vec![Command::LoadRender(request)],
                Ok(None) => Vec::new(),
                Err(err) => vec![Command::Notify(err)],
            },
            Event::RenderLoaded(key) => {
                let _ = self.preview.confirm_render(&key);
                Vec::new()
            }
            Event::RenderFailed { key, reason } => {
                match self.preview.fail_render(&key, reason.clone()) {
                    Resolution::Applied => vec![Command::Notify(StudioError::RenderFailed(reason))],
                    Resolution::StaleIgnored => Vec::new(),
                }
            }
            Event::ExportRequested => self.on_export_requested(),
            Event::ExportFinished(result) => self.on_export_finished(result),
        }
    }

    fn on_upload_requested(&mut self, request: Option<UploadRequest>) -> Vec<Command> {
        match self.upload.begin(request.as_ref()) {
            Ok(ticket) => request
                .map(|request| Command::Upload { ticket, request })
                .into_iter()
                .collect(),
            Err(err) => vec![Command::Notify(err.into())],
        }
    }

    fn on_upload_finished(
        &mut self,
        ticket: UploadTicket,
        result: Result<AssetId, UploadError>,
    ) -> Vec<Command> {
        let failure = result.as_ref().err().cloned();
        if let Resolution::StaleIgnored = self.upload.complete(ticket, result) {
            return Vec::new();
        }

        let uploaded = self.upload.asset_id().cloned().zip(self.upload.asset_kind());
        match (uploaded, failure) {
            (Some((asset_id, kind)), _) => {
                vec![Command::LoadRender(self.preview.asset_uploaded(asset_id, kind))]
            }
            (None, Some(err)) => vec![Command::Notify(err.into())],
            (None, None) => Vec::new(),
        }
    }

    fn on_export_requested(&mut self) -> Vec<Command> {
        if let ExportState::Exporting { .. } = self.export {
            return vec![Command::Notify(StudioError::ExportInProgress)];
        }

        match self.preview.export_target() {
            Ok((url, preset)) => {
                let command = Command::Export {
                    url: url.to_string(),
                    preset_name: preset.name,
                };
                self.export = ExportState::Exporting {
                    filename: derive_filename(preset.name),
                };
                vec![command]
            }
            Err(err) => vec![Command::Notify(err)],
        }
    }

    fn on_export_finished(&mut self, result: Result<SavedFile, ExportError>) -> Vec<Command> {
        if !matches!(self.export, ExportState::Exporting { .. }) {
            debug!("Ignoring export result with no export in progress");
            return Vec::new();
        }

        match result {
            Ok(saved) => {
                info!(filename = %saved.filename, "Export saved");
                self.export = ExportState::Saved(saved);
                Vec::new()
            }
            Err(err) => {
                self.export = ExportState::Failed(err.clone());
                vec![Command::Notify(err.into())]
            }
        }
    }
}
