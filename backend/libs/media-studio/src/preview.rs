//! Transformation preview controller
//!
//! Tracks which `(asset, preset)` render is currently requested and whether it
//! has finished loading. Confirmations are matched against the latest request
//! only; anything else is stale and leaves the state untouched.
use tracing::{debug, info, warn};

use crate::error::{Result, StudioError};
use crate::models::{AssetId, AssetKind, Resolution};
use crate::presets::{self, Preset};
use crate::transform::{RenderParams, TransformUrlBuilder};

/// Identity of a render request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderKey {
    pub asset_id: AssetId,
    pub preset: &'static str,
}

/// A render the controller wants loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub asset_id: AssetId,
    pub kind: AssetKind,
    pub preset: &'static Preset,
    pub params: RenderParams,
    pub url: String,
}

impl RenderRequest {
    pub fn key(&self) -> RenderKey {
        RenderKey {
            asset_id: self.asset_id.clone(),
            preset: self.preset.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewState {
    NoAsset,
    PendingRender(RenderRequest),
    Rendered(RenderRequest),
    /// The renderer reported that the current request could not be loaded
    RenderFailed {
        request: RenderRequest,
        reason: String,
    },
}

impl PreviewState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreviewState::NoAsset => "no_asset",
            PreviewState::PendingRender(_) => "pending_render",
            PreviewState::Rendered(_) => "rendered",
            PreviewState::RenderFailed { .. } => "render_failed",
        }
    }

    fn request(&self) -> Option<&RenderRequest> {
        match self {
            PreviewState::NoAsset => None,
            PreviewState::PendingRender(request)
            | PreviewState::Rendered(request)
            | PreviewState::RenderFailed { request, .. } => Some(request),
        }
    }
}

pub struct PreviewController {
    urls: TransformUrlBuilder,
    selected: &'static Preset,
    state: PreviewState,
    confirmed_url: Option<String>,
}

impl PreviewController {
    pub fn new(urls: TransformUrlBuilder) -> Self {
        Self {
            urls,
            selected: presets::default_preset(),
            state: PreviewState::NoAsset,
            confirmed_url: None,
        }
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    pub fn selected_preset(&self) -> &'static Preset {
        self.selected
    }

    pub fn asset_id(&self) -> Option<&AssetId> {
        self.state.request().map(|request| &request.asset_id)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, PreviewState::PendingRender(_))
    }

    /// URL of the last confirmed render of the current asset
    pub fn current_url(&self) -> Option<&str> {
        self.confirmed_url.as_deref()
    }

    /// URL of the latest request, loaded or not
    pub fn requested_url(&self) -> Option<&str> {
        self.state.request().map(|request| request.url.as_str())
    }

    /// A new asset arrived; request it with the selected preset
    pub fn asset_uploaded(&mut self, asset_id: AssetId, kind: AssetKind) -> RenderRequest {
        self.confirmed_url = None;
        let request = self.request_for(asset_id, kind, self.selected);
        info!(
            asset_id = %request.asset_id,
            preset = request.preset.name,
            "Render requested for new asset"
        );
        self.transition(PreviewState::PendingRender(request.clone()));
        request
    }

    /// Change the selected preset.
    ///
    /// Returns the new render request when an asset is present and the
    /// selection actually changed. Re-selecting after a failed render retries
    /// it.
    pub fn select_preset(&mut self, name: &str) -> Result<Option<RenderRequest>> {
        let preset = presets::get(name)?;
        let unchanged = preset == self.selected;
        self.selected = preset;

        let (asset_id, kind) = match self.state {
            PreviewState::NoAsset => return Ok(None),
            PreviewState::PendingRender(_) | PreviewState::Rendered(_) if unchanged => {
                return Ok(None)
            }
            PreviewState::PendingRender(ref request)
            | PreviewState::Rendered(ref request)
            | PreviewState::RenderFailed { ref request, .. } => {
                (request.asset_id.clone(), request.kind)
            }
        };

        let request = self.request_for(asset_id, kind, preset);
        debug!(
            asset_id = %request.asset_id,
            preset = preset.name,
            "Render requested for preset change"
        );
        self.transition(PreviewState::PendingRender(request.clone()));
        Ok(Some(request))
    }

    /// The renderer finished loading `key`
    pub fn confirm_render(&mut self, key: &RenderKey) -> Resolution {
        let request = match self.state {
            PreviewState::PendingRender(ref request) if request.key() == *key => request.clone(),
            _ => {
                debug!(
                    asset_id = %key.asset_id,
                    preset = key.preset,
                    state = self.state.as_str(),
                    "Ignoring stale render confirmation"
                );
                return Resolution::StaleIgnored;
            }
        };

        self.confirmed_url = Some(request.url.clone());
        info!(asset_id = %request.asset_id, preset = request.preset.name, "Render loaded");
        self.transition(PreviewState::Rendered(request));
        Resolution::Applied
    }

    /// The renderer could not load `key`
    pub fn fail_render(&mut self, key: &RenderKey, reason: impl Into<String>) -> Resolution {
        let request = match self.state {
            PreviewState::PendingRender(ref request) if request.key() == *key => request.clone(),
            _ => return Resolution::StaleIgnored,
        };

        let reason = reason.into();
        warn!(
            asset_id = %request.asset_id,
            preset = request.preset.name,
            "Render failed to load: {reason}"
        );
        self.transition(PreviewState::RenderFailed { request, reason });
        Resolution::Applied
    }

    /// The confirmed render to export, with its preset
    pub fn export_target(&self) -> Result<(&str, &'static Preset)> {
        match self.state {
            PreviewState::Rendered(ref request) => Ok((request.url.as_str(), request.preset)),
            PreviewState::PendingRender(_) => Err(StudioError::RenderPending),
            PreviewState::NoAsset | PreviewState::RenderFailed { .. } => {
                Err(StudioError::NothingToExport)
            }
        }
    }

    fn request_for(
        &self,
        asset_id: AssetId,
        kind: AssetKind,
        preset: &'static Preset,
    ) -> RenderRequest {
        let params = RenderParams::for_preset(preset);
        let url = self.urls.render_url(&asset_id, kind, &params);
        RenderRequest {
            asset_id,
            kind,
            preset,
            params,
            url,
        }
    }

    fn transition(&mut self, next: PreviewState) {
        debug!(from = self.state.as_str(), to = next.as_str(), "Preview state transition");
        self.state = next;
    }
}
