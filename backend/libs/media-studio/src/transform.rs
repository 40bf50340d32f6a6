//! Render URL construction
//!
//! The delivery service renders an asset on demand from parameters encoded in
//! the URL path, so building the URL needs no network round trip.
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;

use crate::models::{AssetId, AssetKind};
use crate::presets::Preset;

/// Characters that must be percent-encoded in an asset id path
const PATH_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CropStrategy {
    Fill,
}

impl CropStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CropStrategy::Fill => "fill",
        }
    }
}

/// Focal point used when cropping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gravity {
    Auto,
}

impl Gravity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gravity::Auto => "auto",
        }
    }
}

/// Transformation parameters sent to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderParams {
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: &'static str,
    pub crop: CropStrategy,
    pub gravity: Gravity,
}

impl RenderParams {
    /// Preset dimensions with the fixed `fill` crop and `auto` gravity
    pub fn for_preset(preset: &Preset) -> Self {
        Self {
            width: preset.width,
            height: preset.height,
            aspect_ratio: preset.aspect_ratio,
            crop: CropStrategy::Fill,
            gravity: Gravity::Auto,
        }
    }
}

impl fmt::Display for RenderParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "c_{},w_{},h_{},ar_{},g_{}",
            self.crop.as_str(),
            self.width,
            self.height,
            self.aspect_ratio,
            self.gravity.as_str()
        )
    }
}

/// Builds delivery URLs of the form `{base}/{transformation}/{asset_id}`.
///
/// Images and videos are delivered from separate bases; both start out as
/// the base given to [`TransformUrlBuilder::new`].
#[derive(Debug, Clone)]
pub struct TransformUrlBuilder {
    image_base: String,
    video_base: String,
}

impl TransformUrlBuilder {
    pub fn new(base: impl Into<String>) -> Self {
        let base = trim_base(base.into());
        Self {
            video_base: base.clone(),
            image_base: base,
        }
    }

    pub fn with_video_base(mut self, base: impl Into<String>) -> Self {
        self.video_base = trim_base(base.into());
        self
    }

    pub fn base(&self, kind: AssetKind) -> &str {
        match kind {
            AssetKind::Image => &self.image_base,
            AssetKind::Video => &self.video_base,
        }
    }

    pub fn render_url(&self, asset_id: &AssetId, kind: AssetKind, params: &RenderParams) -> String {
        let encoded = utf8_percent_encode(asset_id.as_str(), PATH_SET);
        format!("{}/{}/{}", self.base(kind), params, encoded)
    }
}

fn trim_base(base: String) -> String {
    base.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;

    #[test]
    fn test_params_from_preset() {
        let preset = presets::get("Twitter Post (16:9)").unwrap();
        let params = RenderParams::for_preset(preset);
        assert_eq!(params.width, 1200);
        assert_eq!(params.height, 675);
        assert_eq!(params.aspect_ratio, "16:9");
        assert_eq!(params.crop, CropStrategy::Fill);
        assert_eq!(params.gravity, Gravity::Auto);
        assert_eq!(params.to_string(), "c_fill,w_1200,h_675,ar_16:9,g_auto");
    }

    #[test]
    fn test_render_url_format() {
        let builder = TransformUrlBuilder::new("https://res.example.com/demo/image/upload/");
        let params = RenderParams::for_preset(presets::default_preset());
        let url = builder.render_url(&AssetId::new("img123").unwrap(), AssetKind::Image, &params);
        assert_eq!(
            url,
            "https://res.example.com/demo/image/upload/c_fill,w_1080,h_1080,ar_1:1,g_auto/img123"
        );
    }

    #[test]
    fn test_render_url_encodes_asset_id() {
        let builder = TransformUrlBuilder::new("https://res.example.com/upload");
        let params = RenderParams::for_preset(presets::default_preset());
        let id = AssetId::new("folder/my photo?.jpg").unwrap();
        let url = builder.render_url(&id, AssetKind::Image, &params);
        assert!(url.ends_with("/folder/my%20photo%3F.jpg"));
    }

    #[test]
    fn test_render_url_is_pure() {
        let builder = TransformUrlBuilder::new("https://res.example.com/upload");
        let params = RenderParams::for_preset(presets::default_preset());
        let id = AssetId::new("a").unwrap();
        assert_eq!(
            builder.render_url(&id, AssetKind::Image, &params),
            builder.render_url(&id, AssetKind::Image, &params)
        );
    }

    #[test]
    fn test_video_renders_use_video_base() {
        let builder = TransformUrlBuilder::new("https://res.example.com/demo/image/upload")
            .with_video_base("https://res.example.com/demo/video/upload/");
        let params = RenderParams::for_preset(presets::default_preset());
        let id = AssetId::new("clip7").unwrap();

        assert_eq!(
            builder.render_url(&id, AssetKind::Video, &params),
            "https://res.example.com/demo/video/upload/c_fill,w_1080,h_1080,ar_1:1,g_auto/clip7"
        );
        assert_eq!(
            builder.render_url(&id, AssetKind::Image, &params),
            "https://res.example.com/demo/image/upload/c_fill,w_1080,h_1080,ar_1:1,g_auto/clip7"
        );
    }

    #[test]
    fn test_single_base_serves_both_kinds() {
        let builder = TransformUrlBuilder::new("https://cdn.test/upload");
        assert_eq!(builder.base(AssetKind::Image), "https://cdn.test/upload");
        assert_eq!(builder.base(AssetKind::Video), "https://cdn.test/upload");
    }
}
