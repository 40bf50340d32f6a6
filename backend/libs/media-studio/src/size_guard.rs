//! Client-side upload size checks
use crate::constants::MAX_VIDEO_UPLOAD_BYTES;
use crate::error::SizeRejected;
use crate::models::{AssetKind, MediaFile};

/// Reject `file` when it is larger than `max_bytes`. A file of exactly
/// `max_bytes` passes.
pub fn check(file: &MediaFile, max_bytes: u64) -> Result<(), SizeRejected> {
    let actual = file.size_bytes();
    if actual > max_bytes {
        Err(SizeRejected {
            actual,
            max: max_bytes,
        })
    } else {
        Ok(())
    }
}

/// Maximum upload size per asset kind. `None` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizePolicy {
    pub image_max_bytes: Option<u64>,
    pub video_max_bytes: Option<u64>,
}

impl Default for SizePolicy {
    fn default() -> Self {
        Self {
            image_max_bytes: None,
            video_max_bytes: Some(MAX_VIDEO_UPLOAD_BYTES),
        }
    }
}

impl SizePolicy {
    pub fn limit_for(&self, kind: AssetKind) -> Option<u64> {
        match kind {
            AssetKind::Image => self.image_max_bytes,
            AssetKind::Video => self.video_max_bytes,
        }
    }

    pub fn check(&self, kind: AssetKind, file: &MediaFile) -> Result<(), SizeRejected> {
        match self.limit_for(kind) {
            Some(max) => check(file, max),
            None => Ok(()),
        }
    }
}
