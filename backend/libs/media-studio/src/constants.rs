//! Media studio constants

/// Maximum video upload size, enforced before the upload starts (70 MiB)
pub const MAX_VIDEO_UPLOAD_BYTES: u64 = 70 * 1024 * 1024;

/// File extension appended to every exported render
pub const EXPORT_EXTENSION: &str = "png";

/// Upload endpoint for images, relative to the API base URL
pub const IMAGE_UPLOAD_PATH: &str = "api/image-upload";

/// Upload endpoint for videos, relative to the API base URL
pub const VIDEO_UPLOAD_PATH: &str = "api/video-upload";

/// Video listing endpoint, relative to the API base URL
pub const VIDEO_LIST_PATH: &str = "api/videos";

/// Default API base URL used when `STUDIO_API_BASE_URL` is unset
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/";

/// Default image delivery base used when `STUDIO_DELIVERY_BASE_URL` is unset
pub const DEFAULT_DELIVERY_BASE_URL: &str = "https://res.cloudinary.com/demo/image/upload";

/// Default video delivery base used when `STUDIO_VIDEO_DELIVERY_BASE_URL` is unset
pub const DEFAULT_VIDEO_DELIVERY_BASE_URL: &str = "https://res.cloudinary.com/demo/video/upload";

/// Default directory for exported renders
pub const DEFAULT_EXPORT_DIR: &str = "exports";
