//! Camera and Photo Library Abstraction
//!
//! Describes the native camera bridge: one call that produces a photo
//! (live capture or library pick) and the camera permission queries.

use serde::{Deserialize, Serialize};

use crate::{error::Result, platform::PlatformSendSync};

/// Where the image comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoSource {
    /// Live capture with the device camera
    Camera,
    /// Existing photo from the library / gallery
    Photos,
}

/// Encoding the platform should deliver the photo in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
        }
    }
}

/// Configuration passed to [`NativeCamera::get_photo`]
///
/// Results are always requested as base64 payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRequest {
    pub source: PhotoSource,
    /// Compression quality, 1..=100
    pub quality: u8,
    /// Show the platform's crop/edit step after capture
    pub allow_editing: bool,
    /// Rotate pixels according to EXIF orientation
    pub correct_orientation: bool,
    /// Also store the captured photo in the system gallery
    pub save_to_gallery: bool,
    /// Encoding to prefer; platforms that cannot honour it report what they used
    pub preferred_format: ImageFormat,
}

/// Raw result of a photo request as the bridge delivers it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPhoto {
    /// Base64 image payload. `None` when the platform declined to deliver data.
    pub base64_data: Option<String>,
    /// Image format reported by the platform, e.g. `"jpeg"` or `"png"`
    pub format: String,
}

/// OS grant state for a permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Denied,
    /// Not yet decided, or the platform could not say
    Unknown,
}

impl PermissionState {
    pub const fn is_granted(self) -> bool {
        matches!(self, PermissionState::Granted)
    }
}

/// Permissions that can be requested from the camera bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionKind {
    Camera,
    Photos,
}

/// Permission snapshot returned by the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraPermissions {
    pub camera: PermissionState,
    pub photos: PermissionState,
}

/// Native camera trait
///
/// # Platform Support
///
/// - **iOS**: `UIImagePickerController` / `PHPickerViewController`, `AVCaptureDevice` authorization
/// - **Android**: Camera intent / photo picker, runtime `CAMERA` permission
///
/// A user dismissing the camera or picker must be reported as
/// [`BridgeError::Cancelled`](crate::error::BridgeError::Cancelled).
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait NativeCamera: PlatformSendSync {
    /// Capture or pick one photo
    async fn get_photo(&self, request: &PhotoRequest) -> Result<RawPhoto>;

    /// Current grant state, without prompting
    async fn check_permissions(&self) -> Result<CameraPermissions>;

    /// Prompt for the listed permissions if they are undecided
    async fn request_permissions(&self, permissions: &[PermissionKind])
        -> Result<CameraPermissions>;
}
