//! # Camera Capture
//!
//! Photo capture and library picking on native platforms. The browser has no
//! capture path here: on web every capture yields `None` and every permission
//! check reports granted.
//!
//! Each call runs `idle -> capturing -> {succeeded, declined, failed}`.
//! Declined (the user cancelled, or the platform returned no image data) and
//! failed both surface as `None`; only failures are logged as warnings.

use crate::outcome::Outcome;
use crate::platform::PlatformDetector;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bridge_traits::{
    BridgeError, Clock, ImageFormat, NativeCamera, PermissionKind, PermissionState, PhotoSource,
};
use bytes::Bytes;
use core_runtime::{
    config::{CameraSettings, CapabilityConfig},
    Error, Result,
};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Format assumed when the platform reports none, or one that is unusable
const DEFAULT_FORMAT: ImageFormat = ImageFormat::Jpeg;

/// Reduce a platform-reported format to a bare lowercase subtype.
///
/// Accepts `"png"` as well as `"image/png"`; anything that is not plain
/// `[a-z0-9]` afterwards falls back to JPEG.
fn normalize_format(reported: &str) -> String {
    let lowered = reported.trim().to_ascii_lowercase();
    let subtype = lowered.strip_prefix("image/").unwrap_or(&lowered);

    if !subtype.is_empty()
        && subtype
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
    {
        subtype.to_string()
    } else {
        if !reported.trim().is_empty() {
            debug!(reported, "Unusable image format, assuming jpeg");
        }
        DEFAULT_FORMAT.as_str().to_string()
    }
}

/// Image returned by a capture call. Owned entirely by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub bytes: Bytes,
    /// e.g. `image/jpeg`
    pub mime_type: String,
    /// `photo_<unix-millis>.<format>`
    pub suggested_file_name: String,
}

impl CapturedImage {
    fn new(bytes: Vec<u8>, format: &str, timestamp_millis: i64) -> Self {
        let format = normalize_format(format);
        Self {
            bytes: Bytes::from(bytes),
            mime_type: format!("image/{format}"),
            suggested_file_name: format!("photo_{timestamp_millis}.{format}"),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `data:` URL suitable for an `<img src>` preview
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

/// Platform-independent camera access
#[derive(Clone)]
pub struct CameraCapture {
    platform: PlatformDetector,
    camera: Option<Arc<dyn NativeCamera>>,
    settings: CameraSettings,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for CameraCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraCapture")
            .field("platform", &self.platform.kind())
            .field("camera", &self.camera.as_ref().map(|_| "NativeCamera { ... }"))
            .field("settings", &self.settings)
            .finish()
    }
}

impl CameraCapture {
    /// Build the capture component for the configured platform.
    ///
    /// # Errors
    ///
    /// `CapabilityMissing` on iOS/Android without a camera bridge. Web needs
    /// no bridge.
    pub fn from_config(config: &CapabilityConfig) -> Result<Self> {
        let platform = PlatformDetector::from_config(config);
        let camera = if platform.is_native() {
            Some(config.native_camera.clone().ok_or_else(|| {
                Error::missing(
                    "NativeCamera",
                    format!("capture on {} needs a camera bridge", platform.kind()),
                )
            })?)
        } else {
            None
        };

        Ok(Self {
            platform,
            camera,
            settings: config.camera,
            clock: config.clock.clone(),
        })
    }

    pub fn platform(&self) -> PlatformDetector {
        self.platform
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Capture a photo with the device camera.
    pub async fn take_photo(&self) -> Option<CapturedImage> {
        self.capture(PhotoSource::Camera).await
    }

    /// Pick an existing photo from the library.
    pub async fn pick_image(&self) -> Option<CapturedImage> {
        self.capture(PhotoSource::Photos).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn capture(&self, source: PhotoSource) -> Option<CapturedImage> {
        let Some(camera) = &self.camera else {
            debug!("Capture is not available on web");
            return None;
        };

        match self.acquire(camera.as_ref(), source).await {
            Outcome::Value(image) => {
                debug!(bytes = image.len(), mime_type = %image.mime_type, "Capture succeeded");
                Some(image)
            }
            Outcome::Absent => {
                debug!("Capture returned no image data");
                None
            }
            Outcome::Failed(error) if error.is_cancellation() => {
                debug!(reason = %error, "Capture cancelled by user");
                None
            }
            Outcome::Failed(error) => {
                warn!(error = %error, "Capture failed");
                None
            }
        }
    }

    async fn acquire(&self, camera: &dyn NativeCamera, source: PhotoSource) -> Outcome<CapturedImage> {
        let request = self.settings.request(source);
        let raw = match camera.get_photo(&request).await {
            Ok(raw) => raw,
            Err(error) => return Outcome::Failed(error),
        };

        let data = match raw.base64_data.as_deref().map(str::trim) {
            Some(data) if !data.is_empty() => data,
            _ => return Outcome::Absent,
        };

        match STANDARD.decode(data) {
            Ok(bytes) => Outcome::Value(CapturedImage::new(
                bytes,
                &raw.format,
                self.clock.unix_timestamp_millis(),
            )),
            Err(e) => Outcome::Failed(BridgeError::Decode(format!("photo payload: {e}"))),
        }
    }

    /// Current camera grant state, without prompting.
    ///
    /// Web reports `Granted`; a bridge fault reports `Unknown`.
    pub async fn camera_permission_state(&self) -> PermissionState {
        let Some(camera) = &self.camera else {
            return PermissionState::Granted;
        };

        match camera.check_permissions().await {
            Ok(permissions) => permissions.camera,
            Err(error) => {
                warn!(error = %error, "Failed to check camera permission");
                PermissionState::Unknown
            }
        }
    }

    pub async fn check_camera_permission(&self) -> bool {
        self.camera_permission_state().await.is_granted()
    }

    /// Prompt for camera access if undecided.
    pub async fn request_camera_permission(&self) -> bool {
        let Some(camera) = &self.camera else {
            return true;
        };

        match camera.request_permissions(&[PermissionKind::Camera]).await {
            Ok(permissions) => {
                debug!(camera = ?permissions.camera, "Camera permission requested");
                permissions.camera.is_granted()
            }
            Err(error) => {
                warn!(error = %error, "Failed to request camera permission");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_headless::FixtureCamera;
    use bridge_traits::{CameraPermissions, PhotoRequest, PlatformKind, RawPhoto};
    use chrono::{DateTime, TimeZone, Utc};
    use mockall::mock;

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            Utc.timestamp_millis_opt(1_700_000_000_123).unwrap()
        }
    }

    mock! {
        pub Camera {}

        #[async_trait::async_trait]
        impl NativeCamera for Camera {
            async fn get_photo(&self, request: &PhotoRequest) -> bridge_traits::error::Result<RawPhoto>;
            async fn check_permissions(&self) -> bridge_traits::error::Result<CameraPermissions>;
            async fn request_permissions(&self, permissions: &[PermissionKind]) -> bridge_traits::error::Result<CameraPermissions>;
        }
    }

    fn native_capture(camera: Arc<dyn NativeCamera>) -> CameraCapture {
        let config = CapabilityConfig::builder()
            .platform(PlatformKind::Android)
            .native_preferences(Arc::new(bridge_headless::MemoryPreferences::new()))
            .native_connectivity(Arc::new(bridge_headless::SimulatedNativeConnectivity::new(
                bridge_traits::NetworkStatus::offline(),
            )))
            .native_camera(camera)
            .clock(Arc::new(FixedClock))
            .build()
            .unwrap();
        CameraCapture::from_config(&config).unwrap()
    }

    fn web_capture() -> CameraCapture {
        let config = CapabilityConfig::builder()
            .platform(PlatformKind::Web)
            .browser_storage(Arc::new(bridge_headless::MemoryBrowserStorage::new()))
            .browser_connectivity(Arc::new(bridge_headless::SimulatedBrowserConnectivity::new(
                true,
            )))
            .build()
            .unwrap();
        CameraCapture::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn test_web_has_no_capture_and_grants_permission() {
        let capture = web_capture();
        assert_eq!(capture.take_photo().await, None);
        assert_eq!(capture.pick_image().await, None);
        assert!(capture.check_camera_permission().await);
        assert!(capture.request_camera_permission().await);
        assert_eq!(capture.camera_permission_state().await, PermissionState::Granted);
    }

    #[tokio::test]
    async fn test_take_photo_decodes_payload() {
        let camera = Arc::new(FixtureCamera::new().with_photo(vec![1, 2, 3, 4], "jpeg"));
        let capture = native_capture(camera.clone());

        let image = capture.take_photo().await.unwrap();
        assert_eq!(image.bytes.as_ref(), &[1, 2, 3, 4]);
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.suggested_file_name, "photo_1700000000123.jpeg");

        let requests = camera.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].source, PhotoSource::Camera);
        assert_eq!(requests[0].quality, 90);
        assert!(!requests[0].allow_editing);
        assert!(requests[0].correct_orientation);
        assert!(!requests[0].save_to_gallery);
        assert_eq!(requests[0].preferred_format, ImageFormat::Jpeg);
    }

    #[tokio::test]
    async fn test_pick_image_uses_library_source() {
        let camera = Arc::new(FixtureCamera::new().with_photo(vec![9], "PNG"));
        let capture = native_capture(camera.clone());

        let image = capture.pick_image().await.unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert!(image.suggested_file_name.ends_with(".png"));
        assert_eq!(camera.requests()[0].source, PhotoSource::Photos);
    }

    #[tokio::test]
    async fn test_declined_and_failed_captures_are_none() {
        let capture = native_capture(Arc::new(FixtureCamera::new().cancelled()));
        assert_eq!(capture.take_photo().await, None);

        let capture = native_capture(Arc::new(FixtureCamera::new()));
        assert_eq!(capture.take_photo().await, None);

        let capture = native_capture(Arc::new(FixtureCamera::new().failing("camera busy")));
        assert_eq!(capture.pick_image().await, None);
    }

    #[tokio::test]
    async fn test_undecodable_payload_is_none() {
        let mut camera = MockCamera::new();
        camera.expect_get_photo().returning(|_| {
            Ok(RawPhoto {
                base64_data: Some("***".to_string()),
                format: "jpeg".to_string(),
            })
        });
        let capture = native_capture(Arc::new(camera));
        assert_eq!(capture.take_photo().await, None);
    }

    #[tokio::test]
    async fn test_missing_format_defaults_to_jpeg() {
        let mut camera = MockCamera::new();
        camera.expect_get_photo().returning(|_| {
            Ok(RawPhoto {
                base64_data: Some(STANDARD.encode([7u8, 7, 7])),
                format: String::new(),
            })
        });
        let capture = native_capture(Arc::new(camera));

        let image = capture.take_photo().await.unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.to_data_url(), "data:image/jpeg;base64,BwcH");
    }

    #[tokio::test]
    async fn test_mime_type_format_is_reduced_to_subtype() {
        let mut camera = MockCamera::new();
        camera.expect_get_photo().returning(|_| {
            Ok(RawPhoto {
                base64_data: Some(STANDARD.encode([1u8])),
                format: "image/JPEG".to_string(),
            })
        });
        let capture = native_capture(Arc::new(camera));

        let image = capture.take_photo().await.unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.suggested_file_name, "photo_1700000000123.jpeg");
    }

    #[test]
    fn test_unusable_formats_fall_back_to_jpeg() {
        assert_eq!(normalize_format("webp"), "webp");
        assert_eq!(normalize_format(" image/png "), "png");
        assert_eq!(normalize_format("heic2"), "heic2");
        assert_eq!(normalize_format("../etc/passwd"), "jpeg");
        assert_eq!(normalize_format("image/svg+xml"), "jpeg");
        assert_eq!(normalize_format("image/"), "jpeg");
        assert_eq!(normalize_format(""), "jpeg");

        let image = CapturedImage::new(vec![0], "x/y", 5);
        assert_eq!(image.suggested_file_name, "photo_5.jpeg");
        assert!(!image.suggested_file_name.contains('/'));
    }

    #[tokio::test]
    async fn test_permission_projection() {
        let capture = native_capture(Arc::new(
            FixtureCamera::new().with_permission(PermissionState::Granted),
        ));
        assert!(capture.check_camera_permission().await);

        let capture = native_capture(Arc::new(
            FixtureCamera::new().with_permission(PermissionState::Denied),
        ));
        assert!(!capture.check_camera_permission().await);
        assert!(!capture.request_camera_permission().await);

        let capture = native_capture(Arc::new(
            FixtureCamera::new().with_prompt_answer(PermissionState::Granted),
        ));
        assert_eq!(capture.camera_permission_state().await, PermissionState::Unknown);
        assert!(!capture.check_camera_permission().await);
        assert!(capture.request_camera_permission().await);
        assert!(capture.check_camera_permission().await);
    }

    #[tokio::test]
    async fn test_permission_faults_are_not_granted() {
        let capture = native_capture(Arc::new(
            FixtureCamera::new()
                .with_permission(PermissionState::Granted)
                .with_failing_permissions(),
        ));

        assert_eq!(capture.camera_permission_state().await, PermissionState::Unknown);
        assert!(!capture.check_camera_permission().await);
        assert!(!capture.request_camera_permission().await);
    }
}
