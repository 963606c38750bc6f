//! Fixture camera

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bridge_traits::{
    camera::{
        CameraPermissions, NativeCamera, PermissionKind, PermissionState, PhotoRequest, RawPhoto,
    },
    error::{BridgeError, Result},
};
use std::sync::Mutex;
use tracing::debug;

use crate::lock;

/// What the next `get_photo` call produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureScript {
    /// Deliver these image bytes in the given format
    Photo { bytes: Vec<u8>, format: String },
    /// Complete without a payload
    NoData,
    /// The user dismissed the camera
    Cancelled,
    /// The platform reported an error
    Fail(String),
}

#[derive(Debug)]
struct PermissionScript {
    camera: PermissionState,
    photos: PermissionState,
    prompt_answer: PermissionState,
    failing: bool,
}

/// Camera that replays a scripted result
///
/// Every request is recorded and can be inspected with
/// [`requests`](Self::requests).
#[derive(Debug)]
pub struct FixtureCamera {
    script: Mutex<CaptureScript>,
    permissions: Mutex<PermissionScript>,
    requests: Mutex<Vec<PhotoRequest>>,
}

impl Default for FixtureCamera {
    fn default() -> Self {
        Self {
            script: Mutex::new(CaptureScript::NoData),
            permissions: Mutex::new(PermissionScript {
                camera: PermissionState::Unknown,
                photos: PermissionState::Unknown,
                prompt_answer: PermissionState::Granted,
                failing: false,
            }),
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl FixtureCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_photo(self, bytes: impl Into<Vec<u8>>, format: impl Into<String>) -> Self {
        self.script(CaptureScript::Photo {
            bytes: bytes.into(),
            format: format.into(),
        })
    }

    pub fn cancelled(self) -> Self {
        self.script(CaptureScript::Cancelled)
    }

    pub fn failing(self, message: impl Into<String>) -> Self {
        self.script(CaptureScript::Fail(message.into()))
    }

    /// Replace the capture result for subsequent calls
    pub fn script(self, script: CaptureScript) -> Self {
        *lock(&self.script) = script;
        self
    }

    /// Current grant state for both camera and photo library
    pub fn with_permission(self, state: PermissionState) -> Self {
        {
            let mut permissions = lock(&self.permissions);
            permissions.camera = state;
            permissions.photos = state;
        }
        self
    }

    /// What the simulated user answers when prompted
    pub fn with_prompt_answer(self, answer: PermissionState) -> Self {
        lock(&self.permissions).prompt_answer = answer;
        self
    }

    /// Make permission queries and prompts fail
    pub fn with_failing_permissions(self) -> Self {
        lock(&self.permissions).failing = true;
        self
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<PhotoRequest> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl NativeCamera for FixtureCamera {
    async fn get_photo(&self, request: &PhotoRequest) -> Result<RawPhoto> {
        lock(&self.requests).push(request.clone());
        debug!(source = ?request.source, quality = request.quality, "Fixture camera invoked");

        match lock(&self.script).clone() {
            CaptureScript::Photo { bytes, format } => Ok(RawPhoto {
                base64_data: Some(STANDARD.encode(bytes)),
                format,
            }),
            CaptureScript::NoData => Ok(RawPhoto {
                base64_data: None,
                format: String::new(),
            }),
            CaptureScript::Cancelled => {
                Err(BridgeError::Cancelled("User cancelled photos app".to_string()))
            }
            CaptureScript::Fail(message) => Err(BridgeError::OperationFailed(message)),
        }
    }

    async fn check_permissions(&self) -> Result<CameraPermissions> {
        let permissions = lock(&self.permissions);
        if permissions.failing {
            return Err(BridgeError::OperationFailed(
                "permission query failed".to_string(),
            ));
        }
        Ok(CameraPermissions {
            camera: permissions.camera,
            photos: permissions.photos,
        })
    }

    async fn request_permissions(
        &self,
        kinds: &[PermissionKind],
    ) -> Result<CameraPermissions> {
        let mut permissions = lock(&self.permissions);
        if permissions.failing {
            return Err(BridgeError::OperationFailed(
                "permission prompt failed".to_string(),
            ));
        }

        let answer = permissions.prompt_answer;
        for kind in kinds {
            let slot = match kind {
                PermissionKind::Camera => &mut permissions.camera,
                PermissionKind::Photos => &mut permissions.photos,
            };
            if *slot == PermissionState::Unknown {
                *slot = answer;
            }
        }

        Ok(CameraPermissions {
            camera: permissions.camera,
            photos: permissions.photos,
        })
    }
}
