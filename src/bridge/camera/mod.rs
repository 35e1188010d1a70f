#[cfg(feature = "http-bridge")]
mod http;

#[cfg(feature = "http-bridge")]
pub use http::HttpCamera;

use futures::future::BoxFuture;
use serde::Deserialize;

use crate::bridge::error::BridgeResult;

/// A still photo captured by the camera collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CapturedPhoto {
    /// Path of the captured image on disk.
    pub path: String,
}

/// Abstraction over the camera collaborator owning frame acquisition.
///
/// The camera is exclusively owned by one session at a time; capture failure
/// is expected (device busy, permission revoked) and callers degrade quietly.
pub trait CameraBridge: Send + Sync {
    /// Request a still photo or the best available snapshot.
    fn capture_photo(&self) -> BoxFuture<'static, BridgeResult<CapturedPhoto>>;
}
