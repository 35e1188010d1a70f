#[cfg(feature = "http-bridge")]
mod http;

#[cfg(feature = "http-bridge")]
pub use http::HttpClassifier;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::bridge::error::BridgeResult;

/// Color payload reported by the classifier collaborator.
///
/// The `hex`/`rgb`/`hsv` fields are authoritative as received: results that
/// crossed this boundary are never re-derived locally. `confidence` is present
/// only for probabilistic classifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Prediction {
    /// Human-readable color name.
    pub name: String,
    /// Hex representation, e.g. `#FF0000`.
    pub hex: String,
    /// Formatted RGB triple, e.g. `(255, 0, 0)`.
    pub rgb: String,
    /// Formatted HSV triple, e.g. `(0°, 100%, 100%)`.
    pub hsv: String,
    /// Classifier confidence in `[0, 1]` when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Prediction {
    /// Sentinel answer used where the caller's contract is total: the surface
    /// must produce something even when the collaborator is unavailable.
    pub fn unknown() -> Self {
        Self {
            name: "Unknown".into(),
            hex: "#000000".into(),
            rgb: "(0,0,0)".into(),
            hsv: "(0,0,0)".into(),
            confidence: None,
        }
    }
}

/// Abstraction over the on-device color classification model.
///
/// The model is effectively read-only once initialised and may serve any
/// number of concurrent prediction calls.
pub trait ClassifierBridge: Send + Sync {
    /// One-time model initialisation with the given asset identifier.
    /// Idempotent from the caller's perspective.
    fn init_model(&self, asset_name: &str) -> BoxFuture<'static, BridgeResult<bool>>;

    /// Classify a normalized RGB sample, each channel in `[0, 1]`.
    fn predict_pixel(&self, nr: f64, ng: f64, nb: f64)
    -> BoxFuture<'static, BridgeResult<Prediction>>;

    /// Decode the image at `file_path` and report the true pixel color at the
    /// normalized position `(nx, ny)`.
    fn sample_image_at(
        &self,
        file_path: &str,
        nx: f64,
        ny: f64,
    ) -> BoxFuture<'static, BridgeResult<Prediction>>;

    /// Cheap reachability probe used by the supervisor.
    fn health_check(&self) -> BoxFuture<'static, BridgeResult<()>>;
}
