#[cfg(feature = "http-bridge")]
mod http;

#[cfg(feature = "http-bridge")]
pub use http::HttpDaltonizer;

use futures::future::BoxFuture;
use serde::Deserialize;

use crate::bridge::error::BridgeResult;

/// Response shape of a completed daltonization: older collaborator builds
/// answer with a raw output path, newer ones with a `{ "uri": ... }` object.
/// Both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ProcessedImage {
    /// Raw path to the transformed image on disk.
    Path(String),
    /// Object form carrying the output location.
    Uri {
        /// URI of the transformed image.
        uri: String,
    },
}

impl ProcessedImage {
    /// The output image reference regardless of the response shape.
    pub fn into_uri(self) -> String {
        match self {
            ProcessedImage::Path(path) => format!("file://{path}"),
            ProcessedImage::Uri { uri } => uri,
        }
    }
}

/// Abstraction over the daltonization collaborator.
///
/// Unlike the classification calls, failures here are surfaced to the caller:
/// the user is told processing failed and the previous preview is kept.
pub trait DaltonizerBridge: Send + Sync {
    /// Apply the CVD transform identified by `cvd_code` (0 = Protanopia,
    /// 1 = Deuteranopia, 2 = Tritanopia) at the given severity to the image
    /// at `path`, returning a reference to the transformed image.
    fn process_image(
        &self,
        path: &str,
        cvd_code: u8,
        severity: f64,
    ) -> BoxFuture<'static, BridgeResult<ProcessedImage>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_raw_path_shape() {
        let parsed: ProcessedImage = serde_json::from_str(r#""/tmp/out.jpg""#).unwrap();
        assert_eq!(parsed.into_uri(), "file:///tmp/out.jpg");
    }

    #[test]
    fn accepts_uri_object_shape() {
        let parsed: ProcessedImage =
            serde_json::from_str(r#"{"uri":"file:///tmp/out.jpg"}"#).unwrap();
        assert_eq!(parsed.into_uri(), "file:///tmp/out.jpg");
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(serde_json::from_str::<ProcessedImage>("42").is_err());
        assert!(serde_json::from_str::<ProcessedImage>(r#"{"path": 1}"#).is_err());
    }
}
