use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::Client;

use crate::bridge::{
    camera::{CameraBridge, CapturedPhoto},
    error::{BridgeError, BridgeResult},
};

const CAPTURE_ENDPOINT: &str = "capture";

/// Camera collaborator reached over HTTP.
#[derive(Clone)]
pub struct HttpCamera {
    client: Client,
    base_url: Arc<str>,
}

impl HttpCamera {
    /// Build a client for the camera service at `base_url`.
    pub fn new(base_url: &str) -> BridgeResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| BridgeError::transport(base_url, "building http client", source))?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }
}

impl CameraBridge for HttpCamera {
    fn capture_photo(&self) -> BoxFuture<'static, BridgeResult<CapturedPhoto>> {
        let bridge = self.clone();
        Box::pin(async move {
            let url = format!("{}/{}", bridge.base_url, CAPTURE_ENDPOINT);
            let response = bridge.client.post(&url).send().await.map_err(|source| {
                BridgeError::transport(CAPTURE_ENDPOINT, "sending request", source)
            })?;

            if !response.status().is_success() {
                return Err(BridgeError::Status {
                    endpoint: CAPTURE_ENDPOINT.to_string(),
                    status: response.status().as_u16(),
                });
            }

            let text = response.text().await.map_err(|source| {
                BridgeError::transport(CAPTURE_ENDPOINT, "reading response body", source)
            })?;

            serde_json::from_str(&text)
                .map_err(|source| BridgeError::malformed(CAPTURE_ENDPOINT, source))
        })
    }
}
