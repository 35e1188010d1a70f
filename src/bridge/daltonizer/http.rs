use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::Client;
use serde::Serialize;

use crate::bridge::{
    daltonizer::{DaltonizerBridge, ProcessedImage},
    error::{BridgeError, BridgeResult},
};

const PROCESS_ENDPOINT: &str = "process";

/// Daltonizer collaborator reached over HTTP with JSON payloads.
#[derive(Clone)]
pub struct HttpDaltonizer {
    client: Client,
    base_url: Arc<str>,
}

#[derive(Serialize)]
struct ProcessRequest<'a> {
    path: &'a str,
    cvd_code: u8,
    severity: f64,
}

impl HttpDaltonizer {
    /// Build a client for the daltonizer service at `base_url`.
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

impl DaltonizerBridge for HttpDaltonizer {
    fn process_image(
        &self,
        path: &str,
        cvd_code: u8,
        severity: f64,
    ) -> BoxFuture<'static, BridgeResult<ProcessedImage>> {
        let bridge = self.clone();
        let path = path.to_string();
        Box::pin(async move {
            let url = format!("{}/{}", bridge.base_url, PROCESS_ENDPOINT);
            let response = bridge
                .client
                .post(&url)
                .json(&ProcessRequest {
                    path: &path,
                    cvd_code,
                    severity,
                })
                .send()
                .await
                .map_err(|source| {
                    BridgeError::transport(PROCESS_ENDPOINT, "sending request", source)
                })?;

            if !response.status().is_success() {
                return Err(BridgeError::Status {
                    endpoint: PROCESS_ENDPOINT.to_string(),
                    status: response.status().as_u16(),
                });
            }

            let text = response.text().await.map_err(|source| {
                BridgeError::transport(PROCESS_ENDPOINT, "reading response body", source)
            })?;

            serde_json::from_str(&text)
                .map_err(|source| BridgeError::malformed(PROCESS_ENDPOINT, source))
        })
    }
}
