use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::bridge::{
    classifier::{ClassifierBridge, Prediction},
    error::{BridgeError, BridgeResult},
};

/// Classifier collaborator reached over HTTP with JSON payloads.
#[derive(Clone)]
pub struct HttpClassifier {
    client: Client,
    base_url: Arc<str>,
}

#[derive(Serialize)]
struct InitRequest<'a> {
    asset: &'a str,
}

#[derive(Serialize)]
struct PixelRequest {
    r: f64,
    g: f64,
    b: f64,
}

#[derive(Serialize)]
struct SampleRequest<'a> {
    path: &'a str,
    x: f64,
    y: f64,
}

impl HttpClassifier {
    /// Build a client for the classifier service at `base_url`.
    pub fn new(base_url: &str) -> BridgeResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| BridgeError::transport(base_url, "building http client", source))?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        self.client.request(method, url)
    }

    /// Send a JSON request and parse the response body as serialized text.
    async fn call<B, T>(&self, path: &str, body: &B) -> BridgeResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::POST, path)
            .json(body)
            .send()
            .await
            .map_err(|source| BridgeError::transport(path, "sending request", source))?;

        if !response.status().is_success() {
            return Err(BridgeError::Status {
                endpoint: path.to_string(),
                status: response.status().as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|source| BridgeError::transport(path, "reading response body", source))?;

        serde_json::from_str(&text).map_err(|source| BridgeError::malformed(path, source))
    }
}

impl ClassifierBridge for HttpClassifier {
    fn init_model(&self, asset_name: &str) -> BoxFuture<'static, BridgeResult<bool>> {
        let bridge = self.clone();
        let asset = asset_name.to_string();
        Box::pin(async move { bridge.call("model/init", &InitRequest { asset: &asset }).await })
    }

    fn predict_pixel(
        &self,
        nr: f64,
        ng: f64,
        nb: f64,
    ) -> BoxFuture<'static, BridgeResult<Prediction>> {
        let bridge = self.clone();
        Box::pin(async move {
            bridge
                .call("predict/pixel", &PixelRequest { r: nr, g: ng, b: nb })
                .await
        })
    }

    fn sample_image_at(
        &self,
        file_path: &str,
        nx: f64,
        ny: f64,
    ) -> BoxFuture<'static, BridgeResult<Prediction>> {
        let bridge = self.clone();
        let path = file_path.to_string();
        Box::pin(async move {
            bridge
                .call(
                    "sample",
                    &SampleRequest {
                        path: &path,
                        x: nx,
                        y: ny,
                    },
                )
                .await
        })
    }

    fn health_check(&self) -> BoxFuture<'static, BridgeResult<()>> {
        let bridge = self.clone();
        Box::pin(async move {
            const HEALTHZ: &str = "healthz";
            let response = bridge
                .request(Method::GET, HEALTHZ)
                .send()
                .await
                .map_err(|source| BridgeError::transport(HEALTHZ, "sending request", source))?;

            if response.status().is_success() {
                Ok(())
            } else {
                Err(BridgeError::Status {
                    endpoint: HEALTHZ.to_string(),
                    status: response.status().as_u16(),
                })
            }
        })
    }
}
