use std::sync::Arc;

use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::bridge::{
    error::{BridgeError, BridgeResult},
    speech::SpeechBridge,
};

/// Text-to-speech collaborator reached over HTTP.
///
/// Requests are spawned and forgotten; the outcome is only logged at debug.
#[derive(Clone)]
pub struct HttpSpeech {
    client: Client,
    base_url: Arc<str>,
}

#[derive(Serialize)]
struct SpeakRequest<'a> {
    text: &'a str,
}

impl HttpSpeech {
    /// Build a client for the TTS service at `base_url`.
    pub fn new(base_url: &str) -> BridgeResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| BridgeError::transport(base_url, "building http client", source))?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }

    fn send(&self, path: &'static str, body: Option<String>) {
        let client = self.client.clone();
        let url = format!("{}/{}", self.base_url, path);
        tokio::spawn(async move {
            let request = match body {
                Some(json) => client
                    .post(&url)
                    .header("content-type", "application/json")
                    .body(json),
                None => client.post(&url),
            };
            match request.send().await {
                Ok(response) if !response.status().is_success() => {
                    debug!(%url, status = %response.status(), "speech request rejected");
                }
                Ok(_) => {}
                Err(err) => debug!(%url, error = %err, "speech request failed"),
            }
        });
    }
}

impl SpeechBridge for HttpSpeech {
    fn speak(&self, text: &str) {
        match serde_json::to_string(&SpeakRequest { text }) {
            Ok(json) => self.send("speak", Some(json)),
            Err(err) => debug!(error = %err, "failed to encode speak payload"),
        }
    }

    fn stop(&self) {
        self.send("stop", None);
    }
}
