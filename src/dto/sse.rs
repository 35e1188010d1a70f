use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::{color::DetectedColor, detector::DetectorPhaseDto};

#[derive(Clone, Debug)]
/// Dispatched payload carried across the SSE channel.
pub struct ServerEvent {
    /// Optional SSE event name.
    pub event: Option<String>,
    /// Serialized JSON data field.
    pub data: String,
}

impl ServerEvent {
    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Initial metadata sent to an SSE client when it connects.
pub struct Handshake {
    /// Human-readable message confirming the subscription.
    pub message: String,
    /// Whether the classifier collaborator is currently unavailable.
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast whenever a detection session publishes a resolved color.
pub struct ReadingEvent {
    /// Session that produced the reading.
    pub session_id: Uuid,
    /// The resolved color.
    pub reading: DetectedColor,
    /// RFC 3339 timestamp of the resolution.
    pub observed_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast whenever a detection session changes phase.
pub struct PhaseChangedEvent {
    /// Session whose phase changed.
    pub session_id: Uuid,
    /// The new phase.
    pub phase: DetectorPhaseDto,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the classifier collaborator becomes available or is lost.
pub struct ClassifierStatusEvent {
    /// True while no classifier is installed.
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a CVD session's preview image changes.
pub struct PreviewUpdatedEvent {
    /// CVD session whose preview changed.
    pub session_id: Uuid,
    /// Reference to the new preview image.
    pub preview: String,
}
