use std::time::SystemTime;

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::{
    dto::{
        color::DetectedColor,
        format_system_time,
        sse::{
            ClassifierStatusEvent, PhaseChangedEvent, PreviewUpdatedEvent, ReadingEvent,
            ServerEvent,
        },
    },
    state::{SharedState, detector::DetectorPhase},
};

const EVENT_READING: &str = "reading";
const EVENT_PHASE_CHANGED: &str = "detector.phase";
const EVENT_CLASSIFIER_STATUS: &str = "classifier.status";
const EVENT_PREVIEW_UPDATED: &str = "cvd.preview";

/// Broadcast a freshly published color reading.
pub fn broadcast_reading(state: &SharedState, session_id: Uuid, reading: &DetectedColor) {
    let payload = ReadingEvent {
        session_id,
        reading: reading.clone(),
        observed_at: format_system_time(SystemTime::now()),
    };
    send_event(state, EVENT_READING, &payload);
}

/// Broadcast a detection session phase change.
pub fn broadcast_phase_changed(state: &SharedState, session_id: Uuid, phase: DetectorPhase) {
    let payload = PhaseChangedEvent {
        session_id,
        phase: phase.into(),
    };
    send_event(state, EVENT_PHASE_CHANGED, &payload);
}

/// Broadcast that the classifier entered or left degraded mode.
pub fn broadcast_classifier_status(state: &SharedState, degraded: bool) {
    let payload = ClassifierStatusEvent { degraded };
    send_event(state, EVENT_CLASSIFIER_STATUS, &payload);
}

/// Broadcast a CVD session preview replacement.
pub fn broadcast_preview_updated(state: &SharedState, session_id: Uuid, preview: &str) {
    let payload = PreviewUpdatedEvent {
        session_id,
        preview: preview.to_string(),
    };
    send_event(state, EVENT_PREVIEW_UPDATED, &payload);
}

fn send_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize SSE payload"),
    }
}
