use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with a health payload reflecting classifier availability.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    if let Some(classifier) = state.classifier().await {
        if let Err(err) = classifier.health_check().await {
            warn!(error = %err, "classifier health check failed");
        }
    } else {
        warn!("classifier unavailable (degraded mode)");
    }

    if state.is_degraded().await {
        HealthResponse::degraded()
    } else {
        HealthResponse::ok()
    }
}
