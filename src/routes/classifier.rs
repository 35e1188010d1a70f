use axum::{Json, Router, extract::State, routing::post};
use axum_valid::Valid;

use crate::{
    dto::{color::DetectedColor, detector::PredictRequest},
    services::resolution,
    state::SharedState,
};

/// Routes exposing the raw classification surface.
pub fn router() -> Router<SharedState> {
    Router::new().route("/classifier/predict", post(predict))
}

/// Classify a normalized RGB sample.
///
/// Always answers: when no classifier is installed or the call fails, the
/// response is the `Unknown` sentinel rather than an error.
#[utoipa::path(
    post,
    path = "/classifier/predict",
    tag = "classifier",
    request_body = PredictRequest,
    responses(
        (status = 200, description = "Classification result", body = DetectedColor)
    )
)]
pub async fn predict(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<PredictRequest>>,
) -> Json<DetectedColor> {
    let reading = resolution::predict_normalized(&state, payload.nr, payload.ng, payload.nb).await;
    Json(reading)
}
