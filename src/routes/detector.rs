use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::{
        color::DetectedColor,
        detector::{CreateSessionRequest, SessionSnapshot, TapRequest},
    },
    error::AppError,
    services::detector_service,
    state::SharedState,
};

/// Routes managing detection sessions and their resolutions.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", get(get_session).delete(close_session))
        .route("/sessions/{id}/tap", post(tap))
        .route("/sessions/{id}/freeze", post(freeze))
        .route("/sessions/{id}/unfreeze", post(unfreeze))
        .route("/sessions/{id}/sampling/start", post(start_sampling))
        .route("/sessions/{id}/sampling/stop", post(stop_sampling))
        .route("/sessions/{id}/voice/toggle", post(toggle_voice))
        .route("/sessions/{id}/color-codes/toggle", post(toggle_color_codes))
}

/// Open a new detection session.
#[utoipa::path(
    post,
    path = "/sessions",
    tag = "detector",
    request_body = CreateSessionRequest,
    responses(
        (status = 200, description = "Session created", body = SessionSnapshot)
    )
)]
pub async fn create_session(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateSessionRequest>>,
) -> Json<SessionSnapshot> {
    let snapshot = detector_service::create_session(&state, payload).await;
    Json(snapshot)
}

/// Retrieve a session snapshot.
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    tag = "detector",
    params(("id" = String, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Session snapshot", body = SessionSnapshot)
    )
)]
pub async fn get_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = detector_service::session_snapshot(&state, id).await?;
    Ok(Json(snapshot))
}

/// Close a session, aborting any live sampling.
#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    tag = "detector",
    params(("id" = String, Path, description = "Session identifier")),
    responses(
        (status = 204, description = "Session closed")
    )
)]
pub async fn close_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<axum::http::StatusCode, AppError> {
    detector_service::close_session(&state, id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// Resolve the color under a tapped coordinate of a frozen frame.
#[utoipa::path(
    post,
    path = "/sessions/{id}/tap",
    tag = "detector",
    params(("id" = String, Path, description = "Session identifier")),
    request_body = TapRequest,
    responses(
        (status = 200, description = "Resolved color", body = DetectedColor)
    )
)]
pub async fn tap(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<TapRequest>>,
) -> Result<Json<DetectedColor>, AppError> {
    let reading = detector_service::tap(&state, id, payload.x, payload.y).await?;
    Ok(Json(reading))
}

/// Freeze the viewfinder for tap-to-inspect.
#[utoipa::path(
    post,
    path = "/sessions/{id}/freeze",
    tag = "detector",
    params(("id" = String, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Session frozen", body = SessionSnapshot)
    )
)]
pub async fn freeze(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = detector_service::freeze(&state, id).await?;
    Ok(Json(snapshot))
}

/// Return to the live viewfinder.
#[utoipa::path(
    post,
    path = "/sessions/{id}/unfreeze",
    tag = "detector",
    params(("id" = String, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Session live again", body = SessionSnapshot)
    )
)]
pub async fn unfreeze(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = detector_service::unfreeze(&state, id).await?;
    Ok(Json(snapshot))
}

/// Start the fixed-interval live sampler.
#[utoipa::path(
    post,
    path = "/sessions/{id}/sampling/start",
    tag = "detector",
    params(("id" = String, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Sampling started", body = SessionSnapshot)
    )
)]
pub async fn start_sampling(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = detector_service::start_sampling(&state, id).await?;
    Ok(Json(snapshot))
}

/// Stop the live sampler.
#[utoipa::path(
    post,
    path = "/sessions/{id}/sampling/stop",
    tag = "detector",
    params(("id" = String, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Sampling stopped", body = SessionSnapshot)
    )
)]
pub async fn stop_sampling(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = detector_service::stop_sampling(&state, id).await?;
    Ok(Json(snapshot))
}

/// Flip voice narration for the session.
#[utoipa::path(
    post,
    path = "/sessions/{id}/voice/toggle",
    tag = "detector",
    params(("id" = String, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "New narration flag", body = bool)
    )
)]
pub async fn toggle_voice(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<bool>, AppError> {
    let enabled = detector_service::toggle_voice(&state, id).await?;
    Ok(Json(enabled))
}

/// Flip color code visibility for the session.
#[utoipa::path(
    post,
    path = "/sessions/{id}/color-codes/toggle",
    tag = "detector",
    params(("id" = String, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "New visibility flag", body = bool)
    )
)]
pub async fn toggle_color_codes(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<bool>, AppError> {
    let visible = detector_service::toggle_color_codes(&state, id)?;
    Ok(Json(visible))
}
