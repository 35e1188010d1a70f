use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::cvd::{CvdProcessRequest, CvdSnapshot, SetCvdTypeRequest, SetImageRequest},
    error::AppError,
    services::cvd_service,
    state::SharedState,
};

/// Routes for color-vision-deficiency simulation sessions.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/cvd/sessions", post(create_session))
        .route("/cvd/sessions/{id}", get(get_session).delete(close_session))
        .route("/cvd/sessions/{id}/type", put(set_cvd_type))
        .route("/cvd/sessions/{id}/image", put(set_image))
        .route("/cvd/sessions/{id}/capture", post(capture_preview))
        .route("/cvd/sessions/{id}/process", post(process))
}

/// Open a new CVD session.
#[utoipa::path(
    post,
    path = "/cvd/sessions",
    operation_id = "create_cvd_session",
    tag = "cvd",
    responses(
        (status = 200, description = "CVD session created", body = CvdSnapshot)
    )
)]
pub async fn create_session(State(state): State<SharedState>) -> Json<CvdSnapshot> {
    Json(cvd_service::create_session(&state))
}

/// Retrieve a CVD session snapshot.
#[utoipa::path(
    get,
    path = "/cvd/sessions/{id}",
    operation_id = "get_cvd_session",
    tag = "cvd",
    params(("id" = String, Path, description = "CVD session identifier")),
    responses(
        (status = 200, description = "CVD session snapshot", body = CvdSnapshot)
    )
)]
pub async fn get_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CvdSnapshot>, AppError> {
    let snapshot = cvd_service::session_snapshot(&state, id)?;
    Ok(Json(snapshot))
}

/// Close a CVD session.
#[utoipa::path(
    delete,
    path = "/cvd/sessions/{id}",
    operation_id = "close_cvd_session",
    tag = "cvd",
    params(("id" = String, Path, description = "CVD session identifier")),
    responses(
        (status = 204, description = "CVD session closed")
    )
)]
pub async fn close_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<axum::http::StatusCode, AppError> {
    cvd_service::close_session(&state, id)?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// Select the deficiency type to simulate or correct.
#[utoipa::path(
    put,
    path = "/cvd/sessions/{id}/type",
    tag = "cvd",
    params(("id" = String, Path, description = "CVD session identifier")),
    request_body = SetCvdTypeRequest,
    responses(
        (status = 200, description = "Type selected", body = CvdSnapshot)
    )
)]
pub async fn set_cvd_type(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetCvdTypeRequest>,
) -> Result<Json<CvdSnapshot>, AppError> {
    let snapshot = cvd_service::set_cvd_type(&state, id, payload)?;
    Ok(Json(snapshot))
}

/// Install a picked image as the session preview.
#[utoipa::path(
    put,
    path = "/cvd/sessions/{id}/image",
    tag = "cvd",
    params(("id" = String, Path, description = "CVD session identifier")),
    request_body = SetImageRequest,
    responses(
        (status = 200, description = "Preview installed", body = CvdSnapshot)
    )
)]
pub async fn set_image(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<SetImageRequest>>,
) -> Result<Json<CvdSnapshot>, AppError> {
    let snapshot = cvd_service::set_image(&state, id, payload)?;
    Ok(Json(snapshot))
}

/// Capture a camera photo into the session preview.
#[utoipa::path(
    post,
    path = "/cvd/sessions/{id}/capture",
    tag = "cvd",
    params(("id" = String, Path, description = "CVD session identifier")),
    responses(
        (status = 200, description = "Preview captured", body = CvdSnapshot)
    )
)]
pub async fn capture_preview(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CvdSnapshot>, AppError> {
    let snapshot = cvd_service::capture_preview(&state, id).await?;
    Ok(Json(snapshot))
}

/// Run one daltonization pass over the current preview.
#[utoipa::path(
    post,
    path = "/cvd/sessions/{id}/process",
    tag = "cvd",
    params(("id" = String, Path, description = "CVD session identifier")),
    request_body = CvdProcessRequest,
    responses(
        (status = 200, description = "Preview transformed", body = CvdSnapshot)
    )
)]
pub async fn process(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<CvdProcessRequest>>,
) -> Result<Json<CvdSnapshot>, AppError> {
    let snapshot = cvd_service::process(&state, id, payload).await?;
    Ok(Json(snapshot))
}
