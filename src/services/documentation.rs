use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Color Lens Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::event_stream,
        crate::routes::detector::create_session,
        crate::routes::detector::get_session,
        crate::routes::detector::close_session,
        crate::routes::detector::tap,
        crate::routes::detector::freeze,
        crate::routes::detector::unfreeze,
        crate::routes::detector::start_sampling,
        crate::routes::detector::stop_sampling,
        crate::routes::detector::toggle_voice,
        crate::routes::detector::toggle_color_codes,
        crate::routes::classifier::predict,
        crate::routes::cvd::create_session,
        crate::routes::cvd::get_session,
        crate::routes::cvd::close_session,
        crate::routes::cvd::set_cvd_type,
        crate::routes::cvd::set_image,
        crate::routes::cvd::capture_preview,
        crate::routes::cvd::process,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::color::DetectedColor,
            crate::dto::detector::CreateSessionRequest,
            crate::dto::detector::TapRequest,
            crate::dto::detector::PredictRequest,
            crate::dto::detector::DetectorPhaseDto,
            crate::dto::detector::SessionSnapshot,
            crate::dto::cvd::SetCvdTypeRequest,
            crate::dto::cvd::SetImageRequest,
            crate::dto::cvd::CvdProcessRequest,
            crate::dto::cvd::CvdSnapshot,
            crate::dto::sse::Handshake,
            crate::dto::sse::ReadingEvent,
            crate::dto::sse::PhaseChangedEvent,
            crate::dto::sse::ClassifierStatusEvent,
            crate::dto::sse::PreviewUpdatedEvent,
            crate::state::cvd::CvdType,
            crate::bridge::classifier::Prediction,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "detector", description = "Color detection sessions"),
        (name = "classifier", description = "Raw classification surface"),
        (name = "cvd", description = "Color-vision-deficiency simulation"),
        (name = "sse", description = "Server-sent events stream"),
    )
)]
pub struct ApiDoc;
