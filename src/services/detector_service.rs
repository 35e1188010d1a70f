use std::sync::Arc;

use uuid::Uuid;

use crate::{
    dto::{
        color::DetectedColor,
        detector::{CreateSessionRequest, SessionSnapshot},
    },
    error::ServiceError,
    services::{resolution, sse_events},
    state::{
        SharedState,
        detector::{DetectorEvent, DetectorPhase},
        session::{DetectorSession, ScreenSize},
    },
};

/// Open a new detection session with fixed screen dimensions.
pub async fn create_session(
    state: &SharedState,
    request: CreateSessionRequest,
) -> SessionSnapshot {
    let screen = ScreenSize {
        width: request.screen_width,
        height: request.screen_height,
    };
    let session = Arc::new(DetectorSession::new(
        screen,
        request.voice_enabled,
        request.color_codes_visible,
    ));
    state.insert_session(session.clone());

    snapshot(&session).await
}

/// Current snapshot of an existing session.
pub async fn session_snapshot(
    state: &SharedState,
    id: Uuid,
) -> Result<SessionSnapshot, ServiceError> {
    let session = require_session(state, id)?;
    Ok(snapshot(&session).await)
}

/// Close a session, aborting its sampler; late resolutions become no-ops.
pub async fn close_session(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let session = state
        .remove_session(id)
        .ok_or_else(|| ServiceError::NotFound(format!("session `{id}` not found")))?;
    session.stop_sampler().await;
    Ok(())
}

/// Resolve the color under a tapped coordinate of a frozen frame.
///
/// The resolved reading is published to the session (unless a newer
/// resolution has started since), broadcast on SSE and narrated.
pub async fn tap(
    state: &SharedState,
    id: Uuid,
    x: f64,
    y: f64,
) -> Result<DetectedColor, ServiceError> {
    let session = require_session(state, id)?;

    if !matches!(session.phase().await, DetectorPhase::Frozen) {
        return Err(ServiceError::InvalidState(
            "taps are only resolved on a frozen frame".into(),
        ));
    }

    session.set_crosshair(x, y).await;
    let generation = session.begin_resolution();
    let reading = resolve_at(state, &session, x, y).await;
    publish(state, &session, generation, &reading).await;

    Ok(reading)
}

/// Freeze the viewfinder, stopping any running sampler.
pub async fn freeze(state: &SharedState, id: Uuid) -> Result<SessionSnapshot, ServiceError> {
    let session = require_session(state, id)?;
    let phase = session.apply(DetectorEvent::Freeze).await?;
    session.stop_sampler().await;
    sse_events::broadcast_phase_changed(state, id, phase);
    Ok(snapshot(&session).await)
}

/// Return to the live viewfinder; the crosshair recenters.
pub async fn unfreeze(state: &SharedState, id: Uuid) -> Result<SessionSnapshot, ServiceError> {
    let session = require_session(state, id)?;
    let phase = session.apply(DetectorEvent::Unfreeze).await?;
    sse_events::broadcast_phase_changed(state, id, phase);
    Ok(snapshot(&session).await)
}

/// Start the fixed-interval live sampler.
pub async fn start_sampling(state: &SharedState, id: Uuid) -> Result<SessionSnapshot, ServiceError> {
    let session = require_session(state, id)?;
    let phase = session.apply(DetectorEvent::StartSampling).await?;

    let handle = tokio::spawn(run_sampler(state.clone(), session.clone()));
    session.install_sampler(handle).await;

    sse_events::broadcast_phase_changed(state, id, phase);
    Ok(snapshot(&session).await)
}

/// Stop the live sampler, staying on the live viewfinder.
pub async fn stop_sampling(state: &SharedState, id: Uuid) -> Result<SessionSnapshot, ServiceError> {
    let session = require_session(state, id)?;
    let phase = session.apply(DetectorEvent::StopSampling).await?;
    session.stop_sampler().await;
    sse_events::broadcast_phase_changed(state, id, phase);
    Ok(snapshot(&session).await)
}

/// Flip voice narration for the session, returning the new flag.
pub async fn toggle_voice(state: &SharedState, id: Uuid) -> Result<bool, ServiceError> {
    let session = require_session(state, id)?;
    let mut policy = session.voice().lock().await;
    Ok(policy.toggle())
}

/// Flip color code visibility for the session, returning the new flag.
pub fn toggle_color_codes(state: &SharedState, id: Uuid) -> Result<bool, ServiceError> {
    let session = require_session(state, id)?;
    Ok(session.toggle_color_codes())
}

/// Interval loop driving live sampling. Each tick spawns an independent
/// resolution so a slow collaborator cannot delay the next tick; the
/// generation counter discards whichever answers arrive late.
async fn run_sampler(state: SharedState, session: Arc<DetectorSession>) {
    let mut ticker = tokio::time::interval(state.config().sampling_interval());

    loop {
        ticker.tick().await;

        let state = state.clone();
        let session = session.clone();
        tokio::spawn(async move {
            let (x, y) = session.crosshair().await;
            let generation = session.begin_resolution();
            let reading = resolve_at(&state, &session, x, y).await;
            publish(&state, &session, generation, &reading).await;
        });
    }
}

async fn resolve_at(
    state: &SharedState,
    session: &DetectorSession,
    x: f64,
    y: f64,
) -> DetectedColor {
    let classifier = state.classifier().await;
    let camera = state.camera();
    resolution::resolve_color(
        classifier.as_ref(),
        camera.as_ref(),
        state.config().palette(),
        session.screen(),
        x,
        y,
    )
    .await
}

/// Install a resolved reading on its session if it is still the newest, then
/// fan it out on SSE and narrate it.
async fn publish(
    state: &SharedState,
    session: &DetectorSession,
    generation: u64,
    reading: &DetectedColor,
) {
    if !session.publish_reading(generation, reading.clone()).await {
        return;
    }

    sse_events::broadcast_reading(state, session.id(), reading);

    let speech = state.speech();
    let mut policy = session.voice().lock().await;
    policy.announce(speech.as_ref(), reading);
}

fn require_session(state: &SharedState, id: Uuid) -> Result<Arc<DetectorSession>, ServiceError> {
    state
        .session(id)
        .ok_or_else(|| ServiceError::NotFound(format!("session `{id}` not found")))
}

async fn snapshot(session: &DetectorSession) -> SessionSnapshot {
    let (crosshair_x, crosshair_y) = session.crosshair().await;
    SessionSnapshot {
        id: session.id(),
        phase: session.phase().await.into(),
        crosshair_x,
        crosshair_y,
        voice_enabled: session.voice().lock().await.enabled(),
        color_codes_visible: session.color_codes_visible(),
        reading: session.last_reading().await,
    }
}
