use uuid::Uuid;

use crate::{
    dto::cvd::{CvdProcessRequest, CvdSnapshot, SetCvdTypeRequest, SetImageRequest},
    error::ServiceError,
    services::sse_events,
    state::{SharedState, cvd::CvdSession},
};

/// Open a new CVD simulation session.
pub fn create_session(state: &SharedState) -> CvdSnapshot {
    let session = CvdSession::new();
    let snapshot = CvdSnapshot::from(session.clone());
    state.cvd_sessions().insert(session.id, session);
    snapshot
}

/// Current snapshot of an existing CVD session.
pub fn session_snapshot(state: &SharedState, id: Uuid) -> Result<CvdSnapshot, ServiceError> {
    let session = state
        .cvd_sessions()
        .get(&id)
        .ok_or_else(|| not_found(id))?;
    Ok(CvdSnapshot::from(session.clone()))
}

/// Select the deficiency type for subsequent transforms.
pub fn set_cvd_type(
    state: &SharedState,
    id: Uuid,
    request: SetCvdTypeRequest,
) -> Result<CvdSnapshot, ServiceError> {
    let mut session = state
        .cvd_sessions()
        .get_mut(&id)
        .ok_or_else(|| not_found(id))?;
    session.cvd_type = Some(request.cvd_type);
    Ok(CvdSnapshot::from(session.clone()))
}

/// Install a picked image as the session preview.
pub fn set_image(
    state: &SharedState,
    id: Uuid,
    request: SetImageRequest,
) -> Result<CvdSnapshot, ServiceError> {
    let mut session = state
        .cvd_sessions()
        .get_mut(&id)
        .ok_or_else(|| not_found(id))?;
    session.preview = Some(request.path);
    Ok(CvdSnapshot::from(session.clone()))
}

/// Capture a photo from the camera collaborator into the session preview.
pub async fn capture_preview(state: &SharedState, id: Uuid) -> Result<CvdSnapshot, ServiceError> {
    let camera = state
        .camera()
        .ok_or_else(|| ServiceError::InvalidState("no camera is configured".into()))?;

    // Presence check before the capture round-trip.
    if !state.cvd_sessions().contains_key(&id) {
        return Err(not_found(id));
    }

    let photo = camera
        .capture_photo()
        .await
        .map_err(ServiceError::ProcessingFailed)?;

    let mut session = state
        .cvd_sessions()
        .get_mut(&id)
        .ok_or_else(|| not_found(id))?;
    session.preview = Some(photo.path);
    Ok(CvdSnapshot::from(session.clone()))
}

/// Run exactly one daltonization attempt over the current preview.
///
/// On success the preview is replaced with the transformed image; on failure
/// the prior preview is kept and the error surfaces to the client.
pub async fn process(
    state: &SharedState,
    id: Uuid,
    request: CvdProcessRequest,
) -> Result<CvdSnapshot, ServiceError> {
    let daltonizer = state
        .daltonizer()
        .ok_or_else(|| ServiceError::InvalidState("no daltonizer is configured".into()))?;

    // Preconditions are checked, and the processing flag claimed, before any
    // collaborator call; overlapping attempts on one session are rejected.
    let (path, cvd_code) = {
        let mut session = state
            .cvd_sessions()
            .get_mut(&id)
            .ok_or_else(|| not_found(id))?;

        let cvd_type = session.cvd_type.ok_or_else(|| {
            ServiceError::InvalidState("You must select your color vision type".into())
        })?;
        let preview = session.preview.clone().ok_or_else(|| {
            ServiceError::InvalidState(
                "No photo available. Please capture a photo first.".into(),
            )
        })?;
        if session.processing {
            return Err(ServiceError::InvalidState(
                "a transform is already in progress".into(),
            ));
        }
        session.processing = true;

        (strip_file_scheme(&preview).to_string(), cvd_type.code())
    };

    // Cleared again on every exit: axum drops the handler future when the
    // client disconnects, and an abandoned attempt must not block later ones.
    let _reset = ProcessingReset {
        state: state.clone(),
        id,
    };

    let severity = request
        .severity
        .unwrap_or_else(|| state.config().default_severity());

    let outcome = daltonizer.process_image(&path, cvd_code, severity).await;

    let mut session = state
        .cvd_sessions()
        .get_mut(&id)
        .ok_or_else(|| not_found(id))?;
    session.processing = false;

    match outcome {
        Ok(processed) => {
            let preview = processed.into_uri();
            session.preview = Some(preview.clone());
            let snapshot = CvdSnapshot::from(session.clone());
            drop(session);
            sse_events::broadcast_preview_updated(state, id, &preview);
            Ok(snapshot)
        }
        Err(err) => Err(ServiceError::ProcessingFailed(err)),
    }
}

/// Forget a CVD session; nothing it held is persisted.
pub fn close_session(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    state
        .cvd_sessions()
        .remove(&id)
        .map(|_| ())
        .ok_or_else(|| not_found(id))
}

/// Clears a session's in-flight flag when the processing attempt ends,
/// including when the future is dropped mid-await.
struct ProcessingReset {
    state: SharedState,
    id: Uuid,
}

impl Drop for ProcessingReset {
    fn drop(&mut self) {
        if let Some(mut session) = self.state.cvd_sessions().get_mut(&self.id) {
            session.processing = false;
        }
    }
}

fn not_found(id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("CVD session `{id}` not found"))
}

/// Collaborators expect bare filesystem paths, not `file://` URIs.
fn strip_file_scheme(path: &str) -> &str {
    path.strip_prefix("file://").unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc, Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use futures::future::BoxFuture;

    use super::*;
    use crate::{
        bridge::{
            daltonizer::{DaltonizerBridge, ProcessedImage},
            error::{BridgeError, BridgeResult},
            speech::NullSpeech,
        },
        config::AppConfig,
        state::{AppState, CollaboratorPorts, cvd::CvdType},
    };

    #[derive(Default)]
    struct RecordingDaltonizer {
        calls: Mutex<Vec<(String, u8, f64)>>,
        fail: bool,
    }

    impl DaltonizerBridge for RecordingDaltonizer {
        fn process_image(
            &self,
            path: &str,
            cvd_code: u8,
            severity: f64,
        ) -> BoxFuture<'static, BridgeResult<ProcessedImage>> {
            self.calls
                .lock()
                .unwrap()
                .push((path.to_string(), cvd_code, severity));
            let fail = self.fail;
            Box::pin(async move {
                if fail {
                    Err(BridgeError::Status {
                        endpoint: "process".into(),
                        status: 500,
                    })
                } else {
                    Ok(ProcessedImage::Path("/tmp/daltonized.jpg".into()))
                }
            })
        }
    }

    fn state_with(daltonizer: Arc<RecordingDaltonizer>) -> SharedState {
        AppState::new(
            AppConfig::default(),
            CollaboratorPorts {
                daltonizer: Some(daltonizer),
                camera: None,
                speech: Arc::new(NullSpeech),
            },
        )
    }

    #[tokio::test]
    async fn process_requires_a_selected_type() {
        let daltonizer = Arc::new(RecordingDaltonizer::default());
        let state = state_with(daltonizer.clone());
        let created = create_session(&state);
        set_image(
            &state,
            created.id,
            SetImageRequest {
                path: "/tmp/photo.jpg".into(),
            },
        )
        .unwrap();

        let result = process(&state, created.id, CvdProcessRequest::default()).await;

        match result {
            Err(ServiceError::InvalidState(message)) => {
                assert_eq!(message, "You must select your color vision type");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(daltonizer.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn process_requires_a_preview() {
        let daltonizer = Arc::new(RecordingDaltonizer::default());
        let state = state_with(daltonizer.clone());
        let created = create_session(&state);
        set_cvd_type(
            &state,
            created.id,
            SetCvdTypeRequest {
                cvd_type: CvdType::Protanopia,
            },
        )
        .unwrap();

        let result = process(&state, created.id, CvdProcessRequest::default()).await;

        match result {
            Err(ServiceError::InvalidState(message)) => {
                assert_eq!(message, "No photo available. Please capture a photo first.");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(daltonizer.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn process_strips_the_file_scheme_and_maps_codes() {
        let daltonizer = Arc::new(RecordingDaltonizer::default());
        let state = state_with(daltonizer.clone());
        let created = create_session(&state);
        set_cvd_type(
            &state,
            created.id,
            SetCvdTypeRequest {
                cvd_type: CvdType::Tritanopia,
            },
        )
        .unwrap();
        set_image(
            &state,
            created.id,
            SetImageRequest {
                path: "file:///tmp/photo.jpg".into(),
            },
        )
        .unwrap();

        let snapshot = process(
            &state,
            created.id,
            CvdProcessRequest {
                severity: Some(0.5),
            },
        )
        .await
        .unwrap();

        let calls = daltonizer.calls.lock().unwrap();
        assert_eq!(
            calls.as_slice(),
            &[("/tmp/photo.jpg".to_string(), 2, 0.5)]
        );
        assert_eq!(snapshot.preview.as_deref(), Some("file:///tmp/daltonized.jpg"));
        assert!(!snapshot.processing);
    }

    #[tokio::test]
    async fn severity_defaults_from_configuration() {
        let daltonizer = Arc::new(RecordingDaltonizer::default());
        let state = state_with(daltonizer.clone());
        let created = create_session(&state);
        set_cvd_type(
            &state,
            created.id,
            SetCvdTypeRequest {
                cvd_type: CvdType::Deuteranopia,
            },
        )
        .unwrap();
        set_image(
            &state,
            created.id,
            SetImageRequest {
                path: "/tmp/photo.jpg".into(),
            },
        )
        .unwrap();

        process(&state, created.id, CvdProcessRequest::default())
            .await
            .unwrap();

        let calls = daltonizer.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), &[("/tmp/photo.jpg".to_string(), 1, 1.0)]);
    }

    #[tokio::test]
    async fn failure_keeps_the_previous_preview() {
        let daltonizer = Arc::new(RecordingDaltonizer {
            calls: Mutex::new(Vec::new()),
            fail: true,
        });
        let state = state_with(daltonizer.clone());
        let created = create_session(&state);
        set_cvd_type(
            &state,
            created.id,
            SetCvdTypeRequest {
                cvd_type: CvdType::Protanopia,
            },
        )
        .unwrap();
        set_image(
            &state,
            created.id,
            SetImageRequest {
                path: "/tmp/photo.jpg".into(),
            },
        )
        .unwrap();

        let result = process(&state, created.id, CvdProcessRequest::default()).await;
        assert!(matches!(result, Err(ServiceError::ProcessingFailed(_))));

        let snapshot = session_snapshot(&state, created.id).unwrap();
        assert_eq!(snapshot.preview.as_deref(), Some("/tmp/photo.jpg"));
        assert!(!snapshot.processing);
        assert_eq!(daltonizer.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn each_request_makes_exactly_one_attempt() {
        let daltonizer = Arc::new(RecordingDaltonizer::default());
        let state = state_with(daltonizer.clone());
        let created = create_session(&state);
        set_cvd_type(
            &state,
            created.id,
            SetCvdTypeRequest {
                cvd_type: CvdType::Protanopia,
            },
        )
        .unwrap();
        set_image(
            &state,
            created.id,
            SetImageRequest {
                path: "/tmp/photo.jpg".into(),
            },
        )
        .unwrap();

        process(&state, created.id, CvdProcessRequest::default())
            .await
            .unwrap();
        assert_eq!(daltonizer.calls.lock().unwrap().len(), 1);
    }

    /// Pends forever on the first call, then answers normally.
    struct StallingDaltonizer {
        calls: AtomicUsize,
    }

    impl DaltonizerBridge for StallingDaltonizer {
        fn process_image(
            &self,
            _path: &str,
            _cvd_code: u8,
            _severity: f64,
        ) -> BoxFuture<'static, BridgeResult<ProcessedImage>> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Box::pin(std::future::pending())
            } else {
                Box::pin(async { Ok(ProcessedImage::Path("/tmp/daltonized.jpg".into())) })
            }
        }
    }

    #[tokio::test]
    async fn abandoned_attempt_does_not_block_later_ones() {
        let daltonizer = Arc::new(StallingDaltonizer {
            calls: AtomicUsize::new(0),
        });
        let state = AppState::new(
            AppConfig::default(),
            CollaboratorPorts {
                daltonizer: Some(daltonizer),
                camera: None,
                speech: Arc::new(NullSpeech),
            },
        );
        let created = create_session(&state);
        set_cvd_type(
            &state,
            created.id,
            SetCvdTypeRequest {
                cvd_type: CvdType::Protanopia,
            },
        )
        .unwrap();
        set_image(
            &state,
            created.id,
            SetImageRequest {
                path: "/tmp/photo.jpg".into(),
            },
        )
        .unwrap();

        // First attempt never completes; dropping it emulates a disconnected
        // client cancelling the handler mid-await.
        let first = tokio::time::timeout(
            Duration::from_millis(20),
            process(&state, created.id, CvdProcessRequest::default()),
        )
        .await;
        assert!(first.is_err());

        let snapshot = session_snapshot(&state, created.id).unwrap();
        assert!(!snapshot.processing);

        let second = process(&state, created.id, CvdProcessRequest::default())
            .await
            .unwrap();
        assert_eq!(
            second.preview.as_deref(),
            Some("file:///tmp/daltonized.jpg")
        );
    }

    #[tokio::test]
    async fn missing_sessions_are_reported() {
        let daltonizer = Arc::new(RecordingDaltonizer::default());
        let state = state_with(daltonizer);
        let missing = Uuid::new_v4();

        assert!(matches!(
            session_snapshot(&state, missing),
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            process(&state, missing, CvdProcessRequest::default()).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
