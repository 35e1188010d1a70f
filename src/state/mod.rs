/// CVD session data and the CVD type taxonomy.
pub mod cvd;
/// Detection session state machine.
pub mod detector;
/// Per-session detection state.
pub mod session;
mod sse;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{RwLock, watch};
use uuid::Uuid;

use crate::{
    bridge::{
        camera::CameraBridge, classifier::ClassifierBridge, daltonizer::DaltonizerBridge,
        speech::SpeechBridge,
    },
    config::AppConfig,
    state::{cvd::CvdSession, session::DetectorSession},
};

pub use self::sse::SseHub;

/// Shared handle to the central application state.
pub type SharedState = Arc<AppState>;

/// Fixed collaborator ports resolved once at startup.
///
/// Only the classifier has a mutable slot (installed and demoted by its
/// supervisor); camera and daltonizer are either present or absent for the
/// whole process lifetime, and speech always exists (`NullSpeech` when no
/// endpoint is configured).
pub struct CollaboratorPorts {
    /// Daltonization collaborator, absent when unconfigured.
    pub daltonizer: Option<Arc<dyn DaltonizerBridge>>,
    /// Camera collaborator, absent when unconfigured.
    pub camera: Option<Arc<dyn CameraBridge>>,
    /// Text-to-speech collaborator.
    pub speech: Arc<dyn SpeechBridge>,
}

/// Central application state storing sessions and collaborator handles.
pub struct AppState {
    config: AppConfig,
    classifier: RwLock<Option<Arc<dyn ClassifierBridge>>>,
    daltonizer: Option<Arc<dyn DaltonizerBridge>>,
    camera: Option<Arc<dyn CameraBridge>>,
    speech: Arc<dyn SpeechBridge>,
    sessions: DashMap<Uuid, Arc<DetectorSession>>,
    cvd_sessions: DashMap<Uuid, CvdSession>,
    degraded: watch::Sender<bool>,
    sse: SseHub,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a classifier is installed.
    pub fn new(config: AppConfig, ports: CollaboratorPorts) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            config,
            classifier: RwLock::new(None),
            daltonizer: ports.daltonizer,
            camera: ports.camera,
            speech: ports.speech,
            sessions: DashMap::new(),
            cvd_sessions: DashMap::new(),
            degraded: degraded_tx,
            sse: SseHub::new(16),
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the installed classifier, if any.
    pub async fn classifier(&self) -> Option<Arc<dyn ClassifierBridge>> {
        let guard = self.classifier.read().await;
        guard.as_ref().cloned()
    }

    /// Install a classifier implementation and leave degraded mode.
    pub async fn install_classifier(&self, classifier: Arc<dyn ClassifierBridge>) {
        {
            let mut guard = self.classifier.write().await;
            *guard = Some(classifier);
        }
        self.update_degraded(false).await;
    }

    /// Remove the current classifier and enter degraded mode.
    pub async fn clear_classifier(&self) {
        {
            let mut guard = self.classifier.write().await;
            guard.take();
        }
        self.update_degraded(true).await;
    }

    /// Current degraded flag (no classifier installed).
    pub async fn is_degraded(&self) -> bool {
        let guard = self.classifier.read().await;
        guard.is_none()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Daltonizer collaborator, if configured.
    pub fn daltonizer(&self) -> Option<Arc<dyn DaltonizerBridge>> {
        self.daltonizer.clone()
    }

    /// Camera collaborator, if configured.
    pub fn camera(&self) -> Option<Arc<dyn CameraBridge>> {
        self.camera.clone()
    }

    /// Text-to-speech collaborator.
    pub fn speech(&self) -> Arc<dyn SpeechBridge> {
        self.speech.clone()
    }

    /// Register a detection session.
    pub fn insert_session(&self, session: Arc<DetectorSession>) {
        self.sessions.insert(session.id(), session);
    }

    /// Look up a detection session by id.
    pub fn session(&self, id: Uuid) -> Option<Arc<DetectorSession>> {
        self.sessions.get(&id).map(|entry| entry.clone())
    }

    /// Remove a detection session, returning it for teardown.
    pub fn remove_session(&self, id: Uuid) -> Option<Arc<DetectorSession>> {
        self.sessions.remove(&id).map(|(_, session)| session)
    }

    /// Registry of active CVD sessions keyed by their identifier.
    pub fn cvd_sessions(&self) -> &DashMap<Uuid, CvdSession> {
        &self.cvd_sessions
    }

    /// Broadcast hub used for the SSE stream.
    pub fn sse(&self) -> &SseHub {
        &self.sse
    }

    /// Update and broadcast the degraded flag when the value changes.
    async fn update_degraded(&self, value: bool) {
        if *self.degraded.borrow() == value {
            return;
        }

        let _ = self.degraded.send(value);
    }
}
