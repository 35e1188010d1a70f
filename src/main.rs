//! Color Lens Back binary entrypoint wiring REST, SSE, and collaborator bridges.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod bridge;
mod color;
mod config;
mod dto;
mod error;
mod routes;
mod services;
mod state;

use bridge::speech::{NullSpeech, SpeechBridge};
use config::AppConfig;
use state::{AppState, CollaboratorPorts, SharedState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let ports = collaborator_ports();
    let app_state = AppState::new(config, ports);

    spawn_classifier_supervisor(app_state.clone());

    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Resolve the fixed collaborator ports from the environment.
///
/// Daltonizer and camera stay absent when unconfigured; speech falls back to
/// the silent implementation so narration calls always have a target.
fn collaborator_ports() -> CollaboratorPorts {
    #[cfg(feature = "http-bridge")]
    {
        use bridge::{
            camera::{CameraBridge, HttpCamera},
            daltonizer::{DaltonizerBridge, HttpDaltonizer},
            speech::HttpSpeech,
        };

        let daltonizer: Option<Arc<dyn DaltonizerBridge>> =
            env::var("DALTONIZER_URL")
                .ok()
                .and_then(|url| match HttpDaltonizer::new(&url) {
                    Ok(bridge) => Some(Arc::new(bridge) as Arc<dyn DaltonizerBridge>),
                    Err(err) => {
                        warn!(error = %err, "failed to build daltonizer bridge");
                        None
                    }
                });

        let camera: Option<Arc<dyn CameraBridge>> =
            env::var("CAMERA_URL")
                .ok()
                .and_then(|url| match HttpCamera::new(&url) {
                    Ok(bridge) => Some(Arc::new(bridge) as Arc<dyn CameraBridge>),
                    Err(err) => {
                        warn!(error = %err, "failed to build camera bridge");
                        None
                    }
                });

        let speech: Arc<dyn SpeechBridge> = match env::var("SPEECH_URL") {
            Ok(url) => match HttpSpeech::new(&url) {
                Ok(bridge) => Arc::new(bridge),
                Err(err) => {
                    warn!(error = %err, "failed to build speech bridge; narration disabled");
                    Arc::new(NullSpeech)
                }
            },
            Err(_) => Arc::new(NullSpeech),
        };

        CollaboratorPorts {
            daltonizer,
            camera,
            speech,
        }
    }

    #[cfg(not(feature = "http-bridge"))]
    {
        CollaboratorPorts {
            daltonizer: None,
            camera: None,
            speech: Arc::new(NullSpeech),
        }
    }
}

/// Keep a classifier installed whenever an endpoint is configured.
#[cfg(feature = "http-bridge")]
fn spawn_classifier_supervisor(state: SharedState) {
    use bridge::classifier::{ClassifierBridge, HttpClassifier};

    let Ok(url) = env::var("CLASSIFIER_URL") else {
        warn!("CLASSIFIER_URL not set; running degraded without a classifier");
        return;
    };

    tokio::spawn(services::bridge_supervisor::run(state, move || {
        let url = url.clone();
        async move {
            let classifier: Arc<dyn ClassifierBridge> = Arc::new(HttpClassifier::new(&url)?);
            classifier.health_check().await?;
            Ok(classifier)
        }
    }));
}

#[cfg(not(feature = "http-bridge"))]
fn spawn_classifier_supervisor(_state: SharedState) {
    warn!("built without the http-bridge feature; running degraded without a classifier");
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
