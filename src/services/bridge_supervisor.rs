use std::{future::Future, sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    bridge::{classifier::ClassifierBridge, error::BridgeError},
    services::sse_events,
    state::SharedState,
};

const INITIAL_DELAY: Duration = Duration::from_millis(1_000);
const MAX_DELAY: Duration = Duration::from_secs(10);
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Keep a classifier installed, and the shared state out of degraded mode,
/// for as long as the collaborator answers health probes.
///
/// Model initialisation failure is logged but does not block installation:
/// the collaborator may already hold an initialised model from a previous
/// run, and prediction calls fail independently if it does not.
pub async fn run<F, Fut>(state: SharedState, mut connect: F)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Arc<dyn ClassifierBridge>, BridgeError>> + Send,
{
    let mut delay = INITIAL_DELAY;

    loop {
        match connect().await {
            Ok(classifier) => {
                match classifier.init_model(state.config().model_asset()).await {
                    Ok(_) => info!("classifier model initialised"),
                    Err(err) => warn!(error = %err, "classifier model initialisation failed"),
                }

                state.install_classifier(classifier.clone()).await;
                sse_events::broadcast_classifier_status(&state, false);
                info!("classifier connected; leaving degraded mode");
                delay = INITIAL_DELAY;

                loop {
                    match classifier.health_check().await {
                        Ok(()) => sleep(HEALTH_POLL_INTERVAL).await,
                        Err(err) => {
                            warn!(error = %err, "classifier health check failed; entering degraded mode");
                            state.clear_classifier().await;
                            sse_events::broadcast_classifier_status(&state, true);
                            break;
                        }
                    }
                }

                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
            }
            Err(err) => {
                warn!(error = %err, "classifier connection attempt failed");
                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::future::BoxFuture;

    use super::*;
    use crate::{
        bridge::{classifier::Prediction, error::BridgeResult, speech::NullSpeech},
        config::AppConfig,
        state::{AppState, CollaboratorPorts},
    };

    struct FlakyClassifier {
        health_calls: Arc<AtomicUsize>,
        healthy_for: usize,
    }

    impl ClassifierBridge for FlakyClassifier {
        fn init_model(&self, _asset_name: &str) -> BoxFuture<'static, BridgeResult<bool>> {
            Box::pin(async { Ok(true) })
        }

        fn predict_pixel(
            &self,
            _nr: f64,
            _ng: f64,
            _nb: f64,
        ) -> BoxFuture<'static, BridgeResult<Prediction>> {
            Box::pin(async { Ok(Prediction::unknown()) })
        }

        fn sample_image_at(
            &self,
            _file_path: &str,
            _nx: f64,
            _ny: f64,
        ) -> BoxFuture<'static, BridgeResult<Prediction>> {
            Box::pin(async { Ok(Prediction::unknown()) })
        }

        fn health_check(&self) -> BoxFuture<'static, BridgeResult<()>> {
            let calls = self.health_calls.fetch_add(1, Ordering::SeqCst);
            let healthy = calls < self.healthy_for;
            Box::pin(async move {
                if healthy {
                    Ok(())
                } else {
                    Err(crate::bridge::error::BridgeError::Status {
                        endpoint: "healthz".into(),
                        status: 503,
                    })
                }
            })
        }
    }

    fn test_state() -> SharedState {
        AppState::new(
            AppConfig::default(),
            CollaboratorPorts {
                daltonizer: None,
                camera: None,
                speech: Arc::new(NullSpeech),
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn supervisor_installs_then_demotes_on_health_failure() {
        let state = test_state();
        assert!(state.is_degraded().await);

        let health_calls = Arc::new(AtomicUsize::new(0));
        let calls = health_calls.clone();

        let supervisor = tokio::spawn(run(state.clone(), move || {
            let calls = calls.clone();
            async move {
                let classifier: Arc<dyn ClassifierBridge> = Arc::new(FlakyClassifier {
                    health_calls: calls,
                    healthy_for: 1,
                });
                Ok(classifier)
            }
        }));

        // Let the supervisor connect and pass the first health probe.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!state.is_degraded().await);

        // The second probe fails and the classifier is demoted.
        tokio::time::sleep(HEALTH_POLL_INTERVAL).await;
        assert!(state.is_degraded().await);

        supervisor.abort();
    }
}
