use std::sync::Arc;

use tracing::debug;

use crate::{
    bridge::{
        camera::CameraBridge,
        classifier::{ClassifierBridge, Prediction},
    },
    color::{Palette, format_hex},
    dto::color::DetectedColor,
    state::{SharedState, session::ScreenSize},
};

/// Blue channel used by the deterministic fallback; keeps fallback swatches
/// visibly distinct from pure channel gradients.
const FALLBACK_BLUE: u8 = 128;

/// Resolve the color under a screen coordinate.
///
/// The ladder is strict and total: a real image sample beats a model guess,
/// a model guess beats the local derivation, and the local derivation always
/// succeeds. Errors on the first two rungs are logged and swallowed; they
/// select the next rung, never the caller's error path.
pub async fn resolve_color(
    classifier: Option<&Arc<dyn ClassifierBridge>>,
    camera: Option<&Arc<dyn CameraBridge>>,
    palette: &Palette,
    screen: ScreenSize,
    x: f64,
    y: f64,
) -> DetectedColor {
    let (nx, ny) = screen.normalized(x, y);

    if let Some(classifier) = classifier {
        if let Some(camera) = camera {
            match camera.capture_photo().await {
                Ok(photo) => match classifier.sample_image_at(&photo.path, nx, ny).await {
                    Ok(prediction) => return prediction.into(),
                    Err(err) => debug!(error = %err, "image sampling failed"),
                },
                Err(err) => debug!(error = %err, "photo capture failed"),
            }
        }

        // No image to sample: feed the normalized coordinate to the model as
        // a pseudo-pixel instead.
        match classifier.predict_pixel(nx, ny, 0.5).await {
            Ok(prediction) => return prediction.into(),
            Err(err) => debug!(error = %err, "pixel prediction failed"),
        }
    }

    local_fallback(palette, x, y)
}

/// Coordinate-derived color used when no collaborator can answer.
///
/// Deterministic and total for any finite coordinate pair.
pub fn local_fallback(palette: &Palette, x: f64, y: f64) -> DetectedColor {
    let r = (x as i64).rem_euclid(256) as u8;
    let g = (y as i64).rem_euclid(256) as u8;
    let b = FALLBACK_BLUE;

    let hex = format_hex(r, g, b);
    let name = palette.name_of(&hex).to_string();
    DetectedColor::from_channels(name, r, g, b)
}

/// Classify a raw normalized sample on behalf of the prediction endpoint.
///
/// This surface is total as well: with no classifier installed, or on any
/// bridge failure, it answers with the `Unknown` sentinel rather than an
/// error.
pub async fn predict_normalized(state: &SharedState, nr: f64, ng: f64, nb: f64) -> DetectedColor {
    let Some(classifier) = state.classifier().await else {
        return Prediction::unknown().into();
    };

    match classifier.predict_pixel(nr, ng, nb).await {
        Ok(prediction) => prediction.into(),
        Err(err) => {
            debug!(error = %err, "pixel prediction failed");
            Prediction::unknown().into()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::future::BoxFuture;

    use super::*;
    use crate::bridge::{
        camera::CapturedPhoto,
        error::{BridgeError, BridgeResult},
    };

    struct FixedClassifier {
        prediction: Prediction,
        sample_calls: AtomicUsize,
        predict_calls: AtomicUsize,
    }

    impl FixedClassifier {
        fn new(prediction: Prediction) -> Self {
            Self {
                prediction,
                sample_calls: AtomicUsize::new(0),
                predict_calls: AtomicUsize::new(0),
            }
        }
    }

    impl ClassifierBridge for FixedClassifier {
        fn init_model(&self, _asset_name: &str) -> BoxFuture<'static, BridgeResult<bool>> {
            Box::pin(async { Ok(true) })
        }

        fn predict_pixel(
            &self,
            _nr: f64,
            _ng: f64,
            _nb: f64,
        ) -> BoxFuture<'static, BridgeResult<Prediction>> {
            self.predict_calls.fetch_add(1, Ordering::SeqCst);
            let prediction = self.prediction.clone();
            Box::pin(async move { Ok(prediction) })
        }

        fn sample_image_at(
            &self,
            _file_path: &str,
            _nx: f64,
            _ny: f64,
        ) -> BoxFuture<'static, BridgeResult<Prediction>> {
            self.sample_calls.fetch_add(1, Ordering::SeqCst);
            let prediction = self.prediction.clone();
            Box::pin(async move { Ok(prediction) })
        }

        fn health_check(&self) -> BoxFuture<'static, BridgeResult<()>> {
            Box::pin(async { Ok(()) })
        }
    }

    struct StubCamera;

    impl CameraBridge for StubCamera {
        fn capture_photo(&self) -> BoxFuture<'static, BridgeResult<CapturedPhoto>> {
            Box::pin(async {
                Ok(CapturedPhoto {
                    path: "/tmp/frame.jpg".into(),
                })
            })
        }
    }

    struct BrokenCamera;

    impl CameraBridge for BrokenCamera {
        fn capture_photo(&self) -> BoxFuture<'static, BridgeResult<CapturedPhoto>> {
            Box::pin(async {
                Err(BridgeError::Status {
                    endpoint: "capture".into(),
                    status: 503,
                })
            })
        }
    }

    fn screen() -> ScreenSize {
        ScreenSize {
            width: 1920,
            height: 1080,
        }
    }

    fn red_prediction() -> Prediction {
        Prediction {
            name: "Red".into(),
            hex: "#FF0000".into(),
            rgb: "(255, 0, 0)".into(),
            hsv: "(0°, 100%, 100%)".into(),
            confidence: Some(0.92),
        }
    }

    #[tokio::test]
    async fn falls_back_locally_without_collaborators() {
        let palette = Palette::default();
        let reading = resolve_color(None, None, &palette, screen(), 960.0, 540.0).await;

        assert_eq!(reading.hex, "#C01C80");
        assert_eq!(reading.name, "Unknown Color");
        assert_eq!(reading.rgb, "(192, 28, 128)");
        assert_eq!(reading.confidence, None);
    }

    #[test]
    fn local_fallback_is_deterministic() {
        let palette = Palette::default();
        let first = local_fallback(&palette, 300.0, 700.0);
        let second = local_fallback(&palette, 300.0, 700.0);
        assert_eq!(first, second);
        // 300 mod 256 = 44, 700 mod 256 = 188
        assert_eq!(first.hex, "#2CBC80");
    }

    #[test]
    fn local_fallback_can_name_palette_colors() {
        let palette = Palette::new([("#0000FF", "Blue")]);
        let reading = local_fallback(&palette, 0.0, 0.0);
        assert_eq!(reading.name, "Unknown Color");

        // x = 0, y = 0 gives #000080, not a palette hit; force one instead.
        let palette = Palette::new([("#2CBC80", "Minty")]);
        assert_eq!(local_fallback(&palette, 300.0, 700.0).name, "Minty");
    }

    #[tokio::test]
    async fn image_sample_short_circuits_verbatim() {
        let classifier = Arc::new(FixedClassifier::new(red_prediction()));
        let camera: Arc<dyn CameraBridge> = Arc::new(StubCamera);
        let dyn_classifier: Arc<dyn ClassifierBridge> = classifier.clone();
        let palette = Palette::default();

        let reading = resolve_color(
            Some(&dyn_classifier),
            Some(&camera),
            &palette,
            screen(),
            10.0,
            10.0,
        )
        .await;

        assert_eq!(reading.name, "Red");
        assert_eq!(reading.hex, "#FF0000");
        assert_eq!(reading.confidence, Some(0.92));
        assert_eq!(classifier.sample_calls.load(Ordering::SeqCst), 1);
        assert_eq!(classifier.predict_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn capture_failure_drops_to_pixel_prediction() {
        let classifier = Arc::new(FixedClassifier::new(red_prediction()));
        let camera: Arc<dyn CameraBridge> = Arc::new(BrokenCamera);
        let dyn_classifier: Arc<dyn ClassifierBridge> = classifier.clone();
        let palette = Palette::default();

        let reading = resolve_color(
            Some(&dyn_classifier),
            Some(&camera),
            &palette,
            screen(),
            10.0,
            10.0,
        )
        .await;

        assert_eq!(reading.name, "Red");
        assert_eq!(classifier.sample_calls.load(Ordering::SeqCst), 0);
        assert_eq!(classifier.predict_calls.load(Ordering::SeqCst), 1);
    }
}
