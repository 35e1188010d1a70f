use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::{
    sync::{Mutex, RwLock},
    task::JoinHandle,
};
use uuid::Uuid;

use crate::{
    dto::color::DetectedColor,
    services::voice::VoicePolicy,
    state::detector::{DetectorEvent, DetectorPhase, DetectorStateMachine, InvalidTransition},
};

/// Screen dimensions in pixels, fixed for a session's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ScreenSize {
    /// Normalize a screen coordinate into `[0, 1]²`, clamping out-of-bounds
    /// taps to the edges.
    pub fn normalized(self, x: f64, y: f64) -> (f64, f64) {
        let nx = (x / f64::from(self.width)).clamp(0.0, 1.0);
        let ny = (y / f64::from(self.height)).clamp(0.0, 1.0);
        (nx, ny)
    }
}

/// One user-facing detection session and everything scoped to its lifetime.
///
/// The generation counter orders overlapping resolution attempts: an attempt
/// takes a generation number when it starts, and only the newest attempt may
/// publish its result. A stale completion still returns a color to its own
/// caller but mutates nothing.
pub struct DetectorSession {
    id: Uuid,
    screen: ScreenSize,
    machine: RwLock<DetectorStateMachine>,
    crosshair: RwLock<(f64, f64)>,
    voice: Mutex<VoicePolicy>,
    color_codes_visible: AtomicBool,
    last_reading: RwLock<Option<DetectedColor>>,
    generation: AtomicU64,
    sampler: Mutex<Option<JoinHandle<()>>>,
}

impl DetectorSession {
    /// Create a session with the crosshair centered on the screen.
    pub fn new(screen: ScreenSize, voice_enabled: bool, color_codes_visible: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            screen,
            machine: RwLock::new(DetectorStateMachine::new()),
            crosshair: RwLock::new(center_of(screen)),
            voice: Mutex::new(VoicePolicy::new(voice_enabled)),
            color_codes_visible: AtomicBool::new(color_codes_visible),
            last_reading: RwLock::new(None),
            generation: AtomicU64::new(0),
            sampler: Mutex::new(None),
        }
    }

    /// Session identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Screen dimensions fixed at session creation.
    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    /// Current phase of the session state machine.
    pub async fn phase(&self) -> DetectorPhase {
        self.machine.read().await.phase()
    }

    /// Apply an event to the session state machine.
    ///
    /// Unfreezing recenters the crosshair, matching the viewfinder reset.
    pub async fn apply(&self, event: DetectorEvent) -> Result<DetectorPhase, InvalidTransition> {
        let next = {
            let mut machine = self.machine.write().await;
            machine.apply(event)?
        };

        if event == DetectorEvent::Unfreeze {
            let mut crosshair = self.crosshair.write().await;
            *crosshair = center_of(self.screen);
        }

        Ok(next)
    }

    /// Current crosshair position in screen pixels.
    pub async fn crosshair(&self) -> (f64, f64) {
        *self.crosshair.read().await
    }

    /// Move the crosshair to a tapped position.
    pub async fn set_crosshair(&self, x: f64, y: f64) {
        let mut crosshair = self.crosshair.write().await;
        *crosshair = (x, y);
    }

    /// Voice feedback policy owned by this session.
    pub fn voice(&self) -> &Mutex<VoicePolicy> {
        &self.voice
    }

    /// Whether color code readouts are visible.
    pub fn color_codes_visible(&self) -> bool {
        self.color_codes_visible.load(Ordering::Relaxed)
    }

    /// Flip color code visibility, returning the new value.
    pub fn toggle_color_codes(&self) -> bool {
        !self.color_codes_visible.fetch_xor(true, Ordering::Relaxed)
    }

    /// Start a resolution attempt, returning its generation number.
    pub fn begin_resolution(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Store a resolved reading if `generation` is still the newest attempt.
    /// Returns whether the reading was published.
    pub async fn publish_reading(&self, generation: u64, reading: DetectedColor) -> bool {
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }

        let mut slot = self.last_reading.write().await;
        *slot = Some(reading);
        true
    }

    /// Most recently published reading, if any.
    pub async fn last_reading(&self) -> Option<DetectedColor> {
        self.last_reading.read().await.clone()
    }

    /// Install the live sampler task, aborting any previous one.
    pub async fn install_sampler(&self, handle: JoinHandle<()>) {
        let mut slot = self.sampler.lock().await;
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }

    /// Stop the live sampler task if one is running.
    pub async fn stop_sampler(&self) {
        let mut slot = self.sampler.lock().await;
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}

fn center_of(screen: ScreenSize) -> (f64, f64) {
    (
        f64::from(screen.width) / 2.0,
        f64::from(screen.height) / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> DetectorSession {
        DetectorSession::new(
            ScreenSize {
                width: 1920,
                height: 1080,
            },
            true,
            true,
        )
    }

    #[test]
    fn normalization_clamps_to_unit_square() {
        let screen = ScreenSize {
            width: 1920,
            height: 1080,
        };
        assert_eq!(screen.normalized(960.0, 540.0), (0.5, 0.5));
        assert_eq!(screen.normalized(-10.0, 99999.0), (0.0, 1.0));
    }

    #[tokio::test]
    async fn unfreeze_recenters_the_crosshair() {
        let session = session();
        session.apply(DetectorEvent::Freeze).await.unwrap();
        session.set_crosshair(12.0, 34.0).await;
        session.apply(DetectorEvent::Unfreeze).await.unwrap();
        assert_eq!(session.crosshair().await, (960.0, 540.0));
    }

    #[tokio::test]
    async fn stale_generations_cannot_publish() {
        let session = session();
        let first = session.begin_resolution();
        let second = session.begin_resolution();

        let stale = DetectedColor::from_channels("Stale", 1, 2, 3);
        let fresh = DetectedColor::from_channels("Fresh", 4, 5, 6);

        assert!(session.publish_reading(second, fresh.clone()).await);
        assert!(!session.publish_reading(first, stale).await);
        assert_eq!(session.last_reading().await.unwrap().name, "Fresh");
    }

    #[test]
    fn toggling_color_codes_flips_the_flag() {
        let session = session();
        assert!(session.color_codes_visible());
        assert!(!session.toggle_color_codes());
        assert!(session.toggle_color_codes());
    }
}
