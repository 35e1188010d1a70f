use thiserror::Error;

/// Phases a detection session can be in.
///
/// Taps resolve colors only while frozen; live-sampling ticks resolve them
/// only while live with sampling enabled. The two entry points into the
/// resolution engine are therefore never active at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorPhase {
    /// The viewfinder is running; sampling ticks fire when enabled.
    Live {
        /// Whether the fixed-interval live sampler is running.
        sampling: bool,
    },
    /// The viewfinder is frozen; taps select the pixel to resolve.
    Frozen,
}

/// Events that can be applied to the detection state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorEvent {
    /// Freeze the viewfinder so taps can select a pixel.
    Freeze,
    /// Resume the live viewfinder, recentering the crosshair.
    Unfreeze,
    /// Start the fixed-interval live sampler.
    StartSampling,
    /// Stop the live sampler.
    StopSampling,
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the state machine was in when the invalid event was received.
    pub from: DetectorPhase,
    /// The event that cannot be applied from this phase.
    pub event: DetectorEvent,
}

/// State machine driving one detection session's freeze and sampling flow.
#[derive(Debug, Clone)]
pub struct DetectorStateMachine {
    phase: DetectorPhase,
}

impl Default for DetectorStateMachine {
    fn default() -> Self {
        Self {
            phase: DetectorPhase::Live { sampling: false },
        }
    }
}

impl DetectorStateMachine {
    /// Create a state machine initialised in the live, non-sampling phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> DetectorPhase {
        self.phase
    }

    /// Apply an event, moving to the next phase when the transition is valid.
    pub fn apply(&mut self, event: DetectorEvent) -> Result<DetectorPhase, InvalidTransition> {
        let next = self.compute_transition(event)?;
        self.phase = next;
        Ok(next)
    }

    /// Compute a transition from an event if the transition is valid.
    fn compute_transition(&self, event: DetectorEvent) -> Result<DetectorPhase, InvalidTransition> {
        let next = match (self.phase, event) {
            (DetectorPhase::Live { .. }, DetectorEvent::Freeze) => DetectorPhase::Frozen,
            (DetectorPhase::Frozen, DetectorEvent::Unfreeze) => {
                DetectorPhase::Live { sampling: false }
            }
            (DetectorPhase::Live { sampling: false }, DetectorEvent::StartSampling) => {
                DetectorPhase::Live { sampling: true }
            }
            (DetectorPhase::Live { sampling: true }, DetectorEvent::StopSampling) => {
                DetectorPhase::Live { sampling: false }
            }
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(sm: &mut DetectorStateMachine, event: DetectorEvent) -> DetectorPhase {
        sm.apply(event).unwrap()
    }

    #[test]
    fn initial_state_is_live_without_sampling() {
        let sm = DetectorStateMachine::new();
        assert_eq!(sm.phase(), DetectorPhase::Live { sampling: false });
    }

    #[test]
    fn freeze_and_unfreeze_round_trip() {
        let mut sm = DetectorStateMachine::new();
        assert_eq!(apply(&mut sm, DetectorEvent::Freeze), DetectorPhase::Frozen);
        assert_eq!(
            apply(&mut sm, DetectorEvent::Unfreeze),
            DetectorPhase::Live { sampling: false }
        );
    }

    #[test]
    fn sampling_toggles_only_while_live() {
        let mut sm = DetectorStateMachine::new();
        assert_eq!(
            apply(&mut sm, DetectorEvent::StartSampling),
            DetectorPhase::Live { sampling: true }
        );
        assert_eq!(
            apply(&mut sm, DetectorEvent::StopSampling),
            DetectorPhase::Live { sampling: false }
        );
    }

    #[test]
    fn freezing_while_sampling_drops_the_sampler_flag() {
        let mut sm = DetectorStateMachine::new();
        apply(&mut sm, DetectorEvent::StartSampling);
        assert_eq!(apply(&mut sm, DetectorEvent::Freeze), DetectorPhase::Frozen);
    }

    #[test]
    fn invalid_transitions_are_rejected() {
        let mut sm = DetectorStateMachine::new();
        let err = sm.apply(DetectorEvent::Unfreeze).unwrap_err();
        assert_eq!(err.from, DetectorPhase::Live { sampling: false });
        assert_eq!(err.event, DetectorEvent::Unfreeze);

        apply(&mut sm, DetectorEvent::Freeze);
        assert!(sm.apply(DetectorEvent::StartSampling).is_err());
        assert!(sm.apply(DetectorEvent::Freeze).is_err());
    }

    #[test]
    fn double_start_sampling_is_rejected() {
        let mut sm = DetectorStateMachine::new();
        apply(&mut sm, DetectorEvent::StartSampling);
        assert!(sm.apply(DetectorEvent::StartSampling).is_err());
    }
}
