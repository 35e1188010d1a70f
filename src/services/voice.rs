use crate::{bridge::speech::SpeechBridge, dto::color::DetectedColor};

/// Debounced narration policy owned by one detection session.
///
/// Remembers the last spoken name so lingering over the same area does not
/// repeat the announcement. Disabling voice keeps the remembered name;
/// re-enabling resumes comparison against whatever was last spoken.
#[derive(Debug, Clone)]
pub struct VoicePolicy {
    enabled: bool,
    last_spoken: String,
}

impl VoicePolicy {
    /// Create a policy with nothing spoken yet.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            last_spoken: String::new(),
        }
    }

    /// Whether narration is currently enabled.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Flip the enabled flag, returning the new value.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    /// Narrate a resolved color unless it repeats the previous announcement.
    ///
    /// Narration is fire-and-forget: the speech bridge swallows failures, so
    /// this never reports one.
    pub fn announce(&mut self, speech: &dyn SpeechBridge, reading: &DetectedColor) {
        if !self.enabled || reading.name == self.last_spoken {
            return;
        }

        speech.stop();
        speech.speak(&utterance(reading));
        self.last_spoken = reading.name.clone();
    }
}

/// Spoken form of a reading: the name, suffixed with the rounded confidence
/// percent when one is present, e.g. `"Red 92%"`.
fn utterance(reading: &DetectedColor) -> String {
    match reading.confidence {
        Some(confidence) => {
            format!("{} {}%", reading.name, (confidence * 100.0).round() as i64)
        }
        None => reading.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct RecordingSpeech {
        spoken: Mutex<Vec<String>>,
        stops: Mutex<usize>,
    }

    impl SpeechBridge for RecordingSpeech {
        fn speak(&self, text: &str) {
            self.spoken.lock().unwrap().push(text.to_string());
        }

        fn stop(&self) {
            *self.stops.lock().unwrap() += 1;
        }
    }

    fn named(name: &str) -> DetectedColor {
        DetectedColor::from_channels(name, 10, 20, 30)
    }

    #[test]
    fn repeated_names_are_suppressed() {
        let speech = RecordingSpeech::default();
        let mut policy = VoicePolicy::new(true);

        for name in ["A", "A", "B", "A"] {
            policy.announce(&speech, &named(name));
        }

        assert_eq!(*speech.spoken.lock().unwrap(), vec!["A", "B", "A"]);
    }

    #[test]
    fn confidence_is_narrated_as_rounded_percent() {
        let speech = RecordingSpeech::default();
        let mut policy = VoicePolicy::new(true);

        let mut reading = named("Red");
        reading.confidence = Some(0.92);
        policy.announce(&speech, &reading);

        assert_eq!(*speech.spoken.lock().unwrap(), vec!["Red 92%"]);
    }

    #[test]
    fn disabled_policy_stays_silent() {
        let speech = RecordingSpeech::default();
        let mut policy = VoicePolicy::new(false);

        policy.announce(&speech, &named("Red"));
        assert!(speech.spoken.lock().unwrap().is_empty());
    }

    #[test]
    fn toggling_off_keeps_the_debounce_memory() {
        let speech = RecordingSpeech::default();
        let mut policy = VoicePolicy::new(true);

        policy.announce(&speech, &named("Red"));
        policy.toggle();
        policy.toggle();
        // Still the last spoken name, so it stays suppressed.
        policy.announce(&speech, &named("Red"));

        assert_eq!(*speech.spoken.lock().unwrap(), vec!["Red"]);
    }

    #[test]
    fn narration_interrupts_previous_utterance() {
        let speech = RecordingSpeech::default();
        let mut policy = VoicePolicy::new(true);

        policy.announce(&speech, &named("Red"));
        policy.announce(&speech, &named("Blue"));

        assert_eq!(*speech.stops.lock().unwrap(), 2);
    }
}
