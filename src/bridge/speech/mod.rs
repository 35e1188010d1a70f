#[cfg(feature = "http-bridge")]
mod http;

#[cfg(feature = "http-bridge")]
pub use http::HttpSpeech;

/// Abstraction over the text-to-speech collaborator.
///
/// Both operations are one-way sends: no acknowledgment is expected and no
/// failure is ever surfaced to callers. Implementations dispatch the request
/// and return immediately.
pub trait SpeechBridge: Send + Sync {
    /// Narrate the given text.
    fn speak(&self, text: &str);

    /// Interrupt any in-progress narration.
    fn stop(&self);
}

/// No-op speech implementation used when no TTS endpoint is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSpeech;

impl SpeechBridge for NullSpeech {
    fn speak(&self, _text: &str) {}

    fn stop(&self) {}
}
