/// Camera collaborator requesting still photo captures.
pub mod camera;
/// Classifier collaborator mapping pixels to named colors.
pub mod classifier;
/// Daltonizer collaborator applying CVD pixel transforms to images.
pub mod daltonizer;
/// Shared error taxonomy for every collaborator boundary.
pub mod error;
/// Text-to-speech collaborator reached with fire-and-forget sends.
pub mod speech;
