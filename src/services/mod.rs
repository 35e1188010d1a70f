/// Classifier connection supervision and degraded mode handling.
pub mod bridge_supervisor;
/// CVD simulation session workflow.
pub mod cvd_service;
/// Detection session lifecycle and tap handling.
pub mod detector_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Color resolution engine and its fallbacks.
pub mod resolution;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Per-session voice narration policy.
pub mod voice;
