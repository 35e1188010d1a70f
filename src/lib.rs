//! Library crate for color-lens-back, exposing modules for binaries and integration tests.

/// Collaborator boundary traits and HTTP clients.
pub mod bridge;
/// Pure color-space utilities and the naming palette.
pub mod color;
/// Configuration loading.
pub mod config;
/// Request/response payloads.
pub mod dto;
/// Error taxonomy and HTTP mapping.
pub mod error;
/// HTTP route trees.
pub mod routes;
/// Application services.
pub mod services;
/// Shared state, sessions, and state machines.
pub mod state;
