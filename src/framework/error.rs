//! # Framework Errors
//!
//! Common error types for the data-access framework. None of these ever reach a
//! caller of [`DataService`](crate::framework::DataService) directly: they are
//! folded into a failed [`RemoteData`](crate::framework::RemoteData) envelope at
//! the service boundary.

/// Errors that can occur within the data-access framework itself.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum FrameworkError {
    #[error("Request cache closed")]
    ActorClosed,
    #[error("Request cache dropped response channel")]
    ActorDropped,
    #[error("Invalid href: {0}")]
    InvalidHref(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Request abandoned before completion")]
    Abandoned,
}
