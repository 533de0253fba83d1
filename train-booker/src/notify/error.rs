//! Notification error types.

use std::path::PathBuf;

/// Errors from a single notification sink.
///
/// These never leave [`Notifier`](super::Notifier); they are logged and
/// dropped there.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// Audio file does not exist
    #[error("audio resource not found: {}", .0.display())]
    MissingResource(PathBuf),

    /// Player process could not be started
    #[error("failed to start audio player: {0}")]
    Io(#[from] std::io::Error),

    /// Player process exited with an error
    #[error("audio player {program} exited with {status}")]
    PlayerFailed { program: String, status: String },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Message API refused the request
    #[error("message API error {status}: {message}")]
    Api { status: u16, message: String },
}
