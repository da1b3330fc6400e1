//! Error types for the client layer.

use devconnect_proto::WireError;
use thiserror::Error;

/// Errors surfaced by session and REST operations.
///
/// Connectivity loss on an established session is not an error value here:
/// it flips the session status and ends its I/O task. Consumers watch
/// [`SessionStatus`](crate::SessionStatus) instead of matching on errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Establishing the realtime connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The session's I/O task is gone; this handle can no longer send.
    #[error("session closed")]
    SessionClosed,

    /// Wire codec failure.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// REST request failed (network error or non-2xx status).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}
