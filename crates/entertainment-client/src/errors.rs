//! Streaming client error types.
//!
//! Variants carry rendered messages rather than error sources so a
//! close outcome can be cached once and cloned to every caller.

use entertainment_protocol::codec::CodecError;
use thiserror::Error;

/// Errors surfaced by session operations.
///
/// Start-time errors (control plane, handshake, configuration) and
/// encoding errors are returned synchronously and are fatal to the
/// operation that raised them; nothing is retried. Write failures on an
/// active session are reported asynchronously through the session's
/// error buffer and do not terminate the stream.
#[derive(Error, Debug, Clone)]
pub enum StreamError {
    /// The control plane rejected a start/stop action.
    #[error("Control plane returned status {status}")]
    ControlPlane {
        /// HTTP status code of the rejected action.
        status: u16,
    },

    /// The control plane could not be reached.
    #[error("Control plane request failed: {0}")]
    Http(String),

    /// The secure-transport handshake failed.
    #[error("Transport handshake failed: {0}")]
    Handshake(String),

    /// A message could not be encoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// A datagram write failed on an active session.
    #[error("Transport write failed: {0}")]
    Write(String),

    /// The transport failed to shut down cleanly.
    #[error("Transport close failed: {0}")]
    Close(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The session is closed or closing.
    #[error("Session is closed")]
    SessionClosed,
}
