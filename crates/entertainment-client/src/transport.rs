//! Secured datagram transport seam.
//!
//! The DTLS dial, handshake and encryption live behind
//! [`TransportConnector`]; the session only ever writes to and closes an
//! already-established [`SecureTransport`]. Keeping the transport as an
//! injected capability lets the session logic run against an in-memory
//! fake in tests.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

/// UDP port the bridge listens on for streaming data.
pub const STREAM_PORT: u16 = 2100;

/// Pre-shared-key material for the transport handshake.
///
/// The protocol pins the cipher suite to PSK AES-128-GCM with SHA-256;
/// connector implementations configure that on their own DTLS stack.
pub struct PskCredentials {
    identity: Vec<u8>,
    key: SecretBox<Vec<u8>>,
}

impl PskCredentials {
    /// Create credentials from a PSK identity and raw key bytes.
    #[must_use]
    pub fn new(identity: Vec<u8>, key: Vec<u8>) -> Self {
        Self {
            identity,
            key: SecretBox::new(Box::new(key)),
        }
    }

    /// PSK identity hint presented during the handshake.
    #[must_use]
    pub fn identity(&self) -> &[u8] {
        &self.identity
    }

    /// Raw pre-shared key bytes.
    #[must_use]
    pub fn key(&self) -> &[u8] {
        self.key.expose_secret()
    }
}

/// Custom Debug implementation that redacts the key material.
impl fmt::Debug for PskCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PskCredentials")
            .field("identity", &"[REDACTED]")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Error raised by transport implementations.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(String);

impl TransportError {
    /// Wrap an implementation-specific failure message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// An established, authenticated datagram connection.
///
/// Implementations are exclusively owned by one session and written to
/// by a single task, so no internal write locking is required.
#[async_trait]
pub trait SecureTransport: Send {
    /// Write one datagram.
    async fn write(&mut self, payload: &[u8]) -> Result<(), TransportError>;

    /// Close the connection.
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Dials and handshakes a [`SecureTransport`].
#[async_trait]
pub trait TransportConnector: Send + Sync {
    /// Establish a secured connection to `host:port`.
    ///
    /// The handshake must be complete before this returns; the session
    /// starts writing immediately.
    async fn connect(
        &self,
        host: &str,
        port: u16,
        credentials: &PskCredentials,
    ) -> Result<Box<dyn SecureTransport>, TransportError>;
}
