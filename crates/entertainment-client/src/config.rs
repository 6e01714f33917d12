//! Bridge connection configuration.
//!
//! Configuration is built explicitly or loaded from environment
//! variables. Credentials are redacted in Debug output.

use crate::errors::StreamError;
use crate::transport::PskCredentials;
use secrecy::{ExposeSecret, SecretString};
use std::env;
use std::fmt;
use std::time::Duration;

/// Default timeout for control-plane requests.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variable naming the bridge host.
pub const ENV_BRIDGE_HOST: &str = "HUE_BRIDGE_HOST";

/// Environment variable naming the application key.
pub const ENV_APPLICATION_KEY: &str = "HUE_APPLICATION_KEY";

/// Environment variable naming the entertainment client key.
pub const ENV_CLIENT_KEY: &str = "HUE_CLIENT_KEY";

/// Connection parameters for one Hue bridge.
///
/// Both keys are issued together when a bridge user is created with a
/// client key. Sensitive fields are redacted in Debug output.
#[derive(Clone)]
pub struct BridgeConfig {
    /// Bridge IP or hostname.
    pub host: String,

    /// Application key for the bridge user. Sent as the
    /// `hue-application-key` header and used as the PSK identity.
    /// Protected by `SecretString` to prevent accidental logging.
    pub application_key: SecretString,

    /// Hex-encoded pre-shared key for the streaming transport.
    /// Protected by `SecretString` to prevent accidental logging.
    pub client_key: SecretString,

    /// Timeout applied to control-plane requests.
    pub http_timeout: Duration,
}

/// Custom Debug implementation that redacts sensitive fields.
impl fmt::Debug for BridgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeConfig")
            .field("host", &self.host)
            .field("application_key", &"[REDACTED]")
            .field("client_key", &"[REDACTED]")
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl BridgeConfig {
    /// Create a configuration with the default HTTP timeout.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        application_key: SecretString,
        client_key: SecretString,
    ) -> Self {
        Self {
            host: host.into(),
            application_key,
            client_key,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    /// Load configuration from `HUE_BRIDGE_HOST`, `HUE_APPLICATION_KEY`
    /// and `HUE_CLIENT_KEY`.
    ///
    /// # Errors
    ///
    /// Returns `StreamError::Configuration` naming the first missing
    /// variable.
    pub fn from_env() -> Result<Self, StreamError> {
        let host = require_env(ENV_BRIDGE_HOST)?;
        let application_key = require_env(ENV_APPLICATION_KEY)?;
        let client_key = require_env(ENV_CLIENT_KEY)?;

        Ok(Self::new(
            host,
            SecretString::from(application_key),
            SecretString::from(client_key),
        ))
    }

    /// Set the control-plane request timeout.
    #[must_use]
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Assemble the pre-shared-key material for the transport handshake.
    ///
    /// The PSK identity is the application key; the key itself is the
    /// hex-decoded client key.
    ///
    /// # Errors
    ///
    /// Returns `StreamError::Configuration` if the client key is not
    /// valid hex.
    pub fn psk(&self) -> Result<PskCredentials, StreamError> {
        let key = hex::decode(self.client_key.expose_secret())
            .map_err(|e| StreamError::Configuration(format!("Client key is not valid hex: {e}")))?;

        Ok(PskCredentials::new(
            self.application_key.expose_secret().as_bytes().to_vec(),
            key,
        ))
    }
}

fn require_env(key: &str) -> Result<String, StreamError> {
    env::var(key).map_err(|_| StreamError::Configuration(format!("{key} is not set")))
}
