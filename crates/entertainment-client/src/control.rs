//! CLIP v2 control-plane boundary.
//!
//! The control plane is only told when streaming starts and stops; all
//! color data flows over the datagram transport. This boundary is kept
//! thin on purpose: one resource, two actions.

use crate::errors::StreamError;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, warn};

/// Header carrying the application key on every request.
const APPLICATION_KEY_HEADER: &str = "hue-application-key";

#[derive(Serialize)]
struct ActionBody {
    action: &'static str,
}

/// Client for the entertainment-configuration resource.
#[derive(Clone, Debug)]
pub struct ControlPlaneClient {
    http: reqwest::Client,
    base_url: String,
    application_key: SecretString,
}

impl ControlPlaneClient {
    /// Create a client addressing `https://{host}`.
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        host: impl Into<String>,
        application_key: SecretString,
    ) -> Self {
        Self::with_base_url(http, format!("https://{}", host.into()), application_key)
    }

    /// Create a client with an explicit base URL, for non-default
    /// schemes or ports.
    #[must_use]
    pub fn with_base_url(
        http: reqwest::Client,
        base_url: String,
        application_key: SecretString,
    ) -> Self {
        Self {
            http,
            base_url,
            application_key,
        }
    }

    /// Tell the bridge to start streaming to an area.
    ///
    /// # Errors
    ///
    /// `StreamError::ControlPlane` on any non-200 response,
    /// `StreamError::Http` when the bridge cannot be reached.
    pub async fn start(&self, area_id: &str) -> Result<(), StreamError> {
        self.stream_action(area_id, "start").await
    }

    /// Tell the bridge to stop streaming to an area.
    ///
    /// # Errors
    ///
    /// `StreamError::ControlPlane` on any non-200 response,
    /// `StreamError::Http` when the bridge cannot be reached.
    pub async fn stop(&self, area_id: &str) -> Result<(), StreamError> {
        self.stream_action(area_id, "stop").await
    }

    async fn stream_action(&self, area_id: &str, action: &'static str) -> Result<(), StreamError> {
        let url = format!(
            "{}/clip/v2/resource/entertainment_configuration/{area_id}",
            self.base_url
        );

        debug!(
            target: "entertainment_client.control",
            area_id = %area_id,
            action = %action,
            "Sending stream action"
        );

        let response = self
            .http
            .put(&url)
            .header(APPLICATION_KEY_HEADER, self.application_key.expose_secret())
            .json(&ActionBody { action })
            .send()
            .await
            .map_err(|e| StreamError::Http(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!(
                target: "entertainment_client.control",
                area_id = %area_id,
                action = %action,
                status = %status,
                "Stream action rejected"
            );
            return Err(StreamError::ControlPlane {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}
