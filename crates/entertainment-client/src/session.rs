//! Streaming session lifecycle and send pipeline.
//!
//! A session exists only after the control-plane start action succeeds
//! and the transport handshake completes. All datagram writes happen on
//! one background worker so they reach the wire in acceptance order,
//! off the caller's critical path. Teardown runs exactly once no matter
//! how many tasks race [`Session::close`].

use crate::config::BridgeConfig;
use crate::control::ControlPlaneClient;
use crate::errors::StreamError;
use crate::transport::{SecureTransport, TransportConnector, STREAM_PORT};
use entertainment_protocol::codec::{self, CodecError};
use entertainment_protocol::update::{ChannelUpdate, MAX_CHANNELS};
use tokio::sync::{mpsc, Mutex, OnceCell};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Capacity of the write-error report buffer. When it is full new
/// reports are dropped so the worker never stalls on error delivery.
const ERROR_BUFFER_CAPACITY: usize = 10;

/// Entry point for starting streaming sessions.
pub struct StreamClient {
    config: BridgeConfig,
    control: ControlPlaneClient,
}

impl StreamClient {
    /// Create a client from bridge configuration.
    ///
    /// The bridge serves a self-signed certificate, so the built-in
    /// HTTP client skips certificate verification for control-plane
    /// calls. Use [`StreamClient::with_control_plane`] to inject a
    /// differently configured boundary.
    ///
    /// # Errors
    ///
    /// Returns `StreamError::Configuration` if the HTTP client cannot
    /// be built.
    pub fn new(config: BridgeConfig) -> Result<Self, StreamError> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| StreamError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        let control =
            ControlPlaneClient::new(http, config.host.clone(), config.application_key.clone());

        Ok(Self { config, control })
    }

    /// Create a client with an injected control-plane boundary.
    #[must_use]
    pub fn with_control_plane(config: BridgeConfig, control: ControlPlaneClient) -> Self {
        Self { config, control }
    }

    /// Start a streaming session in the given entertainment area.
    ///
    /// The control plane is told to start first; only then does the
    /// transport handshake run. If the handshake fails the error
    /// propagates as-is and no stop action is issued, the bridge times
    /// the announced session out on its own.
    ///
    /// Only one session per area can be active at a time; the bridge
    /// enforces this, not the client.
    ///
    /// # Errors
    ///
    /// `StreamError::ControlPlane`/`StreamError::Http` if the start
    /// action fails (no handshake is attempted), `StreamError::Handshake`
    /// if the transport cannot be established, and
    /// `StreamError::Configuration` if the client key is unusable.
    #[instrument(skip_all)]
    pub async fn start_stream(
        &self,
        area_id: impl Into<String>,
        connector: &dyn TransportConnector,
    ) -> Result<Session, StreamError> {
        let area_id = area_id.into();

        // Assembled before the start action so an unusable client key
        // fails without announcing a session the transport can never
        // serve.
        let credentials = self.config.psk()?;

        self.control.start(&area_id).await?;

        let transport = connector
            .connect(&self.config.host, STREAM_PORT, &credentials)
            .await
            .map_err(|e| StreamError::Handshake(e.to_string()))?;

        info!(
            target: "entertainment_client.session",
            area_id = %area_id,
            "Streaming session started"
        );

        Ok(Session::spawn(area_id, self.control.clone(), transport))
    }
}

/// Start a session with a one-off client.
///
/// Convenience for callers that only ever open a single session.
///
/// # Errors
///
/// Same as [`StreamClient::new`] followed by
/// [`StreamClient::start_stream`].
pub async fn start_stream_once(
    config: BridgeConfig,
    area_id: impl Into<String>,
    connector: &dyn TransportConnector,
) -> Result<Session, StreamError> {
    StreamClient::new(config)?.start_stream(area_id, connector).await
}

/// Handle to an active streaming session.
///
/// The owner must call [`Session::close`]. Dropping the handle stops
/// the send worker but never issues the control-plane stop action.
pub struct Session {
    area_id: String,
    control: ControlPlaneClient,
    sender: Mutex<Option<mpsc::Sender<ChannelUpdate>>>,
    worker: Mutex<Option<JoinHandle<Box<dyn SecureTransport>>>>,
    errors: Mutex<mpsc::Receiver<StreamError>>,
    close_result: OnceCell<Result<(), StreamError>>,
}

/// The transport handle behind the worker is not `Debug`, so the
/// session identifies itself by area and elides its internals.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("area_id", &self.area_id)
            .finish_non_exhaustive()
    }
}

impl Session {
    fn spawn(
        area_id: String,
        control: ControlPlaneClient,
        transport: Box<dyn SecureTransport>,
    ) -> Self {
        // Direct handoff: a slow transport backpressures producers
        // instead of dropping or reordering updates.
        let (update_tx, update_rx) = mpsc::channel(1);
        let (error_tx, error_rx) = mpsc::channel(ERROR_BUFFER_CAPACITY);

        let worker = tokio::spawn(write_loop(area_id.clone(), update_rx, error_tx, transport));

        Self {
            area_id,
            control,
            sender: Mutex::new(Some(update_tx)),
            worker: Mutex::new(Some(worker)),
            errors: Mutex::new(error_rx),
            close_result: OnceCell::new(),
        }
    }

    /// Entertainment area this session streams to.
    #[must_use]
    pub fn area_id(&self) -> &str {
        &self.area_id
    }

    /// Queue one color update for transmission.
    ///
    /// Updates are written in the order they are accepted; the call
    /// suspends while the worker is busy with an earlier write. An
    /// empty update is accepted and later suppressed by the worker,
    /// which makes it a safe keep-alive.
    ///
    /// # Errors
    ///
    /// `StreamError::Codec` if the update exceeds the channel cap,
    /// `StreamError::SessionClosed` once [`Session::close`] has begun.
    pub async fn update(&self, update: ChannelUpdate) -> Result<(), StreamError> {
        if update.len() > MAX_CHANNELS {
            return Err(StreamError::Codec(CodecError::TooManyChannels {
                count: update.len(),
            }));
        }

        let sender = self
            .sender
            .lock()
            .await
            .as_ref()
            .cloned()
            .ok_or(StreamError::SessionClosed)?;

        sender
            .send(update)
            .await
            .map_err(|_| StreamError::SessionClosed)
    }

    /// Take the next unread write failure, if any.
    ///
    /// Write failures do not terminate the session; they accumulate in
    /// a bounded buffer and overflow is discarded.
    pub async fn try_next_error(&self) -> Option<StreamError> {
        self.errors.lock().await.try_recv().ok()
    }

    /// Close the session.
    ///
    /// The first call stops accepting updates, waits for queued writes
    /// to drain, tells the control plane to stop the session and closes
    /// the transport. Every later or concurrent call waits for that
    /// teardown and receives the same result; the teardown itself runs
    /// once.
    ///
    /// # Errors
    ///
    /// The control-plane stop error if there was one, otherwise any
    /// transport close error.
    #[instrument(skip_all, fields(area_id = %self.area_id))]
    pub async fn close(&self) -> Result<(), StreamError> {
        self.close_result
            .get_or_init(|| self.teardown())
            .await
            .clone()
    }

    async fn teardown(&self) -> Result<(), StreamError> {
        // Dropping the sender closes the queue; the worker drains what
        // is already queued and hands the transport back.
        let sender = self.sender.lock().await.take();
        drop(sender);

        let Some(worker) = self.worker.lock().await.take() else {
            return Err(StreamError::SessionClosed);
        };
        let transport = worker.await;

        debug!(
            target: "entertainment_client.session",
            area_id = %self.area_id,
            "Send pipeline drained"
        );

        let stop_result = self.control.stop(&self.area_id).await;

        let close_result = match transport {
            Ok(mut transport) => transport
                .close()
                .await
                .map_err(|e| StreamError::Close(e.to_string())),
            Err(e) => Err(StreamError::Close(format!("Send worker failed: {e}"))),
        };

        info!(
            target: "entertainment_client.session",
            area_id = %self.area_id,
            "Streaming session closed"
        );

        // The control-plane error takes precedence.
        match (stop_result, close_result) {
            (Err(stop), _) => Err(stop),
            (Ok(()), close) => close,
        }
    }
}

/// Single-writer send pipeline.
///
/// Consumes updates until the queue closes, encodes each one and
/// writes it to the transport. Empty updates are suppressed. Failures
/// go through the bounded error buffer and are dropped when it is
/// full; the loop itself keeps running, a lossy stream outlives
/// individual lost datagrams.
async fn write_loop(
    area_id: String,
    mut updates: mpsc::Receiver<ChannelUpdate>,
    errors: mpsc::Sender<StreamError>,
    mut transport: Box<dyn SecureTransport>,
) -> Box<dyn SecureTransport> {
    while let Some(update) = updates.recv().await {
        if update.is_empty() {
            continue;
        }

        let result = match codec::encode(&area_id, &update) {
            Ok(message) => transport
                .write(&message)
                .await
                .map_err(|e| StreamError::Write(e.to_string())),
            Err(e) => Err(StreamError::from(e)),
        };

        if let Err(err) = result {
            warn!(
                target: "entertainment_client.session",
                area_id = %area_id,
                error = %err,
                "Datagram write failed"
            );
            let _ = errors.try_send(err);
        }
    }

    debug!(
        target: "entertainment_client.session",
        area_id = %area_id,
        "Update queue closed, send worker exiting"
    );

    transport
}
