//! Server console over the daemon's websocket.
//!
//! [`WebsocketManager::connect`] fetches one-time credentials from the panel,
//! opens the socket, and hands it to a background task that authenticates,
//! routes inbound frames to [`ChannelListeners`] and broadcast subscribers,
//! and renews the token on `token expiring` without reopening the socket.
//!
//! # Example
//!
//! ```rust,ignore
//! use ptero_api::{ChannelListeners, PteroClient};
//!
//! let client = PteroClient::new("https://panel.example.com", "ptlc_...")?;
//! let listeners = ChannelListeners::new()
//!     .on_console_output(|line| println!("{line}"));
//!
//! let console = client.websocket().connect("fe564c9a", listeners).await?;
//! console.wait_until_authenticated().await?;
//! console.send_command("say hello").await?;
//! console.close().await;
//! ```

mod event;
mod listeners;
mod session;

use std::fmt;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch};
use tokio_tungstenite::tungstenite::{self, ClientRequestBuilder};
use tokio_util::sync::CancellationToken;
use tracing::info;
use url::Url;

pub use event::{ChannelError, ChannelEvent, CloseReason};
pub use listeners::ChannelListeners;

use self::event::Outbound;
use self::session::{Session, Socket};
use crate::dispatcher::Dispatcher;
use crate::endpoint::client;
use crate::error::{Error, Failure, TransportError};
use crate::schema::{self, CredentialsEnvelope, PowerSignal, SocketCredentials};

// ── Channel capacities ───────────────────────────────────────────────

const EVENT_CHANNEL_CAPACITY: usize = 1024;
const COMMAND_CHANNEL_CAPACITY: usize = 64;

// ── ChannelState ─────────────────────────────────────────────────────

/// Lifecycle of a console channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    /// Socket open, handshake frame not yet sent.
    Connecting,
    /// `auth` sent, waiting for `auth success`.
    Authenticating,
    Authenticated,
    /// Fetching a fresh token after `token expiring`. The socket stays authenticated.
    Reauthenticating,
    /// The daemon sent `token expired`. Outbound frames are refused until a
    /// renewed token is accepted.
    Expired,
    Closed,
}

impl ChannelState {
    /// Whether outbound frames are accepted in this state.
    pub fn accepts_outbound(self) -> bool {
        matches!(self, Self::Authenticated | Self::Reauthenticating)
    }
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Authenticating => "authenticating",
            Self::Authenticated => "authenticated",
            Self::Reauthenticating => "reauthenticating",
            Self::Expired => "expired",
            Self::Closed => "closed",
        })
    }
}

// ── Credentials ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub(crate) struct CredentialFetcher {
    dispatcher: Arc<Dispatcher>,
    server_id: String,
}

impl CredentialFetcher {
    async fn fetch(&self) -> Result<SocketCredentials, Error> {
        let url = self
            .dispatcher
            .url(client::WEBSOCKET, &[("server_id", self.server_id.as_str())])?;
        let result: Result<_, Failure> = async {
            let body = self.dispatcher.get(url).await?;
            Ok(schema::validate::<CredentialsEnvelope>(&body)?.data)
        }
        .await;
        result.map_err(|failure| {
            failure.normalize(|| {
                format!("Failed to get websocket credentials for server {}!", self.server_id)
            })
        })
    }
}

// ── WebsocketManager ─────────────────────────────────────────────────

/// Opens console channels for servers visible to the client key.
pub struct WebsocketManager {
    dispatcher: Arc<Dispatcher>,
    origin: String,
}

impl WebsocketManager {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>, origin: String) -> Self {
        Self { dispatcher, origin }
    }

    fn fetcher(&self, server_id: &str) -> CredentialFetcher {
        CredentialFetcher {
            dispatcher: Arc::clone(&self.dispatcher),
            server_id: server_id.to_owned(),
        }
    }

    /// One-time token and socket address for a server's console.
    pub async fn credentials(&self, server_id: &str) -> Result<SocketCredentials, Error> {
        self.fetcher(server_id).fetch().await
    }

    /// Open and authenticate a console channel.
    ///
    /// Returns once the socket is open and the `auth` frame is queued.
    /// Authentication completes in the background; watch
    /// [`ConsoleChannel::state_changes`] or register
    /// [`ChannelListeners::on_auth_success`].
    pub async fn connect(
        &self,
        server_id: &str,
        listeners: ChannelListeners,
    ) -> Result<ConsoleChannel, Error> {
        let fetcher = self.fetcher(server_id);
        let credentials = fetcher.fetch().await?;

        info!(server = server_id, socket = %credentials.socket, "opening console channel");
        let socket = open(&credentials.socket, &self.origin)
            .await
            .map_err(|err| Error::Request {
                context: format!("Failed to open the console of server {server_id}!"),
                source: Some(err),
            })?;

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (state_tx, state_rx) = watch::channel(ChannelState::Connecting);
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();

        let session = Session {
            fetcher,
            listeners,
            events: events.clone(),
            state: state_tx,
        };
        tokio::spawn(session.run(socket, credentials.token, commands_rx, cancel.clone()));

        Ok(ConsoleChannel {
            server_id: server_id.to_owned(),
            commands: commands_tx,
            state: state_rx,
            events,
            cancel,
        })
    }
}

impl fmt::Debug for WebsocketManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebsocketManager")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

async fn open(socket: &Url, origin: &str) -> Result<Socket, TransportError> {
    let uri: tungstenite::http::Uri = socket.as_str().parse().map_err(
        |e: tungstenite::http::uri::InvalidUri| {
            TransportError::from(tungstenite::Error::HttpFormat(e.into()))
        },
    )?;
    let request = ClientRequestBuilder::new(uri).with_header("Origin", origin);
    let (stream, _response) = tokio_tungstenite::connect_async(request).await?;
    Ok(stream)
}

// ── ConsoleChannel ───────────────────────────────────────────────────

/// Handle to an open console channel.
///
/// Dropping the handle closes the channel.
pub struct ConsoleChannel {
    server_id: String,
    commands: mpsc::Sender<Outbound>,
    state: watch::Receiver<ChannelState>,
    events: broadcast::Sender<Arc<ChannelEvent>>,
    cancel: CancellationToken,
}

impl ConsoleChannel {
    pub fn server_id(&self) -> &str {
        &self.server_id
    }

    pub fn state(&self) -> ChannelState {
        *self.state.borrow()
    }

    /// A receiver that observes every state transition.
    pub fn state_changes(&self) -> watch::Receiver<ChannelState> {
        self.state.clone()
    }

    /// Receive every event emitted from now on.
    ///
    /// A subscriber that falls behind gets
    /// [`broadcast::error::RecvError::Lagged`].
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<ChannelEvent>> {
        self.events.subscribe()
    }

    /// Wait for the first `auth success`.
    ///
    /// Fails with [`Error::ChannelNotReady`] if the channel closes or its
    /// token expires first.
    pub async fn wait_until_authenticated(&self) -> Result<(), Error> {
        let mut state = self.state.clone();
        let reached = state
            .wait_for(|s| {
                s.accepts_outbound() || matches!(s, ChannelState::Expired | ChannelState::Closed)
            })
            .await
            .map(|s| *s)
            .unwrap_or(ChannelState::Closed);
        if reached.accepts_outbound() {
            Ok(())
        } else {
            Err(Error::ChannelNotReady { state: reached })
        }
    }

    /// Ask the daemon for a `stats` frame now.
    pub async fn request_stats(&self) -> Result<(), Error> {
        self.send(Outbound::RequestStats).await
    }

    /// Ask the daemon to replay recent console output.
    pub async fn request_logs(&self) -> Result<(), Error> {
        self.send(Outbound::RequestLogs).await
    }

    pub async fn send_command(&self, command: &str) -> Result<(), Error> {
        self.send(Outbound::Command(command.to_owned())).await
    }

    /// Change power state over the console instead of the HTTP API.
    pub async fn set_power_state(&self, signal: PowerSignal) -> Result<(), Error> {
        self.send(Outbound::SetState(signal)).await
    }

    async fn send(&self, outbound: Outbound) -> Result<(), Error> {
        let state = self.state();
        if !state.accepts_outbound() {
            return Err(Error::ChannelNotReady { state });
        }
        self.commands
            .send(outbound)
            .await
            .map_err(|_| Error::ChannelNotReady {
                state: ChannelState::Closed,
            })
    }

    /// Close the channel and wait for the background task to finish.
    ///
    /// Close listeners have run by the time this returns.
    pub async fn close(&self) {
        self.cancel.cancel();
        let mut state = self.state.clone();
        let _ = state.wait_for(|s| *s == ChannelState::Closed).await;
    }

    pub fn is_closed(&self) -> bool {
        self.state() == ChannelState::Closed
    }
}

impl Drop for ConsoleChannel {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl fmt::Debug for ConsoleChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleChannel")
            .field("server_id", &self.server_id)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
