// The task that owns one open console socket.
//
// Reads inbound frames, writes outbound ones, and renews the channel token
// when the daemon warns it is about to lapse. At most one renewal is in
// flight: a `token expiring` frame that arrives while the channel is already
// re-authenticating is only reported, never acted on.

use std::sync::Arc;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::{self, Message, Utf8Bytes};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::event::{ChannelError, ChannelEvent, CloseReason, Outbound, decode_frame};
use super::{ChannelListeners, ChannelState, CredentialFetcher};
use crate::error::Error;
use crate::schema::SocketCredentials;

pub(crate) type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;
type Writer = SplitSink<Socket, Message>;
type Renewal = Result<SocketCredentials, Error>;

pub(crate) struct Session {
    pub(crate) fetcher: CredentialFetcher,
    pub(crate) listeners: ChannelListeners,
    pub(crate) events: broadcast::Sender<Arc<ChannelEvent>>,
    pub(crate) state: watch::Sender<ChannelState>,
}

impl Session {
    pub(crate) async fn run(
        self,
        socket: Socket,
        token: String,
        mut commands: mpsc::Receiver<Outbound>,
        cancel: CancellationToken,
    ) {
        let (mut write, mut read) = socket.split();
        let (renew_tx, mut renew_rx) = mpsc::channel::<Renewal>(1);

        // Nothing else may be written before the handshake frame.
        if let Err(e) = write.send(Outbound::Auth(token).into_message()).await {
            self.finish(self.transport_failure(&e));
            return;
        }
        debug!(server = %self.fetcher.server_id, "console auth sent");
        self.emit(ChannelEvent::Open);
        self.set_state(ChannelState::Authenticating);

        let reason = loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    let frame = CloseFrame {
                        code: CloseCode::Normal,
                        reason: Utf8Bytes::from_static("closed by client"),
                    };
                    if let Err(e) = write.send(Message::Close(Some(frame))).await {
                        debug!(error = %e, "close frame not delivered");
                    }
                    break CloseReason::client();
                }
                Some(renewal) = renew_rx.recv() => {
                    if let Err(e) = self.reauthenticate(&mut write, renewal).await {
                        break self.transport_failure(&e);
                    }
                }
                Some(outbound) = commands.recv() => {
                    trace!(frame = ?outbound, "console send");
                    if let Err(e) = write.send(outbound.into_message()).await {
                        break self.transport_failure(&e);
                    }
                }
                frame = read.next() => match frame {
                    Some(Ok(Message::Text(text))) => self.handle_text(text.as_str(), &renew_tx),
                    Some(Ok(Message::Close(frame))) => {
                        let reason = match frame {
                            Some(cf) => CloseReason::remote(Some(u16::from(cf.code)), cf.reason.as_str()),
                            None => CloseReason::remote(None, "connection closed"),
                        };
                        info!(reason = %reason, "console close frame received");
                        break reason;
                    }
                    Some(Ok(_)) => {
                        // Binary, Ping, Pong: tungstenite answers pings itself
                    }
                    Some(Err(e)) => break self.transport_failure(&e),
                    None => break CloseReason::remote(None, "stream ended"),
                },
            }
        };

        self.finish(reason);
    }

    fn handle_text(&self, text: &str, renew: &mpsc::Sender<Renewal>) {
        trace!(frame = text, "console frame");
        let events = match decode_frame(text) {
            Ok(events) => events,
            Err(e) => {
                warn!(error = %e, "dropping unreadable console frame");
                return;
            }
        };

        for event in events {
            match event {
                ChannelEvent::AuthSuccess => {
                    info!(server = %self.fetcher.server_id, "console authenticated");
                    self.set_state(ChannelState::Authenticated);
                }
                ChannelEvent::TokenExpiring => self.begin_renewal(renew),
                ChannelEvent::TokenExpired => {
                    warn!(server = %self.fetcher.server_id, "console token expired");
                    self.set_state(ChannelState::Expired);
                }
                _ => {}
            }
            self.emit(event);
        }
    }

    /// Start fetching a fresh token unless a renewal is already running.
    fn begin_renewal(&self, renew: &mpsc::Sender<Renewal>) {
        let current = *self.state.borrow();
        if current != ChannelState::Authenticated {
            debug!(state = %current, "token renewal already in flight or not yet authenticated");
            return;
        }
        self.set_state(ChannelState::Reauthenticating);

        let fetcher = self.fetcher.clone();
        let renew = renew.clone();
        tokio::spawn(async move {
            let renewal = fetcher.fetch().await;
            // The session may already be gone.
            let _ = renew.send(renewal).await;
        });
    }

    async fn reauthenticate(
        &self,
        write: &mut Writer,
        renewal: Renewal,
    ) -> Result<(), tungstenite::Error> {
        match renewal {
            Ok(credentials) => {
                write
                    .send(Outbound::Auth(credentials.token).into_message())
                    .await?;
                debug!(server = %self.fetcher.server_id, "console re-auth sent");
                if *self.state.borrow() == ChannelState::Reauthenticating {
                    self.set_state(ChannelState::Authenticated);
                } else {
                    // Lapsed token: wait for the daemon's `auth success`.
                    self.set_state(ChannelState::Authenticating);
                }
            }
            Err(e) => {
                warn!(error = %e, "console token renewal failed");
                self.emit(ChannelEvent::Errored(ChannelError::Reauthentication(
                    e.to_string(),
                )));
                if *self.state.borrow() == ChannelState::Reauthenticating {
                    self.set_state(ChannelState::Authenticated);
                }
            }
        }
        Ok(())
    }

    fn transport_failure(&self, e: &tungstenite::Error) -> CloseReason {
        warn!(error = %e, "console transport failed");
        self.emit(ChannelEvent::Errored(ChannelError::Transport(e.to_string())));
        CloseReason::remote(None, e.to_string())
    }

    fn finish(&self, reason: CloseReason) {
        info!(server = %self.fetcher.server_id, reason = %reason, "console channel closed");
        self.emit(ChannelEvent::Closed(reason));
        self.set_state(ChannelState::Closed);
    }

    fn set_state(&self, next: ChannelState) {
        self.state.send_if_modified(|state| {
            if *state == next {
                false
            } else {
                *state = next;
                true
            }
        });
    }

    fn emit(&self, event: ChannelEvent) {
        self.listeners.dispatch(&event);
        // No subscribers is fine.
        let _ = self.events.send(Arc::new(event));
    }
}
