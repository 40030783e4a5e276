// Console frame codec.
//
// Every frame in either direction is `{ "event": <name>, "args": [<string>...] }`.
// Inbound frames decode into zero or more `ChannelEvent`s; a frame that
// cannot be read is reported as a `FrameError` and the caller drops it.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_tungstenite::tungstenite::Message;

use crate::schema::{PowerSignal, PowerState, ServerStats};

/// Something the console channel reports to listeners and subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// The socket is open and the `auth` frame has been written.
    Open,
    AuthSuccess,
    TokenExpiring,
    TokenExpired,
    /// One console line.
    ConsoleOutput(String),
    /// One line of installer output.
    InstallOutput(String),
    /// A message from the daemon itself, not the game server.
    DaemonMessage(String),
    Status(PowerState),
    Stats(ServerStats),
    Closed(CloseReason),
    Errored(ChannelError),
}

/// Why the channel closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseReason {
    /// Close code from the peer's close frame, if it sent one.
    pub code: Option<u16>,
    pub reason: String,
    /// `true` when the close was requested through [`close`](super::ConsoleChannel::close).
    pub by_client: bool,
}

impl CloseReason {
    pub(crate) fn client() -> Self {
        Self {
            code: Some(1000),
            reason: "closed by client".to_owned(),
            by_client: true,
        }
    }

    pub(crate) fn remote(code: Option<u16>, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
            by_client: false,
        }
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{code} {}", self.reason),
            None => f.write_str(&self.reason),
        }
    }
}

/// A failure reported through the channel rather than returned from a call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The daemon sent `daemon error` or `jwt error`.
    #[error("{event}: {message}")]
    Daemon { event: String, message: String },

    /// Fetching a fresh token after `token expiring` failed.
    #[error("re-authentication failed: {0}")]
    Reauthentication(String),

    /// The socket failed underneath the channel.
    #[error("console transport error: {0}")]
    Transport(String),
}

// ── Inbound ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub(crate) enum FrameError {
    #[error("frame is not a console envelope: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("`{0}` frame has no argument")]
    MissingArgument(String),

    #[error("unknown power state `{0}`")]
    UnknownState(String),

    #[error("stats payload is unreadable: {0}")]
    Stats(#[source] serde_json::Error),
}

#[derive(Deserialize)]
struct InboundFrame {
    event: String,
    #[serde(default)]
    args: Vec<String>,
}

/// Decode one text frame. Events with no listener family decode to nothing.
pub(crate) fn decode_frame(text: &str) -> Result<Vec<ChannelEvent>, FrameError> {
    let frame: InboundFrame = serde_json::from_str(text).map_err(FrameError::Malformed)?;
    let InboundFrame { event, args } = frame;

    let events = match event.as_str() {
        "auth success" => vec![ChannelEvent::AuthSuccess],
        "token expiring" => vec![ChannelEvent::TokenExpiring],
        "token expired" => vec![ChannelEvent::TokenExpired],
        "console output" => args.into_iter().map(ChannelEvent::ConsoleOutput).collect(),
        "install output" => args.into_iter().map(ChannelEvent::InstallOutput).collect(),
        "daemon message" => args.into_iter().map(ChannelEvent::DaemonMessage).collect(),
        "status" => {
            let raw = first_arg(&event, args)?;
            let state = raw.parse().map_err(|_| FrameError::UnknownState(raw))?;
            vec![ChannelEvent::Status(state)]
        }
        "stats" => {
            let raw = first_arg(&event, args)?;
            let stats = serde_json::from_str(&raw).map_err(FrameError::Stats)?;
            vec![ChannelEvent::Stats(stats)]
        }
        "daemon error" | "jwt error" => vec![ChannelEvent::Errored(ChannelError::Daemon {
            message: args.join(" "),
            event,
        })],
        other => {
            tracing::debug!(event = other, "ignoring console event with no listener family");
            Vec::new()
        }
    };
    Ok(events)
}

fn first_arg(event: &str, args: Vec<String>) -> Result<String, FrameError> {
    args.into_iter()
        .next()
        .ok_or_else(|| FrameError::MissingArgument(event.to_owned()))
}

// ── Outbound ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outbound {
    Auth(String),
    RequestStats,
    RequestLogs,
    Command(String),
    SetState(PowerSignal),
}

#[derive(Serialize)]
struct OutboundFrame<'a> {
    event: &'a str,
    args: Vec<&'a str>,
}

impl Outbound {
    pub(crate) fn encode(&self) -> String {
        let frame = match self {
            Self::Auth(token) => OutboundFrame {
                event: "auth",
                args: vec![token],
            },
            Self::RequestStats => OutboundFrame {
                event: "send stats",
                args: Vec::new(),
            },
            Self::RequestLogs => OutboundFrame {
                event: "send logs",
                args: Vec::new(),
            },
            Self::Command(command) => OutboundFrame {
                event: "send command",
                args: vec![command],
            },
            Self::SetState(signal) => OutboundFrame {
                event: "set state",
                args: vec![signal.as_str()],
            },
        };
        serde_json::to_string(&frame).unwrap_or_default()
    }

    pub(crate) fn into_message(self) -> Message {
        Message::Text(self.encode().into())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn console_output_yields_one_event_per_line() {
        let events =
            decode_frame(r#"{"event":"console output","args":["line one","line two"]}"#).unwrap();
        assert_eq!(
            events,
            vec![
                ChannelEvent::ConsoleOutput("line one".into()),
                ChannelEvent::ConsoleOutput("line two".into()),
            ]
        );
    }

    #[test]
    fn stats_argument_is_a_nested_document() {
        let frame = serde_json::json!({
            "event": "stats",
            "args": [r#"{"memory_bytes":1,"memory_limit_bytes":2,"cpu_absolute":0.5,"network":{"rx_bytes":3,"tx_bytes":4},"state":"starting","disk_bytes":5,"uptime":6}"#]
        })
        .to_string();

        let events = decode_frame(&frame).unwrap();
        let [ChannelEvent::Stats(stats)] = events.as_slice() else {
            panic!("expected one stats event, got {events:?}");
        };
        assert_eq!(stats.state, PowerState::Starting);
        assert_eq!(stats.network.rx_bytes, 3);
    }

    #[test]
    fn status_is_a_closed_set() {
        assert_eq!(
            decode_frame(r#"{"event":"status","args":["offline"]}"#).unwrap(),
            vec![ChannelEvent::Status(PowerState::Offline)]
        );
        assert!(matches!(
            decode_frame(r#"{"event":"status","args":["melting"]}"#),
            Err(FrameError::UnknownState(s)) if s == "melting"
        ));
        assert!(matches!(
            decode_frame(r#"{"event":"status"}"#),
            Err(FrameError::MissingArgument(_))
        ));
    }

    #[test]
    fn control_events_decode() {
        assert_eq!(
            decode_frame(r#"{"event":"auth success"}"#).unwrap(),
            vec![ChannelEvent::AuthSuccess]
        );
        assert_eq!(
            decode_frame(r#"{"event":"token expiring","args":[]}"#).unwrap(),
            vec![ChannelEvent::TokenExpiring]
        );
        assert_eq!(
            decode_frame(r#"{"event":"token expired"}"#).unwrap(),
            vec![ChannelEvent::TokenExpired]
        );
    }

    #[test]
    fn daemon_errors_become_error_events() {
        let events = decode_frame(r#"{"event":"jwt error","args":["signature invalid"]}"#).unwrap();
        assert_eq!(
            events,
            vec![ChannelEvent::Errored(ChannelError::Daemon {
                event: "jwt error".into(),
                message: "signature invalid".into(),
            })]
        );
    }

    #[test]
    fn malformed_frames_are_errors() {
        assert!(matches!(decode_frame("not json"), Err(FrameError::Malformed(_))));
        assert!(matches!(
            decode_frame(r#"{"args":["x"]}"#),
            Err(FrameError::Malformed(_))
        ));
    }

    #[test]
    fn unknown_events_decode_to_nothing() {
        assert!(decode_frame(r#"{"event":"backup completed","args":["{}"]}"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn outbound_frames_encode() {
        assert_eq!(
            Outbound::Auth("tok".into()).encode(),
            r#"{"event":"auth","args":["tok"]}"#
        );
        assert_eq!(
            Outbound::SetState(PowerSignal::Kill).encode(),
            r#"{"event":"set state","args":["kill"]}"#
        );
        assert_eq!(
            Outbound::RequestStats.encode(),
            r#"{"event":"send stats","args":[]}"#
        );
        assert_eq!(
            Outbound::Command("say hi".into()).encode(),
            r#"{"event":"send command","args":["say hi"]}"#
        );
    }
}
