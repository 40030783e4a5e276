// Per-event-kind callback registry for a console channel.

use std::panic::{AssertUnwindSafe, catch_unwind};

use super::event::{ChannelError, ChannelEvent, CloseReason};
use crate::schema::{PowerState, ServerStats};

type Callback<T> = Box<dyn Fn(&T) + Send + Sync>;
type Signal = Box<dyn Fn() + Send + Sync>;

/// Callbacks registered before [`connect`](super::WebsocketManager::connect).
///
/// Callbacks run on the channel's task. A panicking callback is logged and
/// does not affect the channel or the other callbacks.
#[derive(Default)]
pub struct ChannelListeners {
    open: Vec<Signal>,
    auth_success: Vec<Signal>,
    token_expiring: Vec<Signal>,
    token_expired: Vec<Signal>,
    console_output: Vec<Callback<str>>,
    install_output: Vec<Callback<str>>,
    daemon_message: Vec<Callback<str>>,
    status: Vec<Callback<PowerState>>,
    stats: Vec<Callback<ServerStats>>,
    closed: Vec<Callback<CloseReason>>,
    errored: Vec<Callback<ChannelError>>,
}

impl ChannelListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires once the socket is open and the `auth` frame is written,
    /// before the daemon answers.
    pub fn on_open(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.open.push(Box::new(f));
        self
    }

    /// Fires on every `auth success`, including after re-authentication.
    pub fn on_auth_success(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.auth_success.push(Box::new(f));
        self
    }

    pub fn on_token_expiring(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.token_expiring.push(Box::new(f));
        self
    }

    /// The token lapsed before it could be renewed. Sends are refused from here
    /// on unless an in-flight renewal lands. The channel does not reconnect.
    pub fn on_token_expired(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.token_expired.push(Box::new(f));
        self
    }

    pub fn on_console_output(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.console_output.push(Box::new(f));
        self
    }

    pub fn on_install_output(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.install_output.push(Box::new(f));
        self
    }

    pub fn on_daemon_message(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.daemon_message.push(Box::new(f));
        self
    }

    pub fn on_status(mut self, f: impl Fn(&PowerState) + Send + Sync + 'static) -> Self {
        self.status.push(Box::new(f));
        self
    }

    pub fn on_stats(mut self, f: impl Fn(&ServerStats) + Send + Sync + 'static) -> Self {
        self.stats.push(Box::new(f));
        self
    }

    pub fn on_close(mut self, f: impl Fn(&CloseReason) + Send + Sync + 'static) -> Self {
        self.closed.push(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&ChannelError) + Send + Sync + 'static) -> Self {
        self.errored.push(Box::new(f));
        self
    }

    pub(crate) fn dispatch(&self, event: &ChannelEvent) {
        match event {
            ChannelEvent::Open => fire_signal(&self.open, "open"),
            ChannelEvent::AuthSuccess => fire_signal(&self.auth_success, "auth success"),
            ChannelEvent::TokenExpiring => fire_signal(&self.token_expiring, "token expiring"),
            ChannelEvent::TokenExpired => fire_signal(&self.token_expired, "token expired"),
            ChannelEvent::ConsoleOutput(line) => {
                fire(&self.console_output, line.as_str(), "console output");
            }
            ChannelEvent::InstallOutput(line) => {
                fire(&self.install_output, line.as_str(), "install output");
            }
            ChannelEvent::DaemonMessage(line) => {
                fire(&self.daemon_message, line.as_str(), "daemon message");
            }
            ChannelEvent::Status(state) => fire(&self.status, state, "status"),
            ChannelEvent::Stats(stats) => fire(&self.stats, stats, "stats"),
            ChannelEvent::Closed(reason) => fire(&self.closed, reason, "close"),
            ChannelEvent::Errored(err) => fire(&self.errored, err, "error"),
        }
    }
}

fn fire<T: ?Sized>(callbacks: &[Callback<T>], value: &T, kind: &'static str) {
    for callback in callbacks {
        if catch_unwind(AssertUnwindSafe(|| callback(value))).is_err() {
            tracing::warn!(listener = kind, "console listener panicked");
        }
    }
}

fn fire_signal(callbacks: &[Signal], kind: &'static str) {
    for callback in callbacks {
        if catch_unwind(AssertUnwindSafe(callback)).is_err() {
            tracing::warn!(listener = kind, "console listener panicked");
        }
    }
}

impl std::fmt::Debug for ChannelListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelListeners")
            .field("open", &self.open.len())
            .field("auth_success", &self.auth_success.len())
            .field("token_expiring", &self.token_expiring.len())
            .field("token_expired", &self.token_expired.len())
            .field("console_output", &self.console_output.len())
            .field("install_output", &self.install_output.len())
            .field("daemon_message", &self.daemon_message.len())
            .field("status", &self.status.len())
            .field("stats", &self.stats.len())
            .field("closed", &self.closed.len())
            .field("errored", &self.errored.len())
            .finish()
    }
}
