// ptero-api: Async Rust client for the Pterodactyl panel (client + application APIs, console websocket)

pub mod application;
pub mod auth;
pub mod client;
pub mod dispatcher;
pub mod endpoint;
pub mod error;
pub mod facade;
pub mod resource;
pub mod schema;
pub mod transport;
pub mod websocket;

// ── Primary re-exports ──────────────────────────────────────────────
pub use auth::Credentials;
pub use error::{ApiError, Error, ErrorKind, TransportError};
pub use facade::PteroClient;
pub use resource::Page;
pub use transport::{ClientOptions, TlsMode};
pub use websocket::{
    ChannelError, ChannelEvent, ChannelListeners, ChannelState, CloseReason, ConsoleChannel,
    WebsocketManager,
};

pub use client::{BackupOptions, PowerAction, RenameOptions};
pub use schema::{PowerSignal, PowerState};
