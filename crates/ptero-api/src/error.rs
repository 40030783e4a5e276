// Error taxonomy for the Pterodactyl client.
//
// Manager methods never let a raw transport outcome escape. Every failure is
// funnelled through `Failure::normalize`, which yields one of three kinds:
// an upstream API error, a validation failure, or a generic failure carrying
// the caller-facing context message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::ValidationFailure;
use crate::websocket::ChannelState;

/// Message attached to every [`Error::Validation`], regardless of which field failed.
pub const VALIDATION_MESSAGE: &str =
    "Received invalid data from the API! Please report this error to the developers!";

/// Message attached to [`Error::InvalidCredentials`].
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Missing/invalid base URL and/or API key!";

/// One entry of the panel's `{ "errors": [...] }` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiError {
    pub code: String,
    pub status: String,
    pub detail: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    errors: Vec<ApiError>,
}

/// Coarse classification of an [`Error`], for callers that only care about the family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The panel rejected the operation and said why.
    Upstream,
    /// The panel answered, but the payload did not match its declared shape.
    Validation,
    /// Network failure, unreadable body, or anything else unclassified.
    Generic,
    /// Caller error detected before any request was sent.
    Usage,
}

/// Top-level error type for the `ptero-api` crate.
#[derive(Debug, Error)]
pub enum Error {
    // ── Upstream ────────────────────────────────────────────────────
    /// Structured error body returned with a non-2xx status.
    /// Only the first entry of `errors[]` is surfaced.
    #[error("Status: {} ({}): {}", .0.status, .0.code, .0.detail)]
    Api(ApiError),

    // ── Validation ──────────────────────────────────────────────────
    /// The response body failed schema validation.
    ///
    /// `reason` is diagnostic only; the display message is fixed.
    #[error("{}", VALIDATION_MESSAGE)]
    Validation { reason: String },

    // ── Generic ─────────────────────────────────────────────────────
    /// Transport or unclassified failure, described by the attempted operation.
    #[error("{context}")]
    Request {
        context: String,
        #[source]
        source: Option<TransportError>,
    },

    // ── Usage ───────────────────────────────────────────────────────
    /// Host or API key was empty or whitespace-only.
    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,

    /// The host could not be parsed as an absolute URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// An endpoint template still had a placeholder after substitution.
    #[error("No value supplied for :{placeholder} in {template}")]
    MissingPathParameter {
        template: &'static str,
        placeholder: String,
    },

    /// An outbound console helper was called outside the authenticated state.
    #[error("Console channel is {state}; outbound frames require an authenticated channel")]
    ChannelNotReady { state: ChannelState },

    /// The HTTP client could not be built (bad CA file, TLS backend failure).
    #[error("HTTP client setup failed: {0}")]
    HttpClient(String),
}

impl Error {
    /// Which taxonomy family this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Api(_) => ErrorKind::Upstream,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Request { .. } => ErrorKind::Generic,
            Self::InvalidCredentials
            | Self::InvalidUrl(_)
            | Self::MissingPathParameter { .. }
            | Self::ChannelNotReady { .. }
            | Self::HttpClient(_) => ErrorKind::Usage,
        }
    }

    /// The upstream error object, if the panel returned one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Returns `true` if the panel reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api(err) => err.status == "404",
            Self::Request {
                source: Some(TransportError::Status { status, .. }),
                ..
            } => *status == reqwest::StatusCode::NOT_FOUND,
            _ => false,
        }
    }

    /// Returns `true` if retrying the same call might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request {
                source: Some(TransportError::Network(e)),
                ..
            } => e.is_timeout() || e.is_connect(),
            Self::Request {
                source: Some(TransportError::Status { status, .. }),
                ..
            } => status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS,
            _ => false,
        }
    }
}

impl From<ValidationFailure> for Error {
    fn from(failure: ValidationFailure) -> Self {
        Self::Validation {
            reason: failure.into_reason(),
        }
    }
}

// ── Raw transport failures ──────────────────────────────────────────

/// A failure reported by the transport before any classification.
///
/// Only ever seen by callers as the `source` of [`Error::Request`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("HTTP {status}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Connection refused, DNS failure, timeout, TLS, etc.
    #[error("HTTP transport error: {0}")]
    Network(#[from] reqwest::Error),

    /// A success response whose body was not JSON.
    #[error("Response body is not valid JSON: {source}")]
    Decode {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// The console websocket could not be opened.
    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),
}

impl TransportError {
    /// The first structured upstream error carried by this failure, if any.
    ///
    /// Every entry of `errors[]` must carry `code`, `status` and `detail`;
    /// anything else is treated as an unstructured body.
    pub fn upstream_error(&self) -> Option<ApiError> {
        let Self::Status { body, .. } = self else {
            return None;
        };
        let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
        envelope.errors.into_iter().next()
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for TransportError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(err))
    }
}

// ── Normalization ───────────────────────────────────────────────────

/// Anything a manager method can catch between dispatch and return.
#[derive(Debug)]
pub(crate) enum Failure {
    Transport(TransportError),
    Invalid(ValidationFailure),
}

impl From<TransportError> for Failure {
    fn from(err: TransportError) -> Self {
        Self::Transport(err)
    }
}

impl From<ValidationFailure> for Failure {
    fn from(failure: ValidationFailure) -> Self {
        Self::Invalid(failure)
    }
}

impl Failure {
    /// Classify a caught failure.
    ///
    /// Order matters: a validation failure is re-raised unchanged, then a
    /// structured upstream error wins over the generic context message.
    pub(crate) fn normalize(self, context: impl FnOnce() -> String) -> Error {
        match self {
            Self::Invalid(failure) => {
                tracing::debug!(reason = %failure, "response failed schema validation");
                Error::from(failure)
            }
            Self::Transport(err) => match err.upstream_error() {
                Some(api) => Error::Api(api),
                None => Error::Request {
                    context: context(),
                    source: Some(err),
                },
            },
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────
