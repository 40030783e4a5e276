// Response schemas and the validation pipeline.
//
// Every panel response is checked against a declared shape before a caller
// sees it. Single resources arrive as `{ object, attributes }`, collections
// as `{ object: "list", data: [...], meta? }`. The discriminator is checked
// before anything else; fields are matched strictly with no coercion.

mod account;
mod application;
mod backup;
mod common;
mod file;
mod server;
mod socket;

use std::fmt;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub use account::AccountDetails;
pub use application::{
    Allocation, Database, DatabaseHost, DatabasePassword, DatabaseRelationships, Egg, EggConfig,
    Location, Nest, Node, NodeApiConfiguration, NodeConfiguration, NodeSftpConfiguration,
    NodeSslConfiguration, NodeSystemConfiguration, User,
};
pub use backup::{Backup, BackupAttributes, BackupListMeta};
pub use common::{ListMeta, Pagination, SignedUrl, Timestamp};
pub use file::FileObject;
pub use server::{
    FeatureLimits, PowerSignal, PowerState, ResourceUsage, Server, ServerAllocation, ServerLimits,
    ServerRelationships, ServerResources, SftpDetails,
};
pub use socket::{NetworkStats, ServerStats, SocketCredentials};

pub(crate) use socket::CredentialsEnvelope;

// ── Validation failure ───────────────────────────────────────────────

/// A payload that did not match its declared schema.
///
/// The reason is diagnostic; callers see the fixed validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    reason: String,
}

impl ValidationFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn into_reason(self) -> String {
        self.reason
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl std::error::Error for ValidationFailure {}

// ── Schema trait ─────────────────────────────────────────────────────

/// An attribute payload wrapped in a `{ object, attributes }` envelope.
pub trait Schema: DeserializeOwned {
    /// Expected value of the envelope's `object` discriminator.
    const OBJECT: &'static str;

    /// The in-memory form handed to callers, derived from the validated payload.
    type Entity: From<Self>;
}

/// A single validated envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged<S>(pub S);

impl<'de, S: Schema> Deserialize<'de> for Tagged<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            object: String,
            attributes: Value,
        }

        let raw = Raw::deserialize(deserializer)?;
        check_discriminator(&raw.object, S::OBJECT)?;
        S::deserialize(raw.attributes)
            .map(Tagged)
            .map_err(|e| D::Error::custom(format!("{}.attributes: {e}", S::OBJECT)))
    }
}

/// A validated `list` envelope, before entity transformation.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEnvelope<S, M> {
    pub data: Vec<S>,
    pub meta: M,
}

impl<'de, S: Schema, M: DeserializeOwned> Deserialize<'de> for ListEnvelope<S, M> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            object: String,
            data: Vec<Value>,
            #[serde(default)]
            meta: Value,
        }

        let raw = Raw::deserialize(deserializer)?;
        check_discriminator(&raw.object, "list")?;

        let data = raw
            .data
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                Tagged::<S>::deserialize(item)
                    .map(|tagged| tagged.0)
                    .map_err(|e| D::Error::custom(format!("data[{i}]: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let meta =
            M::deserialize(raw.meta).map_err(|e| D::Error::custom(format!("meta: {e}")))?;

        Ok(Self { data, meta })
    }
}

fn check_discriminator<E: serde::de::Error>(found: &str, expected: &str) -> Result<(), E> {
    if found == expected {
        Ok(())
    } else {
        Err(E::custom(format!(
            "object: expected `{expected}`, found `{found}`"
        )))
    }
}

/// A list of `S`, where `S` is itself wrapped in a nested envelope.
///
/// Used for relationship blocks embedded in a parent resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NestedList<S>(pub Vec<S>);

impl<S> NestedList<S> {
    pub fn items(&self) -> &[S] {
        &self.0
    }
}

impl<'de, S: Schema> Deserialize<'de> for NestedList<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let list = ListEnvelope::<S, Option<Value>>::deserialize(deserializer)?;
        Ok(Self(list.data))
    }
}

// ── Validation entry points ──────────────────────────────────────────

/// Validate a value against a plain (non-enveloped) schema.
pub fn validate<T: DeserializeOwned>(candidate: &Value) -> Result<T, ValidationFailure> {
    T::deserialize(candidate).map_err(|e| ValidationFailure::new(e.to_string()))
}

/// Validate a single `{ object, attributes }` envelope.
pub fn validate_single<S: Schema>(candidate: &Value) -> Result<S, ValidationFailure> {
    validate::<Tagged<S>>(candidate).map(|tagged| tagged.0)
}

/// Validate a `list` envelope whose items are `S` envelopes and whose meta is `M`.
///
/// Use `Option<_>` for `M` when the meta block is optional.
pub fn validate_list<S: Schema, M: DeserializeOwned>(
    candidate: &Value,
) -> Result<ListEnvelope<S, M>, ValidationFailure> {
    validate::<ListEnvelope<S, M>>(candidate)
}
