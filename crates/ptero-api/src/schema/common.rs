// Field-level building blocks shared across schemas.

use chrono::{DateTime, FixedOffset};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use url::Url;

use super::Schema;

/// Deserialize a field that must be present but may be `null`.
///
/// Plain `Option<T>` fields treat a missing key as `None`; fields using
/// this helper reject a missing key.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

// ── Timestamp ────────────────────────────────────────────────────────

/// An ISO-8601 timestamp string with an explicit UTC offset.
///
/// Keeps the wire text alongside the parsed value so it serializes back
/// exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    raw: String,
    value: DateTime<FixedOffset>,
}

impl Timestamp {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn to_datetime(&self) -> DateTime<FixedOffset> {
        self.value
    }
}

impl std::str::FromStr for Timestamp {
    type Err = chrono::ParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = DateTime::parse_from_rfc3339(raw)?;
        Ok(Self {
            raw: raw.to_owned(),
            value,
        })
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|e| D::Error::custom(format!("invalid timestamp {raw:?}: {e}")))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

// ── Pagination ───────────────────────────────────────────────────────

/// Laravel-style pagination block found under `meta.pagination`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Pagination {
    pub total: u64,
    pub count: u64,
    pub per_page: u64,
    pub current_page: u64,
    pub total_pages: u64,
    #[serde(deserialize_with = "links")]
    pub links: Map<String, Value>,
}

/// Meta block of a paginated list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ListMeta {
    pub pagination: Pagination,
}

/// The panel encodes an empty link map as `[]`; accept that as an empty object.
fn links<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Map<String, Value>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        Value::Array(items) if items.is_empty() => Ok(Map::new()),
        other => Err(D::Error::custom(format!(
            "links: expected an object, found {other}"
        ))),
    }
}

// ── Signed URL ───────────────────────────────────────────────────────

/// A short-lived download link (`object: "signed_url"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SignedUrl {
    pub url: Url,
}

impl Schema for SignedUrl {
    const OBJECT: &'static str = "signed_url";
    type Entity = Self;
}
