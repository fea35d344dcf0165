//! The resource model and its JSON decoding contract.
//!
//! Resources are constructed exclusively by decoding server JSON and are
//! immutable afterwards. Decoding is strict about the five required fields
//! (any missing or wrong-typed one voids the whole resource) but lenient
//! about optional ones (a wrong-typed optional degrades to "not present").

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::path::DiskPath;

/// JSON object alias used by decoders and error payloads.
pub type JsonObject = serde_json::Map<String, Value>;

/// Whether a resource is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    File,
    Dir,
}

/// One file or directory entry as reported by the API.
///
/// An instance exists only if all five required fields (`type`, `name`,
/// `path`, `created`, `modified`) were present and well-typed in the source
/// JSON; see [`decode_resource`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub name: String,
    pub path: DiskPath,
    /// Creation timestamp; unparseable date strings fall back to the epoch.
    #[serde(deserialize_with = "timestamp_or_epoch")]
    pub created: DateTime<Utc>,
    /// Modification timestamp; unparseable date strings fall back to the epoch.
    #[serde(deserialize_with = "timestamp_or_epoch")]
    pub modified: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient")]
    pub size: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub md5: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub mime_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub media_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub preview: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub public_key: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub public_url: Option<String>,
    /// Original location of a trashed resource.
    #[serde(default, deserialize_with = "lenient")]
    pub origin_path: Option<String>,
    /// Open key-to-value map attached by API consumers.
    #[serde(default, deserialize_with = "lenient")]
    pub custom_properties: Option<JsonObject>,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.size {
            Some(size) => write!(
                f,
                "f {} \t{} bytes \t{}",
                self.name,
                size,
                self.mime_type.as_deref().unwrap_or_default()
            ),
            None => write!(f, "d {}", self.name),
        }
    }
}

fn timestamp_or_epoch<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(DateTime::parse_from_rfc3339(&raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH))
}

/// Optional fields decode permissively: absent, null, or wrong-typed values
/// all become `None` instead of failing the resource.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Decode a single resource object.
///
/// Returns `None` (not an error) when the value is not an object or any
/// required field is missing or wrong-typed.
pub fn decode_resource(value: &Value) -> Option<Resource> {
    serde_json::from_value(value.clone()).ok()
}

/// Decode an array of resources atomically.
///
/// Returns `None` when the value is absent, not an array, or ANY element
/// fails to decode. Field-level leniency inside one element does not soften
/// this all-or-nothing contract.
pub fn decode_resources(value: Option<&Value>) -> Option<Vec<Resource>> {
    serde_json::from_value(value?.clone()).ok()
}

/// Hypermedia pointer returned by async-accepted (202) operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub method: String,
    pub templated: bool,
}

impl Link {
    /// Decode from a response object; the empty link when keys are absent.
    ///
    /// Panics when the server marks the href as templated: no caller handles
    /// templated hrefs, so continuing would be a silent contract violation.
    pub fn from_json(json: &JsonObject) -> Link {
        match (
            json.get("href").and_then(Value::as_str),
            json.get("method").and_then(Value::as_str),
            json.get("templated").and_then(Value::as_bool),
        ) {
            (Some(href), Some(method), Some(templated)) => {
                assert!(!templated, "templated hrefs are not handled");
                Link {
                    href: href.to_string(),
                    method: method.to_string(),
                    templated,
                }
            }
            _ => Link::default(),
        }
    }
}
