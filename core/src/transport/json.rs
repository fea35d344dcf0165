//! JSON request helper shared by every API operation.

use serde_json::Value;

use super::{HttpRequest, Method, Transport};
use crate::errors::DiskError;
use crate::model::JsonObject;

/// Issue a request and decode the reply as a JSON object.
///
/// - transport-level failure: returned unchanged as [`DiskError::Transport`];
/// - empty body: decodes to the empty object, not a failure;
/// - malformed non-empty body or non-object root: [`DiskError::Decode`];
/// - status in 400..=599: [`DiskError::Api`] with the decoded body attached;
/// - anything else: `(object, status)`, leaving status-specific branching
///   (200 vs 201 vs 202 vs 204) to the calling operation.
pub async fn fetch_json(
    transport: &dyn Transport,
    url: &str,
    method: Method,
    body: Option<Vec<u8>>,
) -> Result<(JsonObject, u16), DiskError> {
    tracing::debug!(method = method.as_str(), url, "issuing API request");
    let response = transport
        .send(HttpRequest {
            url: url.to_string(),
            method,
            body,
        })
        .await?;
    let json = decode_object(&response.body)?;
    if (400..=599).contains(&response.status) {
        return Err(DiskError::api(
            response.status,
            Some(Value::Object(json)),
        ));
    }
    Ok((json, response.status))
}

fn decode_object(body: &[u8]) -> Result<JsonObject, DiskError> {
    if body.is_empty() {
        return Ok(JsonObject::new());
    }
    let text = String::from_utf8_lossy(body).into_owned();
    let value: Value =
        serde_json::from_str(&text).map_err(|err| DiskError::decode(err.to_string(), text.clone()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(DiskError::decode("response root is not a JSON object", text)),
    }
}

/// Append `?name=value` or `&name=value` when the value is present.
///
/// Absent parameters are omitted entirely, never emitted as empty strings.
/// The value's display form is percent-encoded.
pub fn append_param(url: &mut String, name: &str, value: Option<impl ToString>) {
    if let Some(value) = value {
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str(name);
        url.push('=');
        url.push_str(&urlencoding::encode(&value.to_string()));
    }
}
