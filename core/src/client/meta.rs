//! Disk metadata, API version, operation polling, and custom properties.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use super::{spawn_op, DiskClient};
use crate::errors::DiskError;
use crate::model::{decode_resource, JsonObject, Resource};
use crate::path::DiskPath;
use crate::promise::{OnResult, Promise};
use crate::transport::{fetch_json, Method};

/// Highest API version fully implemented by this crate.
pub const IMPLEMENTED_API_VERSION: &str = "v1";
/// Backend build the implementation was written against.
pub const IMPLEMENTED_API_BUILD: &str = "2.6.37";

/// Outcome of the disk metainfo request.
#[derive(Debug, Clone)]
pub enum MetainfoOutcome {
    Done {
        total_space: u64,
        used_space: u64,
        trash_size: u64,
        /// Well-known folders by display name ("Downloads", ...).
        system_folders: HashMap<String, DiskPath>,
    },
    Failed(DiskError),
}

/// Outcome of the backend version request.
#[derive(Debug, Clone)]
pub enum ApiVersionOutcome {
    Done { build: String, version: String },
    Failed(DiskError),
}

/// Outcome of an operation-status poll.
#[derive(Debug, Clone)]
pub enum OperationOutcome {
    /// The bare status string ("in-progress", "success", "failed"); no
    /// further structure is guaranteed by the API.
    Status(String),
    Failed(DiskError),
}

/// Outcome of a custom-properties patch.
#[derive(Debug, Clone)]
pub enum PropertiesOutcome {
    /// The updated resource as re-reported by the server.
    Done(Resource),
    Failed(DiskError),
}

impl DiskClient {
    /// Capacity and system-folder metainfo for the whole disk.
    pub fn metainfo(
        &self,
        handler: Option<OnResult<MetainfoOutcome>>,
    ) -> Arc<Promise<MetainfoOutcome>> {
        let url = format!("{}/v1/disk/", self.base_url());

        let promise = Promise::with_handler(handler);
        let transport = self.transport();
        spawn_op(&promise, async move {
            match fetch_json(transport.as_ref(), &url, Method::Get, None).await {
                Err(err) => MetainfoOutcome::Failed(err),
                Ok((json, 200)) => match decode_metainfo(&json) {
                    Some(outcome) => outcome,
                    None => MetainfoOutcome::Failed(DiskError::decode(
                        "incomplete JSON response",
                        Value::Object(json).to_string(),
                    )),
                },
                Ok((json, status)) => {
                    MetainfoOutcome::Failed(DiskError::api(status, Some(Value::Object(json))))
                }
            }
        });
        promise
    }

    /// Version and build of the backend API.
    pub fn api_version(
        &self,
        handler: Option<OnResult<ApiVersionOutcome>>,
    ) -> Arc<Promise<ApiVersionOutcome>> {
        let url = format!("{}/", self.base_url());

        let promise = Promise::with_handler(handler);
        let transport = self.transport();
        spawn_op(&promise, async move {
            match fetch_json(transport.as_ref(), &url, Method::Get, None).await {
                Err(err) => ApiVersionOutcome::Failed(err),
                Ok((json, 200)) => {
                    match (
                        json.get("build").and_then(Value::as_str),
                        json.get("api_version").and_then(Value::as_str),
                    ) {
                        (Some(build), Some(version)) => ApiVersionOutcome::Done {
                            build: build.to_string(),
                            version: version.to_string(),
                        },
                        _ => ApiVersionOutcome::Failed(DiskError::decode(
                            "incomplete JSON response",
                            Value::Object(json).to_string(),
                        )),
                    }
                }
                Ok((json, status)) => {
                    ApiVersionOutcome::Failed(DiskError::api(status, Some(Value::Object(json))))
                }
            }
        });
        promise
    }

    /// Poll the status of an asynchronous operation by its href, as carried
    /// in `InProcess` outcomes.
    pub fn operation_status(
        &self,
        href: &str,
        handler: Option<OnResult<OperationOutcome>>,
    ) -> Arc<Promise<OperationOutcome>> {
        let promise = Promise::with_handler(handler);
        let transport = self.transport();
        let url = href.to_string();
        spawn_op(&promise, async move {
            match fetch_json(transport.as_ref(), &url, Method::Get, None).await {
                Err(err) => OperationOutcome::Failed(err),
                Ok((json, 200)) => match json.get("status").and_then(Value::as_str) {
                    Some(status) => OperationOutcome::Status(status.to_string()),
                    None => OperationOutcome::Failed(DiskError::decode(
                        "missing 'status' in json reply",
                        Value::Object(json).to_string(),
                    )),
                },
                Ok((json, status)) => {
                    OperationOutcome::Failed(DiskError::api(status, Some(Value::Object(json))))
                }
            }
        });
        promise
    }

    /// Poll the status of an asynchronous operation by its identifier.
    pub fn operation_status_by_id(
        &self,
        operation_id: &str,
        handler: Option<OnResult<OperationOutcome>>,
    ) -> Arc<Promise<OperationOutcome>> {
        let href = format!("{}/v1/disk/operations/{}", self.base_url(), operation_id);
        self.operation_status(&href, handler)
    }

    /// Patch a resource's custom properties.
    ///
    /// `properties` maps names to values; a `null` value deletes the
    /// property. The map is wrapped in a `custom_properties` envelope unless
    /// it already carries one.
    pub fn patch_custom_properties(
        &self,
        path: &DiskPath,
        properties: JsonObject,
        handler: Option<OnResult<PropertiesOutcome>>,
    ) -> Arc<Promise<PropertiesOutcome>> {
        let url = format!(
            "{}/v1/disk/resources?path={}",
            self.base_url(),
            path.url_encoded()
        );
        let wrapped = if properties.contains_key("custom_properties") {
            Value::Object(properties)
        } else {
            let mut envelope = JsonObject::new();
            envelope.insert("custom_properties".to_string(), Value::Object(properties));
            Value::Object(envelope)
        };

        let promise = Promise::with_handler(handler);
        let body = match serde_json::to_vec(&wrapped) {
            Ok(body) => body,
            Err(err) => {
                promise.set(PropertiesOutcome::Failed(DiskError::decode(
                    err.to_string(),
                    String::new(),
                )));
                return promise;
            }
        };
        let transport = self.transport();
        spawn_op(&promise, async move {
            match fetch_json(transport.as_ref(), &url, Method::Patch, Some(body)).await {
                Err(err) => PropertiesOutcome::Failed(err),
                Ok((json, 200)) => match decode_resource(&Value::Object(json.clone())) {
                    Some(resource) => PropertiesOutcome::Done(resource),
                    None => PropertiesOutcome::Failed(DiskError::api(
                        200,
                        Some(Value::Object(json)),
                    )),
                },
                Ok((json, status)) => {
                    PropertiesOutcome::Failed(DiskError::api(status, Some(Value::Object(json))))
                }
            }
        });
        promise
    }

    /// Set one custom property on a resource.
    pub fn set_custom_property(
        &self,
        path: &DiskPath,
        name: &str,
        value: Value,
        handler: Option<OnResult<PropertiesOutcome>>,
    ) -> Arc<Promise<PropertiesOutcome>> {
        let mut properties = JsonObject::new();
        properties.insert(name.to_string(), value);
        self.patch_custom_properties(path, properties, handler)
    }

    /// Remove one custom property from a resource.
    pub fn remove_custom_property(
        &self,
        path: &DiskPath,
        name: &str,
        handler: Option<OnResult<PropertiesOutcome>>,
    ) -> Arc<Promise<PropertiesOutcome>> {
        self.set_custom_property(path, name, Value::Null, handler)
    }
}

fn decode_metainfo(json: &JsonObject) -> Option<MetainfoOutcome> {
    let folders = json.get("system_folders")?.as_object()?;
    let total_space = json.get("total_space")?.as_u64()?;
    let used_space = json.get("used_space")?.as_u64()?;
    let trash_size = json.get("trash_size")?.as_u64()?;
    let mut system_folders = HashMap::new();
    for (name, value) in folders {
        if let Some(path) = value.as_str() {
            system_folders.insert(name.clone(), DiskPath::parse(path));
        }
    }
    Some(MetainfoOutcome::Done {
        total_space,
        used_space,
        trash_size,
        system_folders,
    })
}
