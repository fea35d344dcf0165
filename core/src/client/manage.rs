//! Resource management operations: copy, move, delete, folder creation,
//! trash restore, publishing, and saving public resources.

use std::sync::Arc;

use serde_json::Value;

use super::{spawn_op, DiskClient};
use crate::errors::DiskError;
use crate::model::Link;
use crate::path::DiskPath;
use crate::promise::{OnResult, Promise};
use crate::transport::{append_param, fetch_json, Method};

/// Outcome of a copy operation.
#[derive(Debug, Clone)]
pub enum CopyOutcome {
    /// Copied synchronously (201).
    Done(Link),
    /// Accepted for asynchronous processing (202); poll the link.
    InProcess(Link),
    Failed(DiskError),
}

/// Outcome of a move operation.
#[derive(Debug, Clone)]
pub enum MoveOutcome {
    Done(Link),
    InProcess(Link),
    Failed(DiskError),
}

/// Outcome of a deletion.
#[derive(Debug, Clone)]
pub enum DeleteOutcome {
    /// Deleted synchronously (204, empty body).
    Done,
    /// Accepted for asynchronous processing (202); poll the link.
    InProcess(Link),
    Failed(DiskError),
}

/// Outcome of a folder creation.
#[derive(Debug, Clone)]
pub enum MakeFolderOutcome {
    Created(Link),
    Failed(DiskError),
}

/// Outcome of a trash restore.
#[derive(Debug, Clone)]
pub enum RestoreOutcome {
    Done(Link),
    InProcess(Link),
    Failed(DiskError),
}

/// Outcome of publishing or unpublishing a resource.
#[derive(Debug, Clone)]
pub enum PublishOutcome {
    Done(Link),
    Failed(DiskError),
}

/// Outcome of saving a public resource to the user's disk.
#[derive(Debug, Clone)]
pub enum SavePublicOutcome {
    Done(Link),
    InProcess(Link),
    Failed(DiskError),
}

impl DiskClient {
    /// Copy a file or folder.
    ///
    /// `path` is the destination, `from` the resource to copy. `overwrite`
    /// replaces existing files with matching names when `true`.
    pub fn copy_path(
        &self,
        path: &DiskPath,
        from: &DiskPath,
        overwrite: Option<bool>,
        handler: Option<OnResult<CopyOutcome>>,
    ) -> Arc<Promise<CopyOutcome>> {
        let mut url = format!(
            "{}/v1/disk/resources/copy?path={}&from={}",
            self.base_url(),
            path.url_encoded(),
            from.url_encoded()
        );
        append_param(&mut url, "overwrite", overwrite);

        let promise = Promise::with_handler(handler);
        let transport = self.transport();
        spawn_op(&promise, async move {
            match fetch_json(transport.as_ref(), &url, Method::Post, None).await {
                Err(err) => CopyOutcome::Failed(err),
                Ok((json, status)) => match status {
                    201 => CopyOutcome::Done(Link::from_json(&json)),
                    202 => CopyOutcome::InProcess(Link::from_json(&json)),
                    other => {
                        CopyOutcome::Failed(DiskError::api(other, Some(Value::Object(json))))
                    }
                },
            }
        });
        promise
    }

    /// Move a file or folder.
    ///
    /// `path` is the new location, `from` the resource to move.
    pub fn move_path(
        &self,
        path: &DiskPath,
        from: &DiskPath,
        overwrite: Option<bool>,
        handler: Option<OnResult<MoveOutcome>>,
    ) -> Arc<Promise<MoveOutcome>> {
        let mut url = format!(
            "{}/v1/disk/resources/move?path={}&from={}",
            self.base_url(),
            path.url_encoded(),
            from.url_encoded()
        );
        append_param(&mut url, "overwrite", overwrite);

        let promise = Promise::with_handler(handler);
        let transport = self.transport();
        spawn_op(&promise, async move {
            match fetch_json(transport.as_ref(), &url, Method::Post, None).await {
                Err(err) => MoveOutcome::Failed(err),
                Ok((json, status)) => match status {
                    201 => MoveOutcome::Done(Link::from_json(&json)),
                    202 => MoveOutcome::InProcess(Link::from_json(&json)),
                    other => {
                        MoveOutcome::Failed(DiskError::api(other, Some(Value::Object(json))))
                    }
                },
            }
        });
        promise
    }

    /// Delete a file or folder.
    ///
    /// `permanently` skips the trash for app and disk paths. Trash resources
    /// are always removed for good and do not accept the parameter; passing
    /// it for a trash path is a caller bug and panics.
    pub fn delete_path(
        &self,
        path: &DiskPath,
        permanently: Option<bool>,
        handler: Option<OnResult<DeleteOutcome>>,
    ) -> Arc<Promise<DeleteOutcome>> {
        let url = match path {
            DiskPath::App(_) | DiskPath::Disk(_) => {
                let mut url = format!(
                    "{}/v1/disk/resources?path={}",
                    self.base_url(),
                    path.url_encoded()
                );
                append_param(&mut url, "permanently", permanently);
                url
            }
            DiskPath::Trash(_) => {
                assert!(
                    permanently.is_none(),
                    "trash resources do not support the 'permanently' parameter"
                );
                format!(
                    "{}/v1/disk/trash/resources/?path={}",
                    self.base_url(),
                    path.url_encoded()
                )
            }
        };

        let promise = Promise::with_handler(handler);
        let transport = self.transport();
        spawn_op(&promise, async move {
            match fetch_json(transport.as_ref(), &url, Method::Delete, None).await {
                Err(err) => DeleteOutcome::Failed(err),
                Ok((json, status)) => match status {
                    204 => DeleteOutcome::Done,
                    202 => DeleteOutcome::InProcess(Link::from_json(&json)),
                    other => {
                        DeleteOutcome::Failed(DiskError::api(other, Some(Value::Object(json))))
                    }
                },
            }
        });
        promise
    }

    /// Empty the trash.
    pub fn empty_trash(
        &self,
        handler: Option<OnResult<DeleteOutcome>>,
    ) -> Arc<Promise<DeleteOutcome>> {
        self.delete_path(&DiskPath::Trash(String::new()), None, handler)
    }

    /// Create a folder.
    pub fn make_folder(
        &self,
        path: &DiskPath,
        handler: Option<OnResult<MakeFolderOutcome>>,
    ) -> Arc<Promise<MakeFolderOutcome>> {
        let url = format!(
            "{}/v1/disk/resources?path={}",
            self.base_url(),
            path.url_encoded()
        );

        let promise = Promise::with_handler(handler);
        let transport = self.transport();
        spawn_op(&promise, async move {
            match fetch_json(transport.as_ref(), &url, Method::Put, None).await {
                Err(err) => MakeFolderOutcome::Failed(err),
                Ok((json, 201)) => MakeFolderOutcome::Created(Link::from_json(&json)),
                Ok((json, status)) => {
                    MakeFolderOutcome::Failed(DiskError::api(status, Some(Value::Object(json))))
                }
            }
        });
        promise
    }

    /// Restore a resource from the trash.
    ///
    /// `path` is relative to the trash root. `name` renames the restored
    /// resource; `overwrite` replaces an existing resource with that name.
    pub fn restore_path(
        &self,
        path: &DiskPath,
        name: Option<&str>,
        overwrite: Option<bool>,
        handler: Option<OnResult<RestoreOutcome>>,
    ) -> Arc<Promise<RestoreOutcome>> {
        let mut url = format!(
            "{}/v1/disk/trash/resources/restore?path={}",
            self.base_url(),
            path.url_encoded()
        );
        append_param(&mut url, "name", name);
        append_param(&mut url, "overwrite", overwrite);

        let promise = Promise::with_handler(handler);
        let transport = self.transport();
        spawn_op(&promise, async move {
            match fetch_json(transport.as_ref(), &url, Method::Put, None).await {
                Err(err) => RestoreOutcome::Failed(err),
                Ok((json, status)) => match status {
                    201 => RestoreOutcome::Done(Link::from_json(&json)),
                    202 => RestoreOutcome::InProcess(Link::from_json(&json)),
                    other => {
                        RestoreOutcome::Failed(DiskError::api(other, Some(Value::Object(json))))
                    }
                },
            }
        });
        promise
    }

    /// Publish a resource, making it available by public link.
    pub fn publish_path(
        &self,
        path: &DiskPath,
        handler: Option<OnResult<PublishOutcome>>,
    ) -> Arc<Promise<PublishOutcome>> {
        self.publish_url("publish", path, handler)
    }

    /// Revoke a resource's public link.
    pub fn unpublish_path(
        &self,
        path: &DiskPath,
        handler: Option<OnResult<PublishOutcome>>,
    ) -> Arc<Promise<PublishOutcome>> {
        self.publish_url("unpublish", path, handler)
    }

    fn publish_url(
        &self,
        action: &str,
        path: &DiskPath,
        handler: Option<OnResult<PublishOutcome>>,
    ) -> Arc<Promise<PublishOutcome>> {
        let url = format!(
            "{}/v1/disk/resources/{}?path={}",
            self.base_url(),
            action,
            path.url_encoded()
        );

        let promise = Promise::with_handler(handler);
        let transport = self.transport();
        spawn_op(&promise, async move {
            match fetch_json(transport.as_ref(), &url, Method::Put, None).await {
                Err(err) => PublishOutcome::Failed(err),
                Ok((json, 200)) => PublishOutcome::Done(Link::from_json(&json)),
                Ok((json, status)) => {
                    PublishOutcome::Failed(DiskError::api(status, Some(Value::Object(json))))
                }
            }
        });
        promise
    }

    /// Save a public resource to the user's own disk ("Downloads" folder).
    ///
    /// `path` addresses a resource inside a published folder; `name` chooses
    /// the name to save under.
    pub fn save_public_to_disk(
        &self,
        public_key: &str,
        name: Option<&str>,
        path: Option<&str>,
        handler: Option<OnResult<SavePublicOutcome>>,
    ) -> Arc<Promise<SavePublicOutcome>> {
        let mut url = format!(
            "{}/v1/disk/public-resources/save-to-disk/?public_key={}",
            self.base_url(),
            urlencoding::encode(public_key)
        );
        append_param(&mut url, "name", name);
        append_param(&mut url, "path", path);

        let promise = Promise::with_handler(handler);
        let transport = self.transport();
        spawn_op(&promise, async move {
            match fetch_json(transport.as_ref(), &url, Method::Post, None).await {
                Err(err) => SavePublicOutcome::Failed(err),
                Ok((json, status)) => match status {
                    201 => SavePublicOutcome::Done(Link::from_json(&json)),
                    202 => SavePublicOutcome::InProcess(Link::from_json(&json)),
                    other => {
                        SavePublicOutcome::Failed(DiskError::api(other, Some(Value::Object(json))))
                    }
                },
            }
        });
        promise
    }
}
