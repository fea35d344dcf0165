//! Upload and download operations.
//!
//! Both are two-step exchanges: a JSON request against the API transport
//! yields a hypermedia link, and the binary body then travels over the
//! separate transfer transport. The binary leg checks only transport and
//! local-I/O failures; API errors surface on the first leg.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use super::{spawn_op, DiskClient};
use crate::errors::DiskError;
use crate::model::Link;
use crate::path::DiskPath;
use crate::promise::{OnResult, Promise};
use crate::transport::{append_param, fetch_json, HttpRequest, Method};

/// Outcome of an upload.
#[derive(Debug, Clone)]
pub enum UploadOutcome {
    /// The file's bytes were transferred.
    Done,
    /// The server fetches the remote source itself (202); poll the link.
    InProcess(Link),
    Failed(DiskError),
}

/// Outcome of a download.
#[derive(Debug, Clone)]
pub enum DownloadOutcome {
    /// The file was written to the requested local path.
    Done,
    Failed(DiskError),
}

impl DiskClient {
    /// Upload a local file to the given disk path.
    pub fn upload_file(
        &self,
        local: &Path,
        to: &DiskPath,
        overwrite: Option<bool>,
        handler: Option<OnResult<UploadOutcome>>,
    ) -> Arc<Promise<UploadOutcome>> {
        let mut url = format!(
            "{}/v1/disk/resources/upload?path={}",
            self.base_url(),
            to.url_encoded()
        );
        append_param(&mut url, "overwrite", overwrite);

        let promise = Promise::with_handler(handler);
        let transport = self.transport();
        let transfer = self.transfer();
        let local = local.to_path_buf();
        spawn_op(&promise, async move {
            let (json, _status) =
                match fetch_json(transport.as_ref(), &url, Method::Get, None).await {
                    Ok(reply) => reply,
                    Err(err) => return UploadOutcome::Failed(err),
                };
            let link = Link::from_json(&json);
            let body = match tokio::fs::read(&local).await {
                Ok(bytes) => bytes,
                Err(err) => return UploadOutcome::Failed(DiskError::Io(err.to_string())),
            };
            let request = HttpRequest {
                url: link.href.clone(),
                method: Method::from_name(&link.method).unwrap_or(Method::Put),
                body: Some(body),
            };
            match transfer.send(request).await {
                Ok(_) => UploadOutcome::Done,
                Err(err) => UploadOutcome::Failed(err),
            }
        });
        promise
    }

    /// Ask the server to fetch a publicly reachable URL onto the disk.
    ///
    /// Unlike [`upload_file`](DiskClient::upload_file), no overwrite flag
    /// exists for remote sources; the server always accepts asynchronously.
    pub fn upload_from_url(
        &self,
        source_url: &str,
        to: &DiskPath,
        handler: Option<OnResult<UploadOutcome>>,
    ) -> Arc<Promise<UploadOutcome>> {
        let url = format!(
            "{}/v1/disk/resources/upload?path={}&url={}",
            self.base_url(),
            to.url_encoded(),
            urlencoding::encode(source_url)
        );

        let promise = Promise::with_handler(handler);
        let transport = self.transport();
        spawn_op(&promise, async move {
            match fetch_json(transport.as_ref(), &url, Method::Post, None).await {
                Err(err) => UploadOutcome::Failed(err),
                Ok((json, 202)) => UploadOutcome::InProcess(Link::from_json(&json)),
                Ok((json, status)) => {
                    UploadOutcome::Failed(DiskError::api(status, Some(Value::Object(json))))
                }
            }
        });
        promise
    }

    /// Download a resource to a local file.
    pub fn download_path(
        &self,
        path: &DiskPath,
        to_file: &Path,
        handler: Option<OnResult<DownloadOutcome>>,
    ) -> Arc<Promise<DownloadOutcome>> {
        let url = format!(
            "{}/v1/disk/resources/download?path={}",
            self.base_url(),
            path.url_encoded()
        );
        self.download_url(url, to_file.to_path_buf(), handler)
    }

    /// Download a public resource to a local file.
    ///
    /// `path` addresses a file inside a published folder when `public_key`
    /// names the folder itself.
    pub fn download_public(
        &self,
        public_key: &str,
        path: Option<&str>,
        to_file: &Path,
        handler: Option<OnResult<DownloadOutcome>>,
    ) -> Arc<Promise<DownloadOutcome>> {
        let mut url = format!(
            "{}/v1/disk/public-resources/download/?public_key={}",
            self.base_url(),
            urlencoding::encode(public_key)
        );
        append_param(&mut url, "path", path);
        self.download_url(url, to_file.to_path_buf(), handler)
    }

    fn download_url(
        &self,
        url: String,
        to_file: PathBuf,
        handler: Option<OnResult<DownloadOutcome>>,
    ) -> Arc<Promise<DownloadOutcome>> {
        let promise = Promise::with_handler(handler);
        let transport = self.transport();
        let transfer = self.transfer();
        spawn_op(&promise, async move {
            let (json, _status) =
                match fetch_json(transport.as_ref(), &url, Method::Get, None).await {
                    Ok(reply) => reply,
                    Err(err) => return DownloadOutcome::Failed(err),
                };
            let link = Link::from_json(&json);
            let request = HttpRequest {
                url: link.href.clone(),
                method: Method::from_name(&link.method).unwrap_or(Method::Get),
                body: None,
            };
            let response = match transfer.send(request).await {
                Ok(response) => response,
                Err(err) => return DownloadOutcome::Failed(err),
            };
            match tokio::fs::write(&to_file, &response.body).await {
                Ok(()) => DownloadOutcome::Done,
                Err(err) => DownloadOutcome::Failed(DiskError::Io(err.to_string())),
            }
        });
        promise
    }
}
