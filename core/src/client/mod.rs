//! The API client and its per-endpoint operations.
//!
//! Every public operation is non-blocking at the call site: it returns an
//! [`Promise`] immediately and performs the network exchange on a spawned
//! task. Operations must therefore be called from within a tokio runtime.
//! Cancellation is deliberately not supported: dropping a returned promise
//! does not abort the in-flight request.

mod listing;
mod manage;
mod meta;
mod transfer;

pub use listing::{
    DirectoryFetch, DirectoryOutcome, DirectorySlots, FileListOutcome, FillOutcome,
    LastUploadedOutcome, ListOptions, ListingOutcome, ListingPage, PageArrived, PageSink,
};
pub use manage::{
    CopyOutcome, DeleteOutcome, MakeFolderOutcome, MoveOutcome, PublishOutcome, RestoreOutcome,
    SavePublicOutcome,
};
pub use meta::{
    ApiVersionOutcome, MetainfoOutcome, OperationOutcome, PropertiesOutcome,
    IMPLEMENTED_API_BUILD, IMPLEMENTED_API_VERSION,
};
pub use transfer::{DownloadOutcome, UploadOutcome};

use std::future::Future;
use std::sync::Arc;

use crate::errors::DiskError;
use crate::promise::Promise;
use crate::transport::{HttpTransport, Transport};

const DEFAULT_BASE_URL: &str = "https://cloud-api.yandex.net:443";
const DEFAULT_USER_AGENT: &str = "Yandex Disk rust SDK";

/// Connection settings shared by every operation of one client instance.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub token: String,
    pub base_url: String,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Handle to the Yandex Disk REST API.
///
/// Cloning is cheap; clones share the same two transports. The transfer
/// transport carries large binary bodies and may be configured independently
/// of the API transport (for example for background-capable transfers); no
/// state beyond the common default headers is shared between them.
#[derive(Clone)]
pub struct DiskClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    transfer: Arc<dyn Transport>,
}

impl DiskClient {
    /// Build a client with reqwest transports for both API and transfer
    /// traffic, authenticated with the given OAuth token.
    pub fn new(token: &str) -> Result<Self, DiskError> {
        let config = ClientConfig::new(token);
        let api = HttpTransport::new(&config.token, &config.user_agent)?;
        let transfer = HttpTransport::new(&config.token, &config.user_agent)?;
        Ok(Self::with_transports(&config, Arc::new(api), Arc::new(transfer)))
    }

    /// Build a client over injected transports (tests, custom stacks).
    pub fn with_transports(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
        transfer: Arc<dyn Transport>,
    ) -> Self {
        Self {
            base_url: config.base_url.clone(),
            transport,
            transfer,
        }
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    pub(crate) fn transfer(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transfer)
    }
}

/// Run an operation future on the runtime and settle the promise with its
/// outcome.
pub(crate) fn spawn_op<T, F>(promise: &Arc<Promise<T>>, op: F)
where
    T: Clone + Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    let result = Arc::clone(promise);
    tokio::spawn(async move {
        result.set(op.await);
    });
}
