//! Shared test utilities for yadisk core integration tests.
//!
//! Provides a scripted [`MockTransport`] implementing the core's transport
//! seam, a client builder wired to it, and JSON builders for resource and
//! listing payloads.

// Each integration test is compiled as its own crate, so not every test file
// uses every function from this shared module. Suppress dead_code warnings.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use yadisk_core::client::{ClientConfig, DiskClient};
use yadisk_core::errors::DiskError;
use yadisk_core::transport::{HttpRequest, HttpResponse, Transport};

struct Route {
    marker: String,
    status: u16,
    body: Vec<u8>,
    delay: Option<Duration>,
    fail: bool,
}

/// Transport stub replaying canned responses.
///
/// Routes are matched in registration order against the request URL by
/// substring, so register the most specific markers first. Requests with no
/// matching route panic to surface scripting mistakes immediately.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Respond to URLs containing `marker` with a JSON body.
    pub fn respond(&self, marker: &str, status: u16, body: Value) {
        self.push(Route {
            marker: marker.to_string(),
            status,
            body: body.to_string().into_bytes(),
            delay: None,
            fail: false,
        });
    }

    /// Respond with raw bytes (binary transfer legs, empty 204 bodies).
    pub fn respond_raw(&self, marker: &str, status: u16, body: &[u8]) {
        self.push(Route {
            marker: marker.to_string(),
            status,
            body: body.to_vec(),
            delay: None,
            fail: false,
        });
    }

    /// Respond with a JSON body after a delay, for out-of-order arrival.
    pub fn respond_delayed(&self, marker: &str, status: u16, body: Value, delay_ms: u64) {
        self.push(Route {
            marker: marker.to_string(),
            status,
            body: body.to_string().into_bytes(),
            delay: Some(Duration::from_millis(delay_ms)),
            fail: false,
        });
    }

    /// Fail URLs containing `marker` with a transport error.
    pub fn fail(&self, marker: &str) {
        self.push(Route {
            marker: marker.to_string(),
            status: 0,
            body: Vec::new(),
            delay: None,
            fail: true,
        });
    }

    fn push(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }

    /// URLs of all requests seen so far, in arrival order.
    pub fn request_urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|request| request.url.clone())
            .collect()
    }

    /// Full copies of all requests seen so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, DiskError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = {
            let routes = self.routes.lock().unwrap();
            match routes.iter().find(|route| request.url.contains(&route.marker)) {
                Some(route) => (route.status, route.body.clone(), route.delay, route.fail),
                None => panic!("no mock route matches request: {}", request.url),
            }
        };
        let (status, body, delay, fail) = reply;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if fail {
            return Err(DiskError::Transport("mock transport failure".into()));
        }
        Ok(HttpResponse { status, body })
    }
}

/// A client whose API and transfer traffic both hit the given mock.
pub fn mock_client(transport: &Arc<MockTransport>) -> DiskClient {
    let mut config = ClientConfig::new("test-token");
    config.base_url = "https://disk.example".to_string();
    DiskClient::with_transports(
        &config,
        Arc::clone(transport) as Arc<dyn Transport>,
        Arc::clone(transport) as Arc<dyn Transport>,
    )
}

/// A file resource JSON object.
pub fn file_json(name: &str, dir: &str) -> Value {
    json!({
        "type": "file",
        "name": name,
        "path": format!("{dir}/{name}"),
        "created": "2014-04-22T10:32:49+04:00",
        "modified": "2014-04-22T10:32:49+04:00",
        "size": 1024,
        "mime_type": "application/octet-stream"
    })
}

/// A directory resource JSON object.
pub fn dir_json(path: &str) -> Value {
    json!({
        "type": "dir",
        "name": path.rsplit('/').next().unwrap_or_default(),
        "path": path,
        "created": "2014-04-22T10:32:49+04:00",
        "modified": "2014-04-22T10:32:49+04:00"
    })
}

/// A directory listing response with an `_embedded` page.
pub fn listing_json(
    dir_path: &str,
    items: Vec<Value>,
    sort: &str,
    limit: usize,
    offset: usize,
    total: usize,
) -> Value {
    let mut root = dir_json(dir_path);
    root.as_object_mut().unwrap().insert(
        "_embedded".to_string(),
        json!({
            "path": dir_path,
            "sort": sort,
            "limit": limit,
            "offset": offset,
            "total": total,
            "items": items
        }),
    );
    root
}

/// A hypermedia link body as returned by async-accepted operations.
pub fn link_json(href: &str, method: &str) -> Value {
    json!({"href": href, "method": method, "templated": false})
}
