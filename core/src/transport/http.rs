//! reqwest-backed [`Transport`] implementation.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};

use super::{HttpRequest, HttpResponse, Method, Transport};
use crate::errors::DiskError;

/// HTTP transport carrying the client's default headers on every request.
///
/// One instance serves the JSON API traffic; a second, independently built
/// instance carries large binary transfer bodies. The two share nothing
/// beyond the common headers.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport whose every request carries the OAuth token, the
    /// JSON accept header, and the given user agent.
    pub fn new(token: &str, user_agent: &str) -> Result<Self, DiskError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("OAuth {token}"))
                .map_err(|err| DiskError::Config(format!("invalid token: {err}")))?,
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .map_err(|err| DiskError::Config(format!("invalid user agent: {err}")))?,
        );
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|err| DiskError::Config(err.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, DiskError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.client.request(method, &request.url);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        let response = builder
            .send()
            .await
            .map_err(|err| DiskError::Transport(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|err| DiskError::Transport(err.to_string()))?
            .to_vec();
        Ok(HttpResponse { status, body })
    }
}
