// GenieACS NBI HTTP client
//
// Wraps a blocking `reqwest::Client` with base-URL handling, basic auth,
// status checking and error classification. Resource endpoints (devices,
// tasks, tags, ...) are implemented as inherent methods in separate files
// to keep this module focused on transport mechanics.

use std::time::Duration;

use reqwest::blocking::{RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::{ConnectionConfig, Credentials};

/// Longest slice of a response body quoted in an error message.
const BODY_PREVIEW_CHARS: usize = 200;

/// Request body for [`GenieClient::put`].
#[derive(Debug, Clone)]
pub enum Payload {
    /// Serialized as `application/json`.
    Json(serde_json::Value),
    /// Sent verbatim as `text/plain` (provision scripts).
    Text(String),
    /// Sent verbatim as `application/octet-stream` (file content).
    Bytes(Vec<u8>),
}

/// Blocking client for the GenieACS northbound interface.
///
/// Holds one connection-pooling HTTP client for its whole lifetime. All
/// settings come from the [`ConnectionConfig`] it was built from and can't
/// change afterwards; build a new client to talk to a different server.
pub struct GenieClient {
    http: reqwest::blocking::Client,
    base_url: Url,
    credentials: Option<Credentials>,
    timeout: Duration,
}

impl GenieClient {
    /// Create a client from a `ConnectionConfig`.
    pub fn new(config: &ConnectionConfig) -> Result<Self, Error> {
        let http = config.build_client()?;
        Ok(Self {
            http,
            base_url: config.base_url()?,
            credentials: config.credentials.clone(),
            timeout: config.timeout,
        })
    }

    /// Create a client around a pre-built `reqwest` client.
    ///
    /// The caller owns timeout and TLS settings of `http`. Pass the same
    /// `timeout` `http` was built with; it is only used to report
    /// [`Error::Timeout`].
    pub fn with_client(
        http: reqwest::blocking::Client,
        base_url: Url,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            base_url,
            credentials: None,
            timeout,
        }
    }

    /// Attach basic-auth credentials to a client built with
    /// [`with_client`](Self::with_client).
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// The server base URL (including any path prefix).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join `path` (which may carry a query string) onto the base URL.
    ///
    /// `path` must already be percent-encoded; see [`crate::query`].
    pub fn endpoint(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET `path` and parse the response body as JSON.
    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.endpoint(path)?;
        debug!("GET {}", url);
        let resp = self.send(self.http.get(url))?;
        let body = resp.text().map_err(|e| self.classify(e))?;
        serde_json::from_str(&body).map_err(|e| {
            Error::malformed(format!(
                "invalid JSON from GET {path}: {e}: {}",
                body_preview(&body)
            ))
        })
    }

    /// GET `path` and return the raw response bytes.
    pub fn get_bytes(&self, path: &str) -> Result<Vec<u8>, Error> {
        let url = self.endpoint(path)?;
        debug!("GET {}", url);
        let resp = self.send(self.http.get(url))?;
        let bytes = resp.bytes().map_err(|e| self.classify(e))?;
        Ok(bytes.to_vec())
    }

    /// POST a task body.
    ///
    /// With `connection_request` the server is asked to contact the device
    /// immediately instead of waiting for its next periodic inform.
    pub fn post_task(
        &self,
        path: &str,
        body: &impl Serialize,
        connection_request: bool,
    ) -> Result<(), Error> {
        let url = if connection_request {
            self.endpoint(&format!("{path}?connection_request"))?
        } else {
            self.endpoint(path)?
        };
        debug!(connection_request, "POST {}", url);
        self.send(self.http.post(url).json(body))?;
        Ok(())
    }

    /// POST with an empty body (task retry, tag assignment).
    pub fn post(&self, path: &str) -> Result<(), Error> {
        let url = self.endpoint(path)?;
        debug!("POST {}", url);
        self.send(self.http.post(url))?;
        Ok(())
    }

    /// PUT a payload, with optional extra headers.
    pub fn put(&self, path: &str, payload: Payload, headers: &[(&str, &str)]) -> Result<(), Error> {
        let url = self.endpoint(path)?;
        debug!("PUT {}", url);

        let mut req = match payload {
            Payload::Json(value) => self.http.put(url).json(&value),
            Payload::Text(text) => self
                .http
                .put(url)
                .header(reqwest::header::CONTENT_TYPE, "text/plain")
                .body(text),
            Payload::Bytes(bytes) => self
                .http
                .put(url)
                .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
                .body(bytes),
        };
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        self.send(req)?;
        Ok(())
    }

    /// DELETE `path`. A missing resource surfaces as [`Error::Http`].
    pub fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.endpoint(path)?;
        debug!("DELETE {}", url);
        self.send(self.http.delete(url))?;
        Ok(())
    }

    /// Apply credentials, send, and turn non-2xx statuses into errors.
    fn send(&self, req: RequestBuilder) -> Result<Response, Error> {
        let req = match &self.credentials {
            Some(c) => req.basic_auth(&c.username, Some(c.password.expose_secret())),
            None => req,
        };

        let resp = req.send().map_err(|e| self.classify(e))?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().unwrap_or_default();
        debug!(status = status.as_u16(), "request failed");
        Err(Error::Http {
            status: status.as_u16(),
            body,
        })
    }

    fn classify(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else if err.is_connect() {
            Error::Connection {
                url: self.base_url.to_string(),
                source: err,
            }
        } else {
            Error::Transport(err)
        }
    }
}

/// First few characters of a response body, marked when cut short.
fn body_preview(body: &str) -> String {
    match body.char_indices().nth(BODY_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}... ({} bytes)", &body[..cut], body.len()),
        None => body.to_owned(),
    }
}

impl std::fmt::Debug for GenieClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenieClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.credentials.is_some())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
