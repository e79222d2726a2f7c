// Connection configuration for building the blocking reqwest client.
//
// Everything about *how* to reach the server lives here: scheme, host,
// port, path prefix, basic-auth credentials, TLS verification and timeout.
// A `ConnectionConfig` is fixed once a `GenieClient` is built from it.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::error::Error;

/// Default port of the GenieACS northbound interface.
pub const DEFAULT_PORT: u16 = 7557;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Basic-auth credential pair.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Configuration for connecting to a single GenieACS server.
///
/// Built by the CLI (or any other consumer) and handed to
/// [`GenieClient::new`](crate::GenieClient::new). The library never
/// reads config files itself.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Server host name or IP address.
    pub host: String,
    /// NBI port (defaults to 7557).
    pub port: u16,
    /// Use `https` instead of `http`.
    pub tls: bool,
    /// Verify the server certificate. Only meaningful with `tls`.
    pub verify_tls: bool,
    /// Optional basic-auth credentials.
    pub credentials: Option<Credentials>,
    /// Optional path prefix when the NBI sits behind a reverse proxy
    /// (e.g. `/acs`).
    pub path_prefix: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl ConnectionConfig {
    /// Plain-HTTP config for `host` with every other setting at its default.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            tls: false,
            verify_tls: false,
            credentials: None,
            path_prefix: String::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_tls(mut self, verify: bool) -> Self {
        self.tls = true;
        self.verify_tls = verify;
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = prefix.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Assemble `scheme://host:port[/prefix]`.
    ///
    /// The prefix is normalized to a single leading slash and no trailing
    /// slash, so `"acs"`, `"/acs"` and `"/acs/"` are equivalent.
    pub fn base_url(&self) -> Result<Url, Error> {
        let scheme = if self.tls { "https" } else { "http" };
        let prefix = self.path_prefix.trim_matches('/');
        let raw = if prefix.is_empty() {
            format!("{scheme}://{}:{}", self.host, self.port)
        } else {
            format!("{scheme}://{}:{}/{prefix}", self.host, self.port)
        };
        Ok(Url::parse(&raw)?)
    }

    /// Build a blocking `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::blocking::Client, Error> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("genieacs-rs/", env!("CARGO_PKG_VERSION")));

        if self.tls && !self.verify_tls {
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}
