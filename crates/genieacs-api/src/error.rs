use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the `genieacs-api` crate.
///
/// Covers every failure mode of the client: reaching the server,
/// non-2xx responses, payloads that aren't the JSON we expect, and
/// local file I/O during import/export. The CLI maps these into
/// user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// The server could not be reached (connection refused, DNS failure, etc.)
    #[error("Could not connect to {url}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Request exceeded the configured timeout.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Any other HTTP transport error (body decoding, redirects, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Server ──────────────────────────────────────────────────────
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// Response or file content is not the JSON shape we expect.
    #[error("Malformed data: {message}")]
    MalformedData { message: String },

    // ── Local files ─────────────────────────────────────────────────
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedData {
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// The client never retries on its own; this is a hint for callers.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Connection { .. } | Self::Timeout { .. } => true,
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_404_is_not_found() {
        let err = Error::Http {
            status: 404,
            body: "Task not found".into(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_transient());
        assert_eq!(err.to_string(), "HTTP 404: Task not found");
    }

    #[test]
    fn server_errors_are_transient() {
        let err = Error::Http {
            status: 503,
            body: String::new(),
        };
        assert!(err.is_transient());
        assert!(Error::Timeout { timeout_secs: 10 }.is_transient());
    }

    #[test]
    fn malformed_data_is_permanent() {
        let err = Error::malformed("expected a JSON array");
        assert!(!err.is_transient());
        assert_eq!(err.status(), None);
    }
}
