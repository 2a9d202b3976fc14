use thiserror::Error;

/// Top-level error type for the `unifi-ng-api` crate.
///
/// The first four variants are the controller-facing taxonomy: a host that is
/// not a controller, a rejected login, a non-2xx response, and an envelope
/// that reports failure. Batch callers match on these to decide whether a
/// single failed record should abort the run.
#[derive(Debug, Error)]
pub enum Error {
    // ── Controller ──────────────────────────────────────────────────
    /// Neither marker path answered 200; the host is not a recognised controller.
    #[error("Host is not a supported controller: {base_url}")]
    UnsupportedController { base_url: String },

    // ── Authentication ──────────────────────────────────────────────
    /// The login endpoint answered with something other than 200.
    #[error("Login failed (HTTP {status})")]
    Authentication { status: u16 },

    /// A path was resolved or a request issued before `login()` succeeded.
    #[error("Session is not logged in -- call login() first")]
    NotLoggedIn,

    // ── HTTP / envelope ─────────────────────────────────────────────
    /// Non-2xx response from an authenticated call.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// 2xx response whose envelope reports `meta.rc != "ok"`.
    #[error("Controller API error: {message}")]
    Api { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup failed (unreadable CA file, client builder error).
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// Response body could not be decoded, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Request payload could not be serialized to JSON.
    #[error("Invalid request payload: {0}")]
    Payload(#[source] serde_json::Error),
}

impl Error {
    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status } | Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` for per-request failures a caller may record and skip
    /// past (non-2xx responses and envelope errors).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Api { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_and_api_errors_are_recoverable() {
        let http = Error::Http {
            status: 400,
            body: "api.err.MacUsed".into(),
        };
        let api = Error::Api {
            message: "api.err.InvalidObject".into(),
        };
        assert!(http.is_recoverable());
        assert!(api.is_recoverable());
        assert_eq!(http.status(), Some(400));
        assert_eq!(api.status(), None);
    }

    #[test]
    fn login_and_detection_errors_are_fatal() {
        assert!(!Error::Authentication { status: 401 }.is_recoverable());
        assert!(
            !Error::UnsupportedController {
                base_url: "https://10.0.0.1:443/".into()
            }
            .is_recoverable()
        );
        assert!(!Error::NotLoggedIn.is_recoverable());
        assert_eq!(Error::Authentication { status: 401 }.status(), Some(401));
    }
}
