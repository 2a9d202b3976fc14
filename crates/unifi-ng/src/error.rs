//! CLI error types with miette diagnostics.
//!
//! Maps `unifi_ng_api::Error` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use unifi_ng_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const PARTIAL_FAILURE: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(unifi_ng::connection_failed),
        help(
            "Check that the controller is running and reachable.\n\
             Self-hosted controllers usually listen on 8443: try --port 8443"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(unifi_ng::timeout),
        help("Increase the timeout with --timeout or check controller responsiveness.")
    )]
    Timeout { url: String },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(unifi_ng::tls_error),
        help(
            "Check the ca_cert path in your profile, or drop --verify-tls\n\
             for a controller with a self-signed certificate."
        )
    )]
    TlsError { message: String },

    #[error("{url} is not a UniFi Network controller")]
    #[diagnostic(
        code(unifi_ng::unsupported_controller),
        help("Neither /api nor /network answered. Check the host and port.")
    )]
    UnsupportedController { url: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed (HTTP {status})")]
    #[diagnostic(
        code(unifi_ng::auth_failed),
        help(
            "Verify the username and password. Local accounts are required;\n\
             store a password with: unifi-ng config set-password"
        )
    )]
    AuthFailed { status: u16 },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(unifi_ng::no_credentials),
        help(
            "Configure credentials with: unifi-ng config init\n\
             Or pass --username and set UNIFI_NG_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Controller responses ─────────────────────────────────────────
    #[error("Controller answered HTTP {status}")]
    #[diagnostic(code(unifi_ng::http), help("Response body: {body}"))]
    Http { status: u16, body: String },

    #[error("Controller rejected the request: {message}")]
    #[diagnostic(code(unifi_ng::api_error))]
    ApiError { message: String },

    #[error("Unexpected controller response: {message}")]
    #[diagnostic(
        code(unifi_ng::unexpected_response),
        help("Run with -vv to log the request that produced it.")
    )]
    UnexpectedResponse { message: String },

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(unifi_ng::not_found),
        help("Run: unifi-ng {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Batch ────────────────────────────────────────────────────────
    #[error("{failed} of {total} records were rejected")]
    #[diagnostic(
        code(unifi_ng::partial_failure),
        help("The rejected records are listed in the report above.")
    )]
    PartialFailure { failed: usize, total: usize },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(unifi_ng::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(unifi_ng::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: unifi-ng config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No controller configured")]
    #[diagnostic(
        code(unifi_ng::no_config),
        help(
            "Create a profile with: unifi-ng config init\n\
             Expected at: {path}\n\
             Or pass --host / --controller."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(unifi_ng::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(unifi_ng::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(unifi_ng::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Invalid CSV input: {0}")]
    #[diagnostic(code(unifi_ng::csv))]
    Csv(#[from] csv::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::UnsupportedController { .. } => exit_code::UNSUPPORTED,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Http { status, .. } => match status {
                401 | 403 => exit_code::AUTH,
                404 => exit_code::NOT_FOUND,
                _ => exit_code::GENERAL,
            },
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::PartialFailure { .. } => exit_code::PARTIAL_FAILURE,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Library error mapping ────────────────────────────────────────────

impl From<unifi_ng_api::Error> for CliError {
    fn from(err: unifi_ng_api::Error) -> Self {
        use unifi_ng_api::Error as E;

        match err {
            E::UnsupportedController { base_url } => Self::UnsupportedController { url: base_url },
            E::Authentication { status } => Self::AuthFailed { status },
            E::Http { status, body } => Self::Http { status, body },
            E::Api { message } => Self::ApiError { message },
            E::Transport(e) => {
                let url = e.url().map_or_else(|| "(unknown)".into(), ToString::to_string);
                if e.is_timeout() {
                    Self::Timeout { url }
                } else {
                    Self::ConnectionFailed {
                        url,
                        source: Box::new(e),
                    }
                }
            }
            E::InvalidUrl(e) => Self::Validation {
                field: "controller".into(),
                reason: e.to_string(),
            },
            E::Tls(message) => Self::TlsError { message },
            E::Deserialization { message, .. } => Self::UnexpectedResponse { message },
            E::Payload(e) => Self::Json(e),
            E::NotLoggedIn => Self::UnexpectedResponse {
                message: "request issued before login".into(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::ProfileNotFound { name, available } => {
                Self::ProfileNotFound { name, available }
            }
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_errors_map_to_exit_codes() {
        let cases = [
            (
                unifi_ng_api::Error::UnsupportedController {
                    base_url: "https://10.0.0.1/".into(),
                },
                exit_code::UNSUPPORTED,
            ),
            (
                unifi_ng_api::Error::Authentication { status: 400 },
                exit_code::AUTH,
            ),
            (
                unifi_ng_api::Error::Http {
                    status: 404,
                    body: String::new(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                unifi_ng_api::Error::Api {
                    message: "api.err.MacUsed".into(),
                },
                exit_code::GENERAL,
            ),
        ];

        for (err, code) in cases {
            assert_eq!(CliError::from(err).exit_code(), code);
        }
    }

    #[test]
    fn partial_failure_has_its_own_code() {
        let err = CliError::PartialFailure {
            failed: 1,
            total: 3,
        };
        assert_eq!(err.exit_code(), exit_code::PARTIAL_FAILURE);
    }

    #[test]
    fn config_credentials_error_is_auth() {
        let err = CliError::from(ConfigError::NoCredentials {
            profile: "home".into(),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
