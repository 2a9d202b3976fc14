//! Profile configuration for unifi-ng.
//!
//! TOML profiles, credential resolution (flag/env + keyring + plaintext),
//! and translation to `unifi_ng_api::SessionConfig`. The CLI layers its
//! global-flag overrides on top of a `Profile` before translating it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use unifi_ng_api::SessionConfig;

/// Keyring service name under which passwords are stored.
pub const KEYRING_SERVICE: &str = "unifi-ng";

/// Environment variable consulted for the controller password.
pub const PASSWORD_ENV: &str = "UNIFI_NG_PASSWORD";

/// Prefix of environment variables merged over the config file.
/// Nested keys use `__`, e.g. `UNIFI_NG_DEFAULTS__OUTPUT=json`.
pub const ENV_PREFIX: &str = "UNIFI_NG_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found (available: {available})")]
    ProfileNotFound { name: String, available: String },

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Explicit name, else the configured default, else `"default"`.
    pub fn active_profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.into(),
                available: self.available_profiles(),
            })
    }

    /// Comma-separated, sorted profile names, or `(none)`.
    pub fn available_profiles(&self) -> String {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        if names.is_empty() {
            return "(none)".into();
        }
        names.sort_unstable();
        names.join(", ")
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Request timeout in seconds applied when a profile sets none.
    pub timeout: Option<u64>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}

/// A named controller profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Controller hostname or IP. Ignored when `controller` is set.
    pub host: Option<String>,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Full controller URL, overriding `host`/`port` (reverse proxies, plain HTTP).
    pub controller: Option<String>,

    #[serde(default = "default_site")]
    pub site: String,

    pub username: Option<String>,

    /// Plaintext password (prefer the keyring).
    pub password: Option<String>,

    /// Check the controller certificate against the system store.
    #[serde(default)]
    pub verify_tls: bool,

    /// PEM file of a custom CA; implies verification.
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            host: None,
            port: default_port(),
            controller: None,
            site: default_site(),
            username: None,
            password: None,
            verify_tls: false,
            ca_cert: None,
            timeout: None,
        }
    }
}

fn default_port() -> u16 {
    SessionConfig::DEFAULT_PORT
}
fn default_site() -> String {
    SessionConfig::DEFAULT_SITE.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "unifi-ng").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("unifi-ng");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credentials ─────────────────────────────────────────────────────

fn keyring_user(profile_name: &str) -> String {
    format!("{profile_name}/password")
}

/// Resolve the password: explicit value, then `UNIFI_NG_PASSWORD`, then the
/// system keyring, then the profile's plaintext field.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
    explicit: Option<&str>,
) -> Result<SecretString, ConfigError> {
    // 1. Flag
    if let Some(pw) = explicit {
        return Ok(SecretString::from(pw.to_owned()));
    }

    // 2. Env var
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }

    // 3. Keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name)) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name))
        .map_err(|e| ConfigError::Keyring(e.to_string()))?;
    entry
        .set_password(password)
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `SessionConfig` from a profile.
///
/// `controller` wins over `host`/`port`; a CA certificate implies verification.
pub fn profile_to_session_config(
    profile: &Profile,
    profile_name: &str,
    explicit_password: Option<&str>,
) -> Result<SessionConfig, ConfigError> {
    let username = profile
        .username
        .clone()
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;
    let password = resolve_password(profile, profile_name, explicit_password)?;

    let mut config = match (&profile.controller, &profile.host) {
        (Some(controller), _) => {
            let url: url::Url = controller.parse().map_err(|_| ConfigError::Validation {
                field: "controller".into(),
                reason: format!("invalid URL: {controller}"),
            })?;
            SessionConfig::with_base_url(username, password, url)
        }
        (None, Some(host)) => SessionConfig::new(username, password, host)
            .and_then(|c| c.port(profile.port))
            .map_err(|e| ConfigError::Validation {
                field: "host".into(),
                reason: e.to_string(),
            })?,
        (None, None) => {
            return Err(ConfigError::Validation {
                field: "host".into(),
                reason: format!("profile '{profile_name}' sets neither host nor controller"),
            });
        }
    };

    config = config.site(profile.site.clone());
    config = match profile.ca_cert {
        Some(ref ca) => config.ca_cert(ca.clone()),
        None => config.verify_tls(profile.verify_tls),
    };
    if let Some(secs) = profile.timeout {
        config = config.timeout(Duration::from_secs(secs));
    }

    Ok(config)
}
