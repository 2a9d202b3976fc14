// Controller session
//
// Owns the per-login state: the transport handle, the detected topology, and
// the CSRF token. Only `login`, `logout`, and `update_token` mutate those
// fields; every endpoint goes resolve -> execute -> decode through here.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::HeaderMap;
use secrecy::SecretString;
use serde::Serialize;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::paths::{self, ApiFamily, SiteScope};
use crate::topology::ControllerTopology;
use crate::transport::{TlsMode, TransportConfig};

/// Header carrying the anti-forgery token, both directions.
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Header UniFi OS uses to hand out a rotated token.
pub const UPDATED_CSRF_HEADER: &str = "X-Updated-CSRF-Token";

// ── Configuration ───────────────────────────────────────────────────

/// Everything needed to open a session against one controller.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub username: String,
    pub password: SecretString,
    /// Controller root, always ending in `/`.
    pub base_url: Url,
    /// Site used when a call does not name one.
    pub site: String,
    pub tls: TlsMode,
    pub timeout: Option<Duration>,
}

impl SessionConfig {
    pub const DEFAULT_PORT: u16 = 443;
    pub const DEFAULT_SITE: &'static str = "default";

    /// `https://{host}:443/`, site `default`, certificate checks off.
    pub fn new(
        username: impl Into<String>,
        password: SecretString,
        host: &str,
    ) -> Result<Self, Error> {
        let base_url = Url::parse(&format!("https://{host}:{}/", Self::DEFAULT_PORT))?;
        Ok(Self::with_base_url(username, password, base_url))
    }

    /// Use an explicit controller URL (custom scheme, reverse-proxy path, test server).
    pub fn with_base_url(username: impl Into<String>, password: SecretString, base_url: Url) -> Self {
        Self {
            username: username.into(),
            password,
            base_url: normalize_base(base_url),
            site: Self::DEFAULT_SITE.to_owned(),
            tls: TlsMode::DangerAcceptInvalid,
            timeout: None,
        }
    }

    pub fn port(mut self, port: u16) -> Result<Self, Error> {
        self.base_url
            .set_port(Some(port))
            .map_err(|()| Error::InvalidUrl(url::ParseError::InvalidPort))?;
        Ok(self)
    }

    pub fn site(mut self, site: impl Into<String>) -> Self {
        self.site = site.into();
        self
    }

    /// `true` checks certificates against the system store.
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.tls = if verify {
            TlsMode::System
        } else {
            TlsMode::DangerAcceptInvalid
        };
        self
    }

    pub fn ca_cert(mut self, path: PathBuf) -> Self {
        self.tls = TlsMode::CustomCa(path);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

// ── Request parameters ──────────────────────────────────────────────

/// Query string and JSON body for a single request.
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    pub query: Vec<(String, String)>,
    pub json: Option<serde_json::Value>,
}

impl RequestParams {
    pub fn none() -> Self {
        Self::default()
    }

    /// Serialize `body` as the JSON request body.
    pub fn json(body: &impl Serialize) -> Result<Self, Error> {
        Ok(Self {
            query: Vec::new(),
            json: Some(serde_json::to_value(body).map_err(Error::Payload)?),
        })
    }

    pub fn query<K: Into<String>, V: Into<String>>(
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        Self {
            query: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            json: None,
        }
    }
}

// ── Session ─────────────────────────────────────────────────────────

/// One logged-in conversation with a controller.
///
/// Mutating operations take `&mut self`: a session is used by one caller at
/// a time. Workers that want parallel uploads open one session each.
pub struct Session {
    pub(crate) config: SessionConfig,
    pub(crate) topology: Option<ControllerTopology>,
    pub(crate) csrf_token: Option<String>,
    pub(crate) http: Option<reqwest::Client>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            topology: None,
            csrf_token: None,
            http: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// The session's default site.
    pub fn site(&self) -> &str {
        &self.config.site
    }

    /// Topology detected by the last successful login.
    pub fn topology(&self) -> Option<ControllerTopology> {
        self.topology
    }

    pub fn is_unified(&self) -> bool {
        self.topology.is_some_and(ControllerTopology::is_unified)
    }

    pub fn is_logged_in(&self) -> bool {
        self.http.is_some()
    }

    /// Login path used for the detected topology, e.g. `api/auth/login`.
    pub fn login_path(&self) -> Option<String> {
        self.topology.map(ControllerTopology::login_path)
    }

    /// The stored anti-forgery token.
    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    pub(crate) fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            tls: self.config.tls.clone(),
            timeout: self.config.timeout,
            cookie_jar: None,
        }
        .with_cookie_jar()
    }

    // ── CSRF token management ─────────────────────────────────────────

    /// Absorb the token from a response's headers.
    ///
    /// Header absent: the stored token is left alone. Header present: it
    /// replaces the stored token, and an empty value clears it.
    /// `X-Updated-CSRF-Token` takes precedence over `X-CSRF-Token`.
    pub fn update_token(&mut self, headers: &HeaderMap) {
        let Some(value) = headers
            .get(UPDATED_CSRF_HEADER)
            .or_else(|| headers.get(CSRF_HEADER))
        else {
            return;
        };

        match value.to_str() {
            Ok("") => {
                trace!("CSRF token cleared");
                self.csrf_token = None;
            }
            Ok(token) => {
                trace!("CSRF token rotated");
                self.csrf_token = Some(token.to_owned());
            }
            Err(_) => trace!("ignoring non-ASCII CSRF header"),
        }
    }

    /// Apply the stored CSRF token to a request builder.
    pub(crate) fn apply_csrf(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.csrf_token.as_deref() {
            Some(token) => builder.header(CSRF_HEADER, token),
            None => builder,
        }
    }

    // ── Path resolution ──────────────────────────────────────────────

    /// Root path for `family` under `scope`, ending in `/`.
    ///
    /// Fails with `NotLoggedIn` until a login has detected the topology.
    pub fn resolve(&self, family: ApiFamily, scope: SiteScope<'_>) -> Result<String, Error> {
        let topology = self.topology.ok_or(Error::NotLoggedIn)?;
        Ok(paths::family_path(
            &self.config.base_url,
            topology,
            family,
            scope,
            &self.config.site,
        ))
    }

    /// Full endpoint URL: resolved root plus `suffix`.
    pub fn endpoint_url(
        &self,
        family: ApiFamily,
        scope: SiteScope<'_>,
        suffix: &str,
    ) -> Result<Url, Error> {
        let root = self.resolve(family, scope)?;
        Ok(Url::parse(&format!("{root}{suffix}"))?)
    }

    // ── Request execution ────────────────────────────────────────────

    /// Send a request with the current security headers.
    ///
    /// The token is refreshed from the response whatever its status. Non-2xx
    /// becomes `Error::Http`; otherwise the raw response is returned for the
    /// caller to decode or inspect.
    pub async fn execute(
        &mut self,
        method: Method,
        url: Url,
        params: &RequestParams,
    ) -> Result<reqwest::Response, Error> {
        let http = self.http.as_ref().ok_or(Error::NotLoggedIn)?;
        debug!("{} {}", method, url);

        let mut builder = http.request(method, url);
        if !params.query.is_empty() {
            builder = builder.query(&params.query);
        }
        if let Some(ref body) = params.json {
            builder = builder.json(body);
        }
        let builder = self.apply_csrf(builder);

        let resp = builder.send().await.map_err(Error::Transport)?;
        self.update_token(resp.headers());

        let status = resp.status();
        if !status.is_success() {
            let body = body_or_reason(resp.text().await);
            debug!(status = status.as_u16(), "request failed");
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp)
    }

    /// `GET` an endpoint.
    pub async fn read(
        &mut self,
        suffix: &str,
        family: ApiFamily,
        params: &RequestParams,
        scope: SiteScope<'_>,
    ) -> Result<reqwest::Response, Error> {
        let url = self.endpoint_url(family, scope, suffix)?;
        self.execute(Method::GET, url, params).await
    }

    /// `POST` to an endpoint.
    pub async fn write(
        &mut self,
        suffix: &str,
        family: ApiFamily,
        params: &RequestParams,
        scope: SiteScope<'_>,
    ) -> Result<reqwest::Response, Error> {
        let url = self.endpoint_url(family, scope, suffix)?;
        self.execute(Method::POST, url, params).await
    }

    /// `PUT` to an endpoint.
    pub async fn update(
        &mut self,
        suffix: &str,
        family: ApiFamily,
        params: &RequestParams,
        scope: SiteScope<'_>,
    ) -> Result<reqwest::Response, Error> {
        let url = self.endpoint_url(family, scope, suffix)?;
        self.execute(Method::PUT, url, params).await
    }

    /// `DELETE` an endpoint.
    pub async fn delete(
        &mut self,
        suffix: &str,
        family: ApiFamily,
        params: &RequestParams,
        scope: SiteScope<'_>,
    ) -> Result<reqwest::Response, Error> {
        let url = self.endpoint_url(family, scope, suffix)?;
        self.execute(Method::DELETE, url, params).await
    }
}

/// Error body text, or why it could not be read.
fn body_or_reason<E: std::fmt::Display>(body: Result<String, E>) -> String {
    body.unwrap_or_else(|e| format!("<unreadable body: {e}>"))
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.config.base_url.as_str())
            .field("site", &self.config.site)
            .field("topology", &self.topology)
            .field("has_token", &self.csrf_token.is_some())
            .field("logged_in", &self.http.is_some())
            .finish_non_exhaustive()
    }
}
