// Authentication
//
// Cookie-based login/logout and controller topology detection. Login opens a
// fresh transport, probes the marker paths, then posts credentials to the
// topology's auth root. Session state is only committed once login succeeds.

use secrecy::ExposeSecret;
use serde_json::json;
use tracing::{debug, error, warn};
use url::Url;

use crate::error::Error;
use crate::session::Session;
use crate::topology::ControllerTopology;

/// Detect the controller topology by probing the marker paths.
///
/// Each marker is fetched unauthenticated, in [`ControllerTopology::PROBE_ORDER`];
/// the first that answers 200 wins. A transport failure aborts detection.
pub async fn detect_topology(
    http: &reqwest::Client,
    base_url: &Url,
) -> Result<ControllerTopology, Error> {
    for topology in ControllerTopology::PROBE_ORDER {
        let url = base_url.join(topology.marker_path())?;
        debug!("probing {}", url);

        let resp = http.get(url).send().await.map_err(Error::Transport)?;
        if resp.status() == reqwest::StatusCode::OK {
            debug!(?topology, "detected controller topology");
            return Ok(topology);
        }
    }

    Err(Error::UnsupportedController {
        base_url: base_url.to_string(),
    })
}

impl Session {
    /// Authenticate with the stored credentials.
    ///
    /// Re-logging in discards the previous transport, topology, and token and
    /// repeats detection. On failure the session is left logged out.
    pub async fn login(&mut self) -> Result<(), Error> {
        self.release();

        let http = self.transport_config().build_client()?;
        let topology = detect_topology(&http, &self.config.base_url).await?;

        let url = self.config.base_url.join(&topology.login_path())?;
        debug!("logging in at {}", url);

        let body = json!({
            "username": self.config.username,
            "password": self.config.password.expose_secret(),
        });

        let resp = match http.post(url).json(&body).send().await {
            Ok(resp) => resp,
            Err(e) => {
                error!("login request failed: {e}");
                return Err(Error::Transport(e));
            }
        };

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(Error::Authentication {
                status: status.as_u16(),
            });
        }

        self.update_token(resp.headers());
        self.topology = Some(topology);
        self.http = Some(http);

        debug!("login successful");
        Ok(())
    }

    /// End the session and drop the transport.
    ///
    /// A session that never logged in has nothing to release and returns
    /// `Ok`. The local state is cleared even when the logout request fails.
    pub async fn logout(&mut self) -> Result<(), Error> {
        let (Some(http), Some(topology)) = (self.http.as_ref(), self.topology) else {
            self.release();
            return Ok(());
        };

        let result = match self.config.base_url.join(&topology.logout_path()) {
            Ok(url) => {
                debug!("logging out at {}", url);
                self.apply_csrf(http.post(url))
                    .send()
                    .await
                    .map_err(Error::Transport)
            }
            Err(e) => Err(Error::InvalidUrl(e)),
        };

        self.release();

        let resp = result?;
        if !resp.status().is_success() {
            warn!(status = resp.status().as_u16(), "logout was not acknowledged");
        }

        debug!("logout complete");
        Ok(())
    }

    /// Clear the transport, topology, and token together.
    fn release(&mut self) {
        self.http = None;
        self.topology = None;
        self.csrf_token = None;
    }
}
