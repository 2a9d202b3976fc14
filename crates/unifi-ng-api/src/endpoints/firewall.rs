// Firewall policy endpoints
//
// Policies are read and written whole: fetch, edit, PUT back to
// `firewall-policies/{id}`.

use serde_json::Value;
use tracing::debug;

use crate::envelope;
use crate::error::Error;
use crate::models::FirewallPolicy;
use crate::paths::{ApiFamily, SiteScope};
use crate::session::{RequestParams, Session};

/// `firewall-policies` or `firewall-policies/{id}`.
pub fn firewall_policies_path(id: Option<&str>) -> String {
    match id {
        Some(id) if !id.is_empty() => format!("firewall-policies/{id}"),
        _ => "firewall-policies".to_owned(),
    }
}

impl Session {
    /// List all firewall policies of the site.
    ///
    /// `GET v2/api/site/{site}/firewall-policies`
    pub async fn list_firewall_policies(&mut self) -> Result<Vec<FirewallPolicy>, Error> {
        debug!("listing firewall policies");
        let resp = self
            .read(
                &firewall_policies_path(None),
                ApiFamily::V2Site,
                &RequestParams::none(),
                SiteScope::SessionDefault,
            )
            .await?;
        envelope::decode_as(resp).await
    }

    /// Fetch one firewall policy.
    ///
    /// `GET v2/api/site/{site}/firewall-policies/{id}`
    pub async fn get_firewall_policy(&mut self, id: &str) -> Result<FirewallPolicy, Error> {
        debug!(id, "fetching firewall policy");
        let resp = self
            .read(
                &firewall_policies_path(Some(id)),
                ApiFamily::V2Site,
                &RequestParams::none(),
                SiteScope::SessionDefault,
            )
            .await?;
        envelope::decode_as(resp).await
    }

    /// Replace a firewall policy.
    ///
    /// `PUT v2/api/site/{site}/firewall-policies/{id}` with the full policy body.
    /// Returns the decoded controller response.
    pub async fn update_firewall_policy(
        &mut self,
        id: &str,
        policy: &FirewallPolicy,
    ) -> Result<Value, Error> {
        debug!(id, "updating firewall policy");
        let params = RequestParams::json(policy)?;
        let resp = self
            .update(
                &firewall_policies_path(Some(id)),
                ApiFamily::V2Site,
                &params,
                SiteScope::SessionDefault,
            )
            .await?;
        envelope::decode(resp).await
    }
}
