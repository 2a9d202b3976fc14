// Network member group endpoints

use tracing::debug;

use crate::envelope;
use crate::error::Error;
use crate::models::NetworkMembersGroup;
use crate::paths::{ApiFamily, SiteScope};
use crate::session::{RequestParams, Session};

impl Session {
    /// List all network member groups.
    ///
    /// `GET v2/api/site/{site}/network-members-groups`
    pub async fn list_network_members_groups(
        &mut self,
    ) -> Result<Vec<NetworkMembersGroup>, Error> {
        debug!("listing network member groups");
        let resp = self
            .read(
                "network-members-groups",
                ApiFamily::V2Site,
                &RequestParams::none(),
                SiteScope::SessionDefault,
            )
            .await?;
        envelope::decode_as(resp).await
    }

    /// Create a group.
    ///
    /// `POST v2/api/site/{site}/network-members-group` with
    /// `{"name", "members", "type"}`. Any `id` on `group` is dropped.
    pub async fn add_network_members_group(
        &mut self,
        group: &NetworkMembersGroup,
    ) -> Result<(), Error> {
        debug!(name = %group.name, members = group.members.len(), "adding member group");
        let body = NetworkMembersGroup {
            id: None,
            ..group.clone()
        };
        self.post_group(&body).await
    }

    /// Replace a group's name, members, and type.
    ///
    /// Same endpoint as creation; the controller matches on the `id` in the body.
    pub async fn update_network_members_group(
        &mut self,
        group_id: &str,
        group: &NetworkMembersGroup,
    ) -> Result<(), Error> {
        debug!(group_id, name = %group.name, "updating member group");
        let body = NetworkMembersGroup {
            id: Some(group_id.to_owned()),
            ..group.clone()
        };
        self.post_group(&body).await
    }

    async fn post_group(&mut self, body: &NetworkMembersGroup) -> Result<(), Error> {
        let params = RequestParams::json(body)?;
        let resp = self
            .write(
                "network-members-group",
                ApiFamily::V2Site,
                &params,
                SiteScope::SessionDefault,
            )
            .await?;
        envelope::decode(resp).await?;
        Ok(())
    }
}
