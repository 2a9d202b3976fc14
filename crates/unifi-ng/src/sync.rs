//! Group membership sync: CSV of `mac, group_name` → controller groups.
//!
//! Two passes: create the groups the controller lacks, then re-list and set
//! each named group's members to exactly the MACs the CSV assigns it.

use std::collections::BTreeMap;
use std::io::Read;

use serde::Deserialize;
use unifi_ng_api::NetworkMembersGroup;

use crate::error::CliError;

/// Group name → member MACs, in CSV order.
pub type Memberships = BTreeMap<String, Vec<String>>;

#[derive(Debug, Deserialize)]
struct MembershipRow {
    #[serde(default)]
    mac: Option<String>,
    #[serde(default)]
    group_name: Option<String>,
}

/// Read `mac, group_name` rows; rows missing either value are skipped.
pub fn memberships_from_csv<R: Read>(reader: R) -> Result<Memberships, CliError> {
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut groups = Memberships::new();
    for row in csv.deserialize::<MembershipRow>() {
        let row = row?;
        match (row.mac, row.group_name) {
            (Some(mac), Some(group)) if !mac.is_empty() && !group.is_empty() => {
                let members = groups.entry(group).or_default();
                if !members.contains(&mac) {
                    members.push(mac);
                }
            }
            _ => tracing::debug!("skipping incomplete membership row"),
        }
    }
    Ok(groups)
}

/// Names in `wanted` that no existing group carries.
pub fn missing_groups(wanted: &Memberships, existing: &[NetworkMembersGroup]) -> Vec<String> {
    wanted
        .keys()
        .filter(|name| !existing.iter().any(|g| &g.name == *name))
        .cloned()
        .collect()
}

/// `(group_id, replacement)` for every wanted group. The existing group's
/// type is kept. Fails if a wanted group is still absent or has no id.
pub fn membership_updates(
    wanted: &Memberships,
    existing: &[NetworkMembersGroup],
) -> Result<Vec<(String, NetworkMembersGroup)>, CliError> {
    wanted
        .iter()
        .map(|(name, members)| {
            let Some((id, group)) = existing
                .iter()
                .find(|g| &g.name == name)
                .and_then(|g| g.id.as_ref().map(|id| (id, g)))
            else {
                return Err(CliError::NotFound {
                    resource_type: "group".into(),
                    identifier: name.clone(),
                    list_command: "groups list".into(),
                });
            };

            Ok((
                id.clone(),
                NetworkMembersGroup {
                    id: Some(id.clone()),
                    name: name.clone(),
                    members: members.clone(),
                    group_type: group.group_type.clone(),
                },
            ))
        })
        .collect()
}
