//! Network member group command handlers.

use serde::Serialize;
use tabled::Tabled;
use tracing::info;
use unifi_ng_api::{NetworkMembersGroup, Session};

use crate::cli::{GlobalOpts, GroupsArgs, GroupsCommand};
use crate::error::CliError;
use crate::output;
use crate::sync;

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    group_type: String,
    #[tabled(rename = "Members")]
    members: usize,
}

impl From<&NetworkMembersGroup> for GroupRow {
    fn from(g: &NetworkMembersGroup) -> Self {
        Self {
            id: g.id.clone().unwrap_or_default(),
            name: g.name.clone(),
            group_type: g.group_type.clone(),
            members: g.members.len(),
        }
    }
}

/// One line of the `groups sync` summary.
#[derive(Serialize, Tabled)]
struct SyncedGroup {
    #[tabled(rename = "Group")]
    name: String,
    #[tabled(rename = "Created")]
    created: bool,
    #[tabled(rename = "Members")]
    members: usize,
}

pub async fn handle(
    session: &mut Session,
    args: GroupsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        GroupsCommand::List => {
            let groups = session.list_network_members_groups().await?;
            let out = output::render_list(
                &global.output,
                &groups,
                |g| GroupRow::from(g),
                |g| g.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GroupsCommand::Add {
            name,
            members,
            group_type,
        } => {
            let group = NetworkMembersGroup {
                id: None,
                name,
                members,
                group_type,
            };
            session.add_network_members_group(&group).await?;
            if !global.quiet {
                eprintln!("Group '{}' created", group.name);
            }
            Ok(())
        }

        GroupsCommand::Sync { file } => {
            let wanted = sync::memberships_from_csv(std::fs::File::open(&file)?)?;

            let existing = session.list_network_members_groups().await?;
            let missing = sync::missing_groups(&wanted, &existing);
            for name in &missing {
                let members = wanted.get(name).cloned().unwrap_or_default();
                info!(group = %name, "creating missing group");
                session
                    .add_network_members_group(&NetworkMembersGroup::new(name.clone(), members))
                    .await?;
            }

            // Re-list so freshly created groups have ids.
            let existing = session.list_network_members_groups().await?;
            let mut summary = Vec::new();
            for (id, group) in sync::membership_updates(&wanted, &existing)? {
                session.update_network_members_group(&id, &group).await?;
                summary.push(SyncedGroup {
                    created: missing.contains(&group.name),
                    members: group.members.len(),
                    name: group.name,
                });
            }

            let out = output::render_list(
                &global.output,
                &summary,
                |s| SyncedGroup {
                    name: s.name.clone(),
                    created: s.created,
                    members: s.members,
                },
                |s| s.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
