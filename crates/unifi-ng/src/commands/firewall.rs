//! Firewall policy command handlers.

use tabled::Tabled;
use tracing::info;
use unifi_ng_api::{FirewallPolicy, Session};

use crate::cli::{FirewallArgs, FirewallCommand, GlobalOpts, PolicyTarget};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Policy table row ────────────────────────────────────────────────

#[derive(Tabled)]
struct PolicyRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Src IPs")]
    src_ips: usize,
}

impl From<&FirewallPolicy> for PolicyRow {
    fn from(p: &FirewallPolicy) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone().unwrap_or_default(),
            description: p.description.clone().unwrap_or_default(),
            action: p.action.clone().unwrap_or_else(|| "-".into()),
            enabled: match p.enabled {
                Some(true) => "yes",
                Some(false) => "no",
                None => "-",
            }
            .into(),
            src_ips: p.source.ips.as_ref().map_or(0, Vec::len),
        }
    }
}

fn join_or_dash(values: Option<&Vec<String>>) -> String {
    match values {
        Some(v) if !v.is_empty() => v.join(", "),
        _ => "-".into(),
    }
}

fn policy_detail(p: &FirewallPolicy) -> String {
    [
        format!("ID:          {}", p.id),
        format!("Name:        {}", p.name.as_deref().unwrap_or("-")),
        format!("Description: {}", p.description.as_deref().unwrap_or("-")),
        format!("Enabled:     {}", p.enabled.map_or("-".into(), |e| e.to_string())),
        format!("Action:      {}", p.action.as_deref().unwrap_or("-")),
        format!("Src IPs:     {}", join_or_dash(p.source.ips.as_ref())),
        format!("Dst IPs:     {}", join_or_dash(p.destination.ips.as_ref())),
        format!("Dst Domains: {}", join_or_dash(p.destination.web_domains.as_ref())),
    ]
    .join("\n")
}

/// The single policy whose description equals `description`.
fn find_by_description(
    policies: Vec<FirewallPolicy>,
    description: &str,
) -> Result<FirewallPolicy, CliError> {
    let mut matches: Vec<FirewallPolicy> = policies
        .into_iter()
        .filter(|p| p.description.as_deref() == Some(description))
        .collect();

    match matches.len() {
        0 => Err(CliError::NotFound {
            resource_type: "firewall policy with description".into(),
            identifier: description.into(),
            list_command: "firewall list".into(),
        }),
        1 => Ok(matches.remove(0)),
        n => Err(CliError::Validation {
            field: "description".into(),
            reason: format!("{n} policies are described as '{description}'; use firewall update"),
        }),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &mut Session,
    args: FirewallArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        FirewallCommand::List => {
            let policies = session.list_firewall_policies().await?;
            let out = output::render_list(
                &global.output,
                &policies,
                |p| PolicyRow::from(p),
                |p| p.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FirewallCommand::Get { id } => {
            let policy = session.get_firewall_policy(&id).await?;
            let out = output::render_single(&global.output, &policy, policy_detail, |p| {
                p.id.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FirewallCommand::Update { id, from_file } => {
            let policy: FirewallPolicy = util::read_json_file(&from_file)?;
            if !util::confirm(&format!("Replace firewall policy {id}?"), global.yes)? {
                return Ok(());
            }
            let resp = session.update_firewall_policy(&id, &policy).await?;
            let out = output::render_single(
                &global.output,
                &resp,
                |v| output::render_json_pretty(v),
                |_| id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FirewallCommand::SetIps {
            description,
            hostname,
            target,
        } => {
            let ips = util::resolve_ipv4(&hostname).await?;
            info!(%hostname, ?ips, "resolved allow-list addresses");

            let mut policy =
                find_by_description(session.list_firewall_policies().await?, &description)?;
            let listed = ips.join(", ");
            let (label, side) = match target {
                PolicyTarget::Source => ("source", &mut policy.source),
                PolicyTarget::Destination => ("destination", &mut policy.destination),
            };
            side.ips = Some(ips);

            let prompt = format!("Set {label} IPs of policy {} to {listed}?", policy.id);
            if !util::confirm(&prompt, global.yes)? {
                return Ok(());
            }

            let id = policy.id.clone();
            session.update_firewall_policy(&id, &policy).await?;
            let out = output::render_single(&global.output, &policy, policy_detail, |p| {
                p.id.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
