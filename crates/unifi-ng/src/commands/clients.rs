//! Client command handlers.

use tabled::Tabled;
use unifi_ng_api::{ClientEntry, ClientHistoryQuery, Session};

use crate::cli::{ClientsArgs, ClientsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Fixed IP")]
    fixed_ip: String,
    #[tabled(rename = "Type")]
    kind: String,
}

impl From<&ClientEntry> for ClientRow {
    fn from(c: &ClientEntry) -> Self {
        Self {
            name: c.label().to_owned(),
            mac: c.mac.clone().unwrap_or_default(),
            ip: c.ip.clone().unwrap_or_else(|| "-".into()),
            fixed_ip: c.fixed_ip.clone().unwrap_or_else(|| "-".into()),
            kind: c.client_type.clone().unwrap_or_else(|| "-".into()),
        }
    }
}

pub async fn handle(
    session: &mut Session,
    args: ClientsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let clients = match args.command {
        ClientsCommand::Active => session.list_active_clients().await?,
        ClientsCommand::History {
            include_blocked,
            exclude_unifi_devices,
            within_hours,
        } => {
            let query = ClientHistoryQuery {
                only_non_blocked: !include_blocked,
                include_unifi_devices: !exclude_unifi_devices,
                within_hours,
            };
            session.client_history(query).await?
        }
    };

    let out = output::render_list(&global.output, &clients, |c| ClientRow::from(c), |c| {
        c.mac.clone().unwrap_or_default()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
