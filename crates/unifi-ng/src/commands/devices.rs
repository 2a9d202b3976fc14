//! Device command handlers.

use tabled::Tabled;
use unifi_ng_api::{Device, Session};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "State")]
    state: String,
}

fn dash(value: Option<&String>) -> String {
    value.cloned().unwrap_or_else(|| "-".into())
}

pub async fn handle(
    session: &mut Session,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => {
            let devices = session.list_devices().await?;
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &devices,
                |d: &Device| DeviceRow {
                    name: dash(d.name.as_ref()),
                    mac: dash(d.mac.as_ref()),
                    ip: dash(d.ip.as_ref()),
                    model: dash(d.model.as_ref()),
                    version: dash(d.version.as_ref()),
                    state: output::device_state(d.state, color),
                },
                |d| d.mac.clone().unwrap_or_default(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
