//! Site command handlers.

use tabled::Tabled;
use unifi_ng_api::{Session, SiteOverview, SitesOverviewQuery};

use crate::cli::{GlobalOpts, SitesArgs, SitesCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&SiteOverview> for SiteRow {
    fn from(s: &SiteOverview) -> Self {
        Self {
            id: s.id.clone().unwrap_or_default(),
            name: s.name.clone().unwrap_or_default(),
            description: s.description.clone().unwrap_or_default(),
        }
    }
}

pub async fn handle(
    session: &mut Session,
    args: SitesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SitesCommand::Overview {
            page_size,
            page_number,
            search,
        } => {
            let query = SitesOverviewQuery {
                page_size,
                page_number,
                search_text: search,
            };
            let sites = session.sites_overview(&query).await?;
            let out = output::render_list(&global.output, &sites, |s| SiteRow::from(s), |s| {
                s.name.clone().unwrap_or_default()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
