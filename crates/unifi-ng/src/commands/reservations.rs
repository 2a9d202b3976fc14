//! DHCP reservation import.
//!
//! Reads records from CSV or a router config, uploads them one by one, and
//! prints `{n_failed, failed}`. Any rejected record makes the command exit 9.

use serde::Serialize;
use tabled::Tabled;
use unifi_ng_api::{BatchFailure, BatchReport, Session};

use crate::cli::{GlobalOpts, ReservationsArgs, ReservationsCommand};
use crate::error::CliError;
use crate::import;
use crate::output;

use super::util;

#[derive(Serialize)]
struct ImportReport<'a> {
    n_failed: usize,
    succeeded: usize,
    failed: &'a [BatchFailure],
}

#[derive(Tabled)]
struct FailureRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Fixed IP")]
    fixed_ip: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Error")]
    error: String,
}

impl From<&BatchFailure> for FailureRow {
    fn from(f: &BatchFailure) -> Self {
        Self {
            index: f.index,
            mac: f.record.mac.clone(),
            fixed_ip: f.record.fixed_ip.clone().unwrap_or_else(|| "-".into()),
            name: f.record.name.clone().unwrap_or_else(|| "-".into()),
            error: f.error.to_string(),
        }
    }
}

fn report_detail(report: &ImportReport<'_>) -> String {
    let summary = format!(
        "{} imported, {} rejected",
        report.succeeded, report.n_failed
    );
    if report.failed.is_empty() {
        return summary;
    }
    let rows: Vec<FailureRow> = report.failed.iter().map(FailureRow::from).collect();
    format!("{}\n{summary}", output::render_table(&rows))
}

fn check(report: &BatchReport) -> Result<(), CliError> {
    if report.is_clean() {
        return Ok(());
    }
    Err(CliError::PartialFailure {
        failed: report.n_failed(),
        total: report.n_failed() + report.succeeded,
    })
}

pub async fn handle(
    session: &mut Session,
    args: ReservationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ReservationsCommand::Import { file, format } => {
            let text = std::fs::read_to_string(&file)?;
            let records = import::read_reservations(&text, format)?;
            if records.is_empty() {
                if !global.quiet {
                    eprintln!("No reservations found in {}", file.display());
                }
                return Ok(());
            }

            let pb = util::spinner(
                &format!("Uploading {} reservations", records.len()),
                global.quiet,
            );
            let report = session.upload_reservations(records).await;
            pb.finish_and_clear();
            let report = report?;

            let view = ImportReport {
                n_failed: report.n_failed(),
                succeeded: report.succeeded,
                failed: &report.failed,
            };
            let out = output::render_single(&global.output, &view, report_detail, |r| {
                r.failed
                    .iter()
                    .map(|f| f.record.mac.clone())
                    .collect::<Vec<_>>()
                    .join("\n")
            });
            output::print_output(&out, global.quiet);

            check(&report)
        }
    }
}
