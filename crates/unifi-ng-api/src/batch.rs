// Batch upload
//
// Sequential fold over `add_dhcp_reservation`. Per-record HTTP and API
// failures are recorded and skipped; anything else (transport, not logged
// in) aborts the batch.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Error;
use crate::models::DhcpReservation;
use crate::session::Session;

/// One record the controller rejected.
#[derive(Debug, Serialize)]
pub struct BatchFailure {
    /// Position in the input.
    pub index: usize,
    pub record: DhcpReservation,
    #[serde(serialize_with = "display")]
    pub error: Error,
}

fn display<S: serde::Serializer>(error: &Error, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(error)
}

/// Outcome of a batch; failures are in input order.
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn n_failed(&self) -> usize {
        self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

impl Session {
    /// Add each reservation in turn, continuing past rejected records.
    pub async fn upload_reservations<I>(&mut self, records: I) -> Result<BatchReport, Error>
    where
        I: IntoIterator<Item = DhcpReservation>,
    {
        let mut report = BatchReport::default();

        for (index, record) in records.into_iter().enumerate() {
            match self.add_dhcp_reservation(&record).await {
                Ok(_) => report.succeeded += 1,
                Err(e) if e.is_recoverable() => {
                    warn!(index, mac = %record.mac, "reservation rejected: {e}");
                    report.failed.push(BatchFailure {
                        index,
                        record,
                        error: e,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        debug!(
            succeeded = report.succeeded,
            failed = report.n_failed(),
            "batch upload finished"
        );
        Ok(report)
    }
}
