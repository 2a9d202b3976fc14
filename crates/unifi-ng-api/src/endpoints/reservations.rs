// DHCP reservation endpoints (rest/user)

use serde_json::Value;
use tracing::debug;

use crate::envelope;
use crate::error::Error;
use crate::models::DhcpReservation;
use crate::paths::{ApiFamily, SiteScope};
use crate::session::{RequestParams, Session};

impl Session {
    /// Create a user record carrying a fixed IP and/or local DNS name.
    ///
    /// `POST api/s/{site}/rest/user`. The controller answers 400 when the MAC
    /// already has a record or the IP is outside every configured subnet.
    /// Returns the created user records as the controller sent them.
    pub async fn add_dhcp_reservation(
        &mut self,
        reservation: &DhcpReservation,
    ) -> Result<Value, Error> {
        debug!(mac = %reservation.mac, "adding DHCP reservation");
        let params = RequestParams::json(reservation)?;
        let resp = self
            .write(
                "rest/user",
                ApiFamily::V1Site,
                &params,
                SiteScope::SessionDefault,
            )
            .await?;
        envelope::decode(resp).await
    }
}
