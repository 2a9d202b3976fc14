// Client (station) endpoints

use tracing::debug;

use crate::envelope;
use crate::error::Error;
use crate::models::{ClientEntry, ClientHistoryQuery};
use crate::paths::{ApiFamily, SiteScope};
use crate::session::{RequestParams, Session};

impl Session {
    /// List currently connected clients.
    ///
    /// `GET v2/api/site/{site}/clients/active`
    pub async fn list_active_clients(&mut self) -> Result<Vec<ClientEntry>, Error> {
        debug!("listing active clients");
        let resp = self
            .read(
                "clients/active",
                ApiFamily::V2Site,
                &RequestParams::none(),
                SiteScope::SessionDefault,
            )
            .await?;
        envelope::decode_as(resp).await
    }

    /// List clients seen in the past, including offline ones.
    ///
    /// `GET v2/api/site/{site}/clients/history?onlyNonBlocked=..&includeUnifiDevices=..&withinHours=..`
    pub async fn client_history(
        &mut self,
        query: ClientHistoryQuery,
    ) -> Result<Vec<ClientEntry>, Error> {
        debug!(?query, "listing client history");
        let params = RequestParams::query(query.to_pairs());
        let resp = self
            .read(
                "clients/history",
                ApiFamily::V2Site,
                &params,
                SiteScope::SessionDefault,
            )
            .await?;
        envelope::decode_as(resp).await
    }
}
