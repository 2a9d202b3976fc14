// Site endpoints
//
// The overview is controller-wide: `v2/api/sites/overview` with no site segment.

use tracing::debug;

use crate::envelope;
use crate::error::Error;
use crate::models::{SiteOverview, SitesOverviewQuery};
use crate::paths::{ApiFamily, SiteScope};
use crate::session::{RequestParams, Session};

impl Session {
    /// One page of the sites overview.
    ///
    /// `POST v2/api/sites/overview` with `{"pageSize", "pageNumber", "searchText"}`
    pub async fn sites_overview(
        &mut self,
        query: &SitesOverviewQuery,
    ) -> Result<Vec<SiteOverview>, Error> {
        debug!(?query, "fetching sites overview");
        let params = RequestParams::json(query)?;
        let resp = self
            .write(
                "sites/overview",
                ApiFamily::V2,
                &params,
                SiteScope::Unscoped,
            )
            .await?;
        envelope::decode_as(resp).await
    }
}
