// Device endpoints

use serde_json::Value;
use tracing::debug;

use crate::envelope::{self, from_payload};
use crate::error::Error;
use crate::models::Device;
use crate::paths::{ApiFamily, SiteScope};
use crate::session::{RequestParams, Session};

impl Session {
    /// List all adopted devices.
    ///
    /// `GET v2/api/site/{site}/device`. Newer controllers group the result by
    /// device class; only `network_devices` is returned in that case.
    pub async fn list_devices(&mut self) -> Result<Vec<Device>, Error> {
        debug!("listing devices");
        let resp = self
            .read(
                "device",
                ApiFamily::V2Site,
                &RequestParams::none(),
                SiteScope::SessionDefault,
            )
            .await?;

        devices_from_payload(envelope::decode(resp).await?)
    }
}

/// A bare device array, or the `network_devices` group of a grouped object.
/// An object without that group holds no network devices.
fn devices_from_payload(payload: Value) -> Result<Vec<Device>, Error> {
    match payload {
        Value::Object(mut grouped) => match grouped.remove("network_devices") {
            Some(devices) => from_payload(devices),
            None => Ok(Vec::new()),
        },
        Value::Null => Ok(Vec::new()),
        other => from_payload(other),
    }
}
