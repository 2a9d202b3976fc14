// Response envelope decoding
//
// Read/write endpoints wrap their payload as `{ meta: { rc, msg }, data }`.
// v2 endpoints often return bare JSON instead; both shapes pass through
// `decode`, which only fails when the envelope says so.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Error;

/// Metadata from the envelope. Only an `rc` other than `"ok"` is a failure.
#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub rc: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
}

/// UniFi OS sometimes answers `{"error":{"code":N,"message":"..."}}` with HTTP 200.
#[derive(Deserialize)]
struct UnifiOsError {
    code: u16,
    message: Option<String>,
}

/// Decode an already-read response body.
///
/// Returns `data` when present, else the whole parsed body. An empty body
/// decodes to `Value::Null`.
pub fn decode_body(body: &str) -> Result<Value, Error> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    let mut value: Value = serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })?;

    if let Some(err) = value
        .get("error")
        .and_then(|e| UnifiOsError::deserialize(e).ok())
    {
        let msg = err.message.unwrap_or_default();
        return Err(Error::Api {
            message: format!("UniFi OS error {}: {msg}", err.code),
        });
    }

    if let Some(meta) = value.get("meta") {
        let meta = Meta::deserialize(meta).map_err(|e| Error::Deserialization {
            message: format!("malformed meta: {e}"),
            body: body.to_owned(),
        })?;
        if let Some(rc) = meta.rc.filter(|rc| rc != "ok") {
            return Err(Error::Api {
                message: meta.msg.unwrap_or_else(|| format!("rc={rc}")),
            });
        }
    }

    match value.get_mut("data") {
        Some(data) => Ok(data.take()),
        None => Ok(value),
    }
}

/// Read the body of a successful response and unwrap the envelope.
pub async fn decode(resp: reqwest::Response) -> Result<Value, Error> {
    let body = resp.text().await.map_err(Error::Transport)?;
    decode_body(&body)
}

/// Like [`decode`], then deserialize the payload into `T`.
pub async fn decode_as<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let payload = decode(resp).await?;
    from_payload(payload)
}

pub(crate) fn from_payload<T: DeserializeOwned>(payload: Value) -> Result<T, Error> {
    serde_json::from_value(payload.clone()).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: payload.to_string(),
    })
}
