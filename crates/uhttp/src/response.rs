//! Response handling: status gate, body read, JSON decode

use crate::error::{HttpError, HttpResult};
use bytes::Bytes;
use http::StatusCode;
use serde::de::DeserializeOwned;

/// Read the full body of a 200 response.
///
/// Any other status, including the rest of 2xx, is rejected before the body
/// is touched.
pub async fn read_ok_body(response: reqwest::Response) -> HttpResult<Bytes> {
    check_status(response.status())?;
    response.bytes().await.map_err(HttpError::Body)
}

/// Only 200 counts as success
pub fn check_status(status: StatusCode) -> HttpResult<()> {
    if status == StatusCode::OK {
        Ok(())
    } else {
        Err(HttpError::Status {
            status: status.as_u16(),
        })
    }
}

/// Decode a JSON body into `T`
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> HttpResult<T> {
    serde_json::from_slice(body).map_err(HttpError::Json)
}
