use tracing::{debug, info};

use super::http::HttpClient;
use crate::core::accepts_byte_ranges;
use crate::data::Resource;
use crate::error::{Error, ResponseError, Result};

/// Establish the size and range capability of `url` with one `HEAD` request.
///
/// This is the gate for sharded fetching: nothing else is requested unless
/// the resource reports a positive length and advertises `bytes` ranges.
///
/// # Errors
///
/// - [`Error::ProbeFailure`] if the request fails or answers with a non-2xx status
/// - [`Error::SizeUnknown`] if no positive `Content-Length` is reported
/// - [`Error::RangeUnsupported`] if `Accept-Ranges` is absent or lacks `bytes`
pub async fn probe<C: HttpClient>(
    client: &C,
    url: &str,
    headers: &[(String, String)],
) -> Result<Resource> {
    debug!(url, "probing");

    let response = client
        .head(url, headers)
        .await
        .map_err(|e| Error::ProbeFailure {
            url: url.to_string(),
            source: Box::new(e),
        })?;

    if !(200..300).contains(&response.status) {
        return Err(Error::ProbeFailure {
            url: url.to_string(),
            source: Box::new(ResponseError::ProbeStatus {
                status: response.status,
            }),
        });
    }

    let length = match response.content_length {
        Some(length) if length > 0 => length,
        _ => {
            return Err(Error::SizeUnknown {
                url: url.to_string(),
            });
        }
    };

    if !accepts_byte_ranges(response.accept_ranges.as_deref()) {
        return Err(Error::RangeUnsupported {
            url: url.to_string(),
            advertised: response.accept_ranges,
        });
    }

    info!(url, length, "resource supports byte ranges");
    Ok(Resource::new(url, length))
}
