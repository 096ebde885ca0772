use crate::data::ByteRange;
use crate::error::ResponseError;

/// Parse a `Content-Length` header value.
pub fn parse_content_length(value: Option<&str>) -> Option<u64> {
    value.and_then(|v| v.trim().parse::<u64>().ok())
}

/// Whether an `Accept-Ranges` header value advertises the `bytes` unit.
///
/// The value is a comma-separated list of range units; `none` or any list
/// without `bytes` means byte ranges are unsupported.
pub fn accepts_byte_ranges(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        v.split(',')
            .map(str::trim)
            .any(|unit| unit.eq_ignore_ascii_case("bytes"))
    })
}

/// Format the inclusive `Range` header for a half-open range.
///
/// Returns `None` for an empty range, which cannot be expressed on the wire.
pub fn range_header(range: ByteRange) -> Option<String> {
    range
        .last()
        .map(|last| format!("bytes={}-{}", range.start, last))
}

/// Whether a caller-supplied header would clash with the `Range` header the
/// downloader sets itself. Such headers are never sent.
pub fn is_reserved_header(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case("range")
}

/// Check the status of a range response.
///
/// `206 Partial Content` is always accepted. `200 OK` is accepted only when
/// the range spans the whole resource, since the body is then identical.
pub fn check_range_status(
    status: u16,
    range: ByteRange,
    resource_length: u64,
) -> Result<(), ResponseError> {
    match status {
        206 => Ok(()),
        200 if range.start == 0 && range.end == resource_length => Ok(()),
        _ => Err(ResponseError::UnexpectedStatus { status, range }),
    }
}
