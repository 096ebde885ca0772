use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

use crate::data::ByteRange;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Metadata returned by a probe (`HEAD`) request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    /// Parsed `Content-Length`, if present and numeric.
    pub content_length: Option<u64>,
    /// Raw `Accept-Ranges` value, if present.
    pub accept_ranges: Option<String>,
}

/// Status and streaming body of a range request.
pub struct RangeResponse<E> {
    pub status: u16,
    pub body: BoxStream<'static, std::result::Result<Bytes, E>>,
}

/// Asynchronous HTTP client abstraction.
///
/// This trait provides the minimal interface sharded fetching needs: one
/// metadata request and any number of range-bounded reads.
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest`
/// - In-memory implementations for testing
pub trait HttpClient: Send + Sync {
    /// Transport error type, carried unmodified as a failure's source.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Issue a metadata-only request against `url`.
    fn head(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> impl Future<Output = std::result::Result<ProbeResponse, Self::Error>> + Send;

    /// Request exactly the bytes of `range` from `url`.
    ///
    /// `range` is half-open; implementations translate it to the inclusive
    /// `Range: bytes=start-last` header.
    fn get_range(
        &self,
        url: &str,
        range: ByteRange,
        headers: &[(String, String)],
    ) -> impl Future<Output = std::result::Result<RangeResponse<Self::Error>, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use std::time::Duration;

    use reqwest::header::{ACCEPT_RANGES, CONTENT_LENGTH, HeaderName, RANGE};

    use super::*;
    use crate::core::{is_reserved_header, parse_content_length, range_header};

    const USER_AGENT: &str = concat!("shardget/", env!("CARGO_PKG_VERSION"));

    /// Production HTTP client implementation using reqwest.
    #[derive(Debug, Clone)]
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        /// Create a new ReqwestClient with default configuration.
        pub fn new() -> Result<Self, reqwest::Error> {
            Self::builder().build().map(Self::from_client)
        }

        /// Create a client whose connection attempts give up after `timeout`.
        pub fn with_connect_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
            Self::builder()
                .connect_timeout(timeout)
                .build()
                .map(Self::from_client)
        }

        /// Wrap an already configured reqwest client.
        pub fn from_client(client: reqwest::Client) -> Self {
            Self { client }
        }

        fn builder() -> reqwest::ClientBuilder {
            reqwest::Client::builder().user_agent(USER_AGENT)
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn head(
            &self,
            url: &str,
            headers: &[(String, String)],
        ) -> std::result::Result<ProbeResponse, Self::Error> {
            let mut request = self.client.head(url);
            for (key, value) in headers.iter().filter(|(key, _)| !is_reserved_header(key)) {
                request = request.header(key, value);
            }

            let response = request.send().await?;
            let header = |name: HeaderName| {
                response
                    .headers()
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned)
            };

            // `Response::content_length` reflects the (empty) HEAD body, not the header.
            Ok(ProbeResponse {
                status: response.status().as_u16(),
                content_length: parse_content_length(header(CONTENT_LENGTH).as_deref()),
                accept_ranges: header(ACCEPT_RANGES),
            })
        }

        async fn get_range(
            &self,
            url: &str,
            range: ByteRange,
            headers: &[(String, String)],
        ) -> std::result::Result<RangeResponse<Self::Error>, Self::Error> {
            let mut request = self.client.get(url);
            for (key, value) in headers.iter().filter(|(key, _)| !is_reserved_header(key)) {
                request = request.header(key, value);
            }
            if let Some(value) = range_header(range) {
                request = request.header(RANGE, value);
            }

            let response = request.send().await?;
            Ok(RangeResponse {
                status: response.status().as_u16(),
                body: Box::pin(response.bytes_stream()),
            })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
