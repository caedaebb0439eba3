use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use thiserror::Error;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Body stream handed out by [`HttpClient::get`].
pub type Body = BoxStream<'static, std::result::Result<Bytes, TransportError>>;

/// Transport-level failure, classified for availability reporting.
///
/// Only conditions below the HTTP layer land here; response status codes
/// are carried in the replies and left to the caller to interpret.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("request timed out")]
    TimedOut,

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("request failed: {0}")]
    Other(String),
}

/// Status and declared length of a HEAD response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadReply {
    pub status: u16,
    /// Parsed Content-Length, `None` when absent or unparseable.
    pub content_length: Option<u64>,
}

/// An open GET response: declared length plus the body stream.
///
/// Dropping the reply without polling `body` abandons the transfer
/// without reading any body bytes.
pub struct GetReply {
    pub content_length: Option<u64>,
    pub body: Body,
}

/// Asynchronous HTTP client abstraction.
///
/// This trait provides the minimal interface needed for probing and
/// fetching. Implementations handle their own redirect following and
/// error mapping.
///
/// # Implementations
///
/// - [`ReqwestClient`]: production implementation using `reqwest`
/// - [`MockClient`](crate::mock::MockClient): scriptable in-memory
///   implementation for tests
pub trait HttpClient: Send + Sync {
    /// Issue a HEAD request, giving up after `timeout`.
    fn head(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = std::result::Result<HeadReply, TransportError>> + Send;

    /// Issue a GET request and return the response body as a stream.
    ///
    /// No timeout is applied; large transfers run for as long as the
    /// server keeps sending.
    fn get(
        &self,
        url: &str,
    ) -> impl Future<Output = std::result::Result<GetReply, TransportError>> + Send;
}

/// Production HTTP client implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Create a client with default configuration.
    pub fn new() -> std::result::Result<Self, TransportError> {
        let client = reqwest::Client::builder().build().map_err(classify)?;
        Ok(Self { client })
    }
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::TimedOut
    } else if e.is_connect() {
        TransportError::ConnectionFailed(e.to_string())
    } else {
        TransportError::Other(e.to_string())
    }
}

fn content_length_of(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
}

impl HttpClient for ReqwestClient {
    async fn head(
        &self,
        url: &str,
        timeout: Duration,
    ) -> std::result::Result<HeadReply, TransportError> {
        let response = self
            .client
            .head(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify)?;

        Ok(HeadReply {
            status: response.status().as_u16(),
            content_length: content_length_of(&response),
        })
    }

    async fn get(&self, url: &str) -> std::result::Result<GetReply, TransportError> {
        let response = self.client.get(url).send().await.map_err(classify)?;
        let content_length = content_length_of(&response);
        let body = response.bytes_stream().map(|result| result.map_err(classify));

        Ok(GetReply {
            content_length,
            body: Box::pin(body),
        })
    }
}
