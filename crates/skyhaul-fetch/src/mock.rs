//! Scriptable in-memory [`HttpClient`] for tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bytes::Bytes;
use futures_util::{StreamExt, stream};

use crate::http::{GetReply, HeadReply, HttpClient, TransportError};

/// Scripted response for a single URL.
#[derive(Debug, Clone)]
pub struct MockResponse {
    status: u16,
    chunks: Vec<Bytes>,
    declared_length: Option<u64>,
    interrupt_after: Option<usize>,
    fail: Option<TransportError>,
}

impl MockResponse {
    /// Successful response whose body is served as the given chunks.
    ///
    /// Content-Length defaults to the total body size.
    pub fn ok(chunks: &[&[u8]]) -> Self {
        let chunks: Vec<Bytes> = chunks.iter().map(|c| Bytes::copy_from_slice(c)).collect();
        let total = chunks.iter().map(|c| c.len() as u64).sum();
        Self {
            status: 200,
            chunks,
            declared_length: Some(total),
            interrupt_after: None,
            fail: None,
        }
    }

    /// Bodyless response with the given status code.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            chunks: Vec::new(),
            declared_length: None,
            interrupt_after: None,
            fail: None,
        }
    }

    /// Request-level transport failure, for both HEAD and GET.
    pub fn fail(error: TransportError) -> Self {
        Self {
            status: 0,
            chunks: Vec::new(),
            declared_length: None,
            interrupt_after: None,
            fail: Some(error),
        }
    }

    /// Override the declared Content-Length.
    #[must_use]
    pub fn content_length(mut self, length: u64) -> Self {
        self.declared_length = Some(length);
        self
    }

    /// Omit Content-Length from the response.
    #[must_use]
    pub fn unknown_length(mut self) -> Self {
        self.declared_length = None;
        self
    }

    /// Serve this many body chunks, then fail mid-stream.
    #[must_use]
    pub fn interrupt_after(mut self, chunks: usize) -> Self {
        self.interrupt_after = Some(chunks);
        self
    }
}

/// In-memory HTTP client scripted per URL.
///
/// Unrouted URLs behave like an unreachable host. Clones share the
/// served-chunk counter, so a clone can be handed to the code under
/// test while the test keeps its own handle for assertions.
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    routes: HashMap<String, MockResponse>,
    chunks_served: Arc<AtomicUsize>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the response for `url`.
    #[must_use]
    pub fn route(mut self, url: &str, response: MockResponse) -> Self {
        self.routes.insert(url.to_string(), response);
        self
    }

    /// Number of body chunks handed out across all GET streams.
    pub fn chunks_served(&self) -> usize {
        self.chunks_served.load(Ordering::SeqCst)
    }

    fn lookup(&self, url: &str) -> std::result::Result<&MockResponse, TransportError> {
        self.routes
            .get(url)
            .ok_or_else(|| TransportError::ConnectionFailed(format!("no route to {url}")))
    }
}

impl HttpClient for MockClient {
    async fn head(
        &self,
        url: &str,
        _timeout: Duration,
    ) -> std::result::Result<HeadReply, TransportError> {
        let response = self.lookup(url)?;
        if let Some(error) = &response.fail {
            return Err(error.clone());
        }

        Ok(HeadReply {
            status: response.status,
            content_length: response.declared_length,
        })
    }

    async fn get(&self, url: &str) -> std::result::Result<GetReply, TransportError> {
        let response = self.lookup(url)?;
        if let Some(error) = &response.fail {
            return Err(error.clone());
        }

        let mut items: Vec<std::result::Result<Bytes, TransportError>> = match response
            .interrupt_after
        {
            Some(n) => response.chunks.iter().take(n).cloned().map(Ok).collect(),
            None => response.chunks.iter().cloned().map(Ok).collect(),
        };
        if response.interrupt_after.is_some() {
            items.push(Err(TransportError::Other("connection reset".to_string())));
        }

        let counter = Arc::clone(&self.chunks_served);
        let body = stream::iter(items).inspect(move |item| {
            if item.is_ok() {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        Ok(GetReply {
            content_length: response.declared_length,
            body: Box::pin(body),
        })
    }
}
