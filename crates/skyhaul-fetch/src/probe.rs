//! Availability probing via HEAD requests.
//!
//! A probe asks whether a URL is worth downloading without pulling any
//! body bytes. Every transport or protocol condition is folded into a
//! [`ProbeOutcome`]; probing never returns an error.

use std::fmt;
use std::time::Duration;

use crate::http::{HttpClient, TransportError};

/// Timeout applied to each availability probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Classified result of probing one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Server answered 200. `size` is the declared Content-Length when
    /// present and parseable.
    Reachable { size: Option<u64> },

    /// Server answered 404.
    NotFound,

    /// Server answered 403.
    Forbidden,

    /// Server answered with any other status code.
    OtherStatus(u16),

    /// No connection could be established.
    ConnectionFailed,

    /// The probe timed out.
    TimedOut,

    /// Any other failure, with a human-readable message.
    UnknownError(String),
}

impl ProbeOutcome {
    #[must_use]
    pub fn is_reachable(&self) -> bool {
        matches!(self, ProbeOutcome::Reachable { .. })
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Reachable { size: Some(n) } => {
                write!(f, "reachable ({:.2} MiB)", *n as f64 / 1024.0 / 1024.0)
            }
            ProbeOutcome::Reachable { size: None } => write!(f, "reachable (size unknown)"),
            ProbeOutcome::NotFound => write!(f, "not found (404)"),
            ProbeOutcome::Forbidden => write!(f, "forbidden (403)"),
            ProbeOutcome::OtherStatus(code) => write!(f, "unexpected status {code}"),
            ProbeOutcome::ConnectionFailed => write!(f, "connection failed"),
            ProbeOutcome::TimedOut => write!(f, "timed out"),
            ProbeOutcome::UnknownError(msg) => write!(f, "error: {msg}"),
        }
    }
}

/// HEAD-probes URLs and classifies what came back.
pub struct Prober<C> {
    client: C,
    timeout: Duration,
}

impl<C: HttpClient> Prober<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            timeout: PROBE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Probe a single URL.
    pub async fn probe(&self, url: &str) -> ProbeOutcome {
        match self.client.head(url, self.timeout).await {
            Ok(reply) => match reply.status {
                200 => ProbeOutcome::Reachable {
                    size: reply.content_length,
                },
                404 => ProbeOutcome::NotFound,
                403 => ProbeOutcome::Forbidden,
                code => ProbeOutcome::OtherStatus(code),
            },
            Err(TransportError::TimedOut) => ProbeOutcome::TimedOut,
            Err(TransportError::ConnectionFailed(_)) => ProbeOutcome::ConnectionFailed,
            Err(TransportError::Other(msg)) => ProbeOutcome::UnknownError(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockClient, MockResponse};

    const URL: &str = "https://data.example.org/files/indoor_forward_3.zip";

    #[tokio::test]
    async fn test_probe_reachable_with_size() {
        let mock = MockClient::new().route(URL, MockResponse::status(200).content_length(4096));
        let outcome = Prober::new(mock).probe(URL).await;
        assert_eq!(outcome, ProbeOutcome::Reachable { size: Some(4096) });
        assert!(outcome.is_reachable());
    }

    #[tokio::test]
    async fn test_probe_reachable_without_size() {
        let mock = MockClient::new().route(URL, MockResponse::status(200));
        let outcome = Prober::new(mock).probe(URL).await;
        assert_eq!(outcome, ProbeOutcome::Reachable { size: None });
    }

    #[tokio::test]
    async fn test_probe_not_found() {
        let mock = MockClient::new().route(URL, MockResponse::status(404));
        assert_eq!(Prober::new(mock).probe(URL).await, ProbeOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_probe_forbidden() {
        let mock = MockClient::new().route(URL, MockResponse::status(403));
        assert_eq!(Prober::new(mock).probe(URL).await, ProbeOutcome::Forbidden);
    }

    #[tokio::test]
    async fn test_probe_other_status() {
        let mock = MockClient::new().route(URL, MockResponse::status(503));
        assert_eq!(
            Prober::new(mock).probe(URL).await,
            ProbeOutcome::OtherStatus(503)
        );
    }

    #[tokio::test]
    async fn test_probe_timeout() {
        let mock = MockClient::new().route(URL, MockResponse::fail(TransportError::TimedOut));
        assert_eq!(Prober::new(mock).probe(URL).await, ProbeOutcome::TimedOut);
    }

    #[tokio::test]
    async fn test_probe_connection_failure() {
        let mock = MockClient::new().route(
            URL,
            MockResponse::fail(TransportError::ConnectionFailed("refused".to_string())),
        );
        assert_eq!(
            Prober::new(mock).probe(URL).await,
            ProbeOutcome::ConnectionFailed
        );
    }

    #[tokio::test]
    async fn test_probe_unrouted_url_is_connection_failure() {
        let mock = MockClient::new();
        assert_eq!(
            Prober::new(mock).probe(URL).await,
            ProbeOutcome::ConnectionFailed
        );
    }

    #[tokio::test]
    async fn test_probe_other_error() {
        let mock = MockClient::new().route(
            URL,
            MockResponse::fail(TransportError::Other("tls handshake".to_string())),
        );
        assert_eq!(
            Prober::new(mock).probe(URL).await,
            ProbeOutcome::UnknownError("tls handshake".to_string())
        );
    }

    #[test]
    fn test_outcome_display() {
        let reachable = ProbeOutcome::Reachable {
            size: Some(3 * 1024 * 1024),
        };
        assert_eq!(reachable.to_string(), "reachable (3.00 MiB)");
        assert_eq!(ProbeOutcome::NotFound.to_string(), "not found (404)");
        assert_eq!(ProbeOutcome::OtherStatus(503).to_string(), "unexpected status 503");
    }
}
