//! HTTP acquisition for dataset archives.
//!
//! Two operations: [`Prober::probe`] asks whether a URL is available
//! without transferring its body, and [`Fetcher::fetch`] streams a URL
//! to disk, skipping files that are already complete by size.

mod error;
mod fetch;
mod http;
pub mod mock;
mod probe;
mod progress;

pub use error::{FetchError, Result};
pub use fetch::{BLOCK_SIZE, Fetcher, file_name_for};
pub use http::{Body, BoxStream, GetReply, HeadReply, HttpClient, ReqwestClient, TransportError};
pub use probe::{PROBE_TIMEOUT, ProbeOutcome, Prober};
pub use progress::{FetchOptions, FetchPhase, Progress, ProgressFn};
