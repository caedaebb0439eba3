use std::fmt;
use std::sync::Arc;

/// Phases of a download operation.
///
/// Downloads normally progress Connecting → Downloading → Completed.
/// A download that is skipped because the file on disk already matches
/// the declared size goes Connecting → AlreadyComplete instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    /// Initial state, request in flight.
    #[default]
    Connecting,

    /// The existing file matches the declared size; nothing to transfer.
    AlreadyComplete,

    /// Actively streaming data to disk.
    Downloading,

    /// Download completed successfully.
    Completed,
}

impl fmt::Display for FetchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchPhase::Connecting => write!(f, "connecting"),
            FetchPhase::AlreadyComplete => write!(f, "already complete"),
            FetchPhase::Downloading => write!(f, "downloading"),
            FetchPhase::Completed => write!(f, "completed"),
        }
    }
}

/// Snapshot of a download's state, passed to progress callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Current phase of the download.
    pub phase: FetchPhase,

    /// Number of bytes written so far.
    pub bytes_downloaded: u64,

    /// Total expected bytes, if the server declared a nonzero
    /// Content-Length.
    pub total_bytes: Option<u64>,
}

impl Progress {
    /// Completion percentage, `None` while the total is unknown.
    #[must_use]
    pub fn percentage(&self) -> Option<f64> {
        self.total_bytes.map(|total| {
            if total == 0 {
                if self.is_finished() { 100.0 } else { 0.0 }
            } else {
                (self.bytes_downloaded as f64 / total as f64) * 100.0
            }
        })
    }

    /// `true` once the download reached a terminal phase.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(
            self.phase,
            FetchPhase::Completed | FetchPhase::AlreadyComplete
        )
    }
}

/// Progress callback invoked on phase transitions and chunk writes.
pub type ProgressFn = Arc<dyn Fn(&Progress) + Send + Sync>;

/// Configuration for fetch operations.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use skyhaul_fetch::{FetchOptions, FetchPhase};
///
/// let options = FetchOptions::default().on_progress(Arc::new(|progress| {
///     if progress.phase == FetchPhase::Downloading {
///         if let Some(pct) = progress.percentage() {
///             println!("{pct:.1}%");
///         }
///     }
/// }));
/// ```
#[derive(Clone, Default)]
pub struct FetchOptions {
    /// Progress callback, invoked on every phase transition and after
    /// each chunk write.
    ///
    /// Default: None
    pub on_progress: Option<ProgressFn>,
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("on_progress", &self.on_progress.as_ref().map(|_| "{ ... }"))
            .finish()
    }
}

impl FetchOptions {
    /// Set the progress callback.
    #[must_use]
    pub fn on_progress(mut self, on_progress: ProgressFn) -> Self {
        self.on_progress = Some(on_progress);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(phase: FetchPhase, done: u64, total: Option<u64>) -> Progress {
        Progress {
            phase,
            bytes_downloaded: done,
            total_bytes: total,
        }
    }

    #[test]
    fn test_percentage_with_known_total() {
        let p = progress(FetchPhase::Downloading, 512, Some(2048));
        assert_eq!(p.percentage(), Some(25.0));
    }

    #[test]
    fn test_percentage_unknown_total() {
        let p = progress(FetchPhase::Downloading, 512, None);
        assert_eq!(p.percentage(), None);
    }

    #[test]
    fn test_percentage_zero_total() {
        let active = progress(FetchPhase::Downloading, 0, Some(0));
        assert_eq!(active.percentage(), Some(0.0));

        let done = progress(FetchPhase::Completed, 0, Some(0));
        assert_eq!(done.percentage(), Some(100.0));
    }

    #[test]
    fn test_finished_phases() {
        assert!(progress(FetchPhase::Completed, 1, Some(1)).is_finished());
        assert!(progress(FetchPhase::AlreadyComplete, 1, Some(1)).is_finished());
        assert!(!progress(FetchPhase::Downloading, 1, Some(2)).is_finished());
        assert!(!progress(FetchPhase::Connecting, 0, None).is_finished());
    }
}
