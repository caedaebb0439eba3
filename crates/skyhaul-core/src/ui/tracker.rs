use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;

pub trait TrackerBuilder<T: Tracker> {
    fn build(self) -> T;
}

pub trait Tracker {
    fn update(&self, position: u64) -> &Self;
    fn finish(self);
}

const PB_STYLE: &str = "{spinner:.green} {prefix:>24.bold} [{elapsed_precise}] {wide_bar:.green/white.dim} {bytes}/{total_bytes} ({bytes_per_sec}, {eta}) {msg}";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▇▆▅▄▃▂▁  ";

static PB_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    let pb_style = match ProgressStyle::with_template(PB_STYLE) {
        Ok(pb_style) => pb_style.tick_chars(TICK).progress_chars(PB_CHARS),
        Err(_) => return None,
    };

    Some(pb_style)
});

/// Console progress bar for one transfer.
///
/// Built with a length when the total size is known, as a spinner
/// otherwise. Positions are absolute, matching the cumulative byte
/// counts a fetch reports.
pub struct ProgressTracker {
    pb: ProgressBar,
    finish: Option<String>,
}

impl Tracker for ProgressTracker {
    fn update(&self, position: u64) -> &Self {
        self.pb.set_position(position);
        self
    }

    fn finish(self) {
        match self.finish {
            Some(msg) => self.pb.finish_with_message(msg),
            None => self.pb.finish(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgressTrackerBuilder {
    len: Option<u64>,
    prefix: Option<String>,
    finish: Option<String>,
}

impl ProgressTrackerBuilder {
    pub fn with_len(mut self, len: u64) -> Self {
        self.len = Some(len);
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    pub fn with_finish(mut self, finish: &str) -> Self {
        self.finish = Some(finish.to_string());
        self
    }
}

impl TrackerBuilder<ProgressTracker> for ProgressTrackerBuilder {
    fn build(self) -> ProgressTracker {
        let pb = match self.len {
            Some(len) => ProgressBar::new(len),
            None => ProgressBar::new_spinner(),
        };
        let pb = match PB_TEMPLATE.as_ref() {
            Some(style) => pb.with_style(style.clone()),
            None => pb,
        };

        if let Some(prefix) = self.prefix {
            pb.set_prefix(prefix);
        }
        ProgressTracker {
            pb,
            finish: self.finish,
        }
    }
}
