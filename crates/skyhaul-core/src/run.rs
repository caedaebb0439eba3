//! Sequential pull of a catalog: every locator of every group, then
//! chunk reassembly for the groups that declare a merge target.
//!
//! Failures never stop the run. A failed file is recorded and the next
//! one is attempted; a group with any failed chunk is left unmerged so
//! a later run can finish it.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use indicatif::HumanBytes;
use skyhaul_fetch::{
    FetchOptions, FetchPhase, Fetcher, HttpClient, Progress, ProgressFn, file_name_for,
};
use skyhaul_splice::splice;

use crate::catalog::{Catalog, ResourceGroup};
use crate::task_pool::POOL;
use crate::ui::tracker::{ProgressTrackerBuilder, Tracker, TrackerBuilder};

/// How a chunked group's merge ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStatus {
    /// Chunks were concatenated and deleted.
    Merged,
    /// The merge target already existed; nothing was touched.
    AlreadyMerged,
    /// Skipped because not every chunk was fetched.
    Incomplete,
    /// The merge itself failed.
    Failed,
}

/// Per-group results of a pull.
#[derive(Debug, Clone)]
pub struct GroupReport {
    pub name: String,
    /// Files transferred this run.
    pub fetched: usize,
    /// Files that were already complete on disk.
    pub skipped: usize,
    /// Files that could not be downloaded.
    pub failed: usize,
    /// Merge result for chunked groups, `None` otherwise.
    pub merge: Option<MergeStatus>,
    /// Group-level failure: the directory could not be created.
    pub error: Option<String>,
}

impl GroupReport {
    /// `true` when every file landed and any merge succeeded.
    #[must_use]
    pub fn complete(&self) -> bool {
        self.error.is_none() && self.failed == 0 && self.merge != Some(MergeStatus::Failed)
    }
}

/// Results of pulling a catalog.
#[derive(Debug, Clone, Default)]
pub struct PullReport {
    pub groups: Vec<GroupReport>,
}

impl PullReport {
    #[must_use]
    pub fn complete(&self) -> bool {
        self.groups.iter().all(GroupReport::complete)
    }

    #[must_use]
    pub fn total_failed(&self) -> usize {
        self.groups.iter().map(|g| g.failed).sum()
    }
}

/// Pull every group of `catalog` into `root`, one file at a time.
///
/// Each group gets its own subdirectory named after it. The whole
/// catalog is always walked to the end; per-file outcomes land in the
/// returned report.
pub fn pull_catalog<C: HttpClient>(
    fetcher: &Fetcher<C>,
    catalog: &Catalog,
    root: &Path,
) -> PullReport {
    let mut report = PullReport::default();

    for group in &catalog.groups {
        println!("processing group [{}]", group.name);
        report.groups.push(pull_group(fetcher, group, root));
        println!("{}", "-".repeat(40));
    }

    report
}

fn pull_group<C: HttpClient>(
    fetcher: &Fetcher<C>,
    group: &ResourceGroup,
    root: &Path,
) -> GroupReport {
    let mut report = GroupReport {
        name: group.name.clone(),
        fetched: 0,
        skipped: 0,
        failed: 0,
        merge: None,
        error: None,
    };

    let dir = root.join(&group.name);
    if let Err(e) = std::fs::create_dir_all(&dir) {
        println!("  cannot create {}: {e}", dir.display());
        report.error = Some(e.to_string());
        return report;
    }

    let mut fetched = Vec::with_capacity(group.locators.len());

    for url in &group.locators {
        let label = file_name_for(url).unwrap_or_else(|_| url.clone());
        let watch = FetchWatch::new(&label);
        let options = FetchOptions::default().on_progress(watch.callback());

        match POOL.block_on(fetcher.fetch(url, &dir, &options)) {
            Ok(path) => {
                if watch.skipped() {
                    report.skipped += 1;
                    println!("  [skip] already complete: {label}");
                } else {
                    report.fetched += 1;
                }
                fetched.push(path);
            }
            Err(e) => {
                report.failed += 1;
                println!("  [fail] {label}: {e}");
            }
        }
    }

    if let Some(target_name) = &group.merge_target {
        report.merge = Some(merge_group(group, &dir, target_name, &fetched, report.failed));
    }

    report
}

fn merge_group(
    group: &ResourceGroup,
    dir: &Path,
    target_name: &str,
    chunks: &[PathBuf],
    failed: usize,
) -> MergeStatus {
    if failed > 0 || chunks.len() != group.locators.len() {
        println!("  not merging {target_name}: {failed} chunk(s) missing");
        return MergeStatus::Incomplete;
    }

    let target = dir.join(target_name);
    match splice(&target, chunks) {
        Ok(outcome) if outcome.already_merged => {
            println!("  merge target already exists: {target_name}");
            MergeStatus::AlreadyMerged
        }
        Ok(outcome) => {
            println!(
                "  merged {} chunks into {target_name} ({})",
                outcome.chunks_merged,
                HumanBytes(outcome.bytes_written)
            );
            for (path, error) in &outcome.leftover {
                println!("  could not delete {}: {error}", path.display());
            }
            MergeStatus::Merged
        }
        Err(e) => {
            println!("  merge failed for {target_name}: {e}");
            MergeStatus::Failed
        }
    }
}

/// Watches one fetch through its progress callback: remembers whether
/// the file was skipped and drives a progress bar while bytes flow.
struct FetchWatch {
    label: String,
    skipped: Arc<AtomicBool>,
    tracker: Arc<Mutex<Option<crate::ui::tracker::ProgressTracker>>>,
}

impl FetchWatch {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            skipped: Arc::new(AtomicBool::new(false)),
            tracker: Arc::new(Mutex::new(None)),
        }
    }

    fn skipped(&self) -> bool {
        self.skipped.load(Ordering::SeqCst)
    }

    fn callback(&self) -> ProgressFn {
        let label = self.label.clone();
        let skipped = Arc::clone(&self.skipped);
        let tracker = Arc::clone(&self.tracker);

        Arc::new(move |progress: &Progress| match progress.phase {
            FetchPhase::Connecting => {}
            FetchPhase::AlreadyComplete => skipped.store(true, Ordering::SeqCst),
            FetchPhase::Downloading => {
                if let Ok(mut guard) = tracker.lock() {
                    let bar = guard.get_or_insert_with(|| {
                        let mut builder = ProgressTrackerBuilder::default().with_prefix(&label);
                        if let Some(total) = progress.total_bytes {
                            builder = builder.with_len(total);
                        }
                        builder.build()
                    });
                    bar.update(progress.bytes_downloaded);
                }
            }
            FetchPhase::Completed => {
                if let Ok(mut guard) = tracker.lock() {
                    if let Some(bar) = guard.take() {
                        bar.finish();
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(failed: usize, merge: Option<MergeStatus>) -> GroupReport {
        GroupReport {
            name: "g".to_string(),
            fetched: 1,
            skipped: 0,
            failed,
            merge,
            error: None,
        }
    }

    #[test]
    fn test_group_complete() {
        assert!(report(0, None).complete());
        assert!(report(0, Some(MergeStatus::Merged)).complete());
        assert!(report(0, Some(MergeStatus::AlreadyMerged)).complete());
        assert!(!report(1, None).complete());
        assert!(!report(0, Some(MergeStatus::Failed)).complete());
    }

    #[test]
    fn test_group_error_is_incomplete() {
        let mut r = report(0, None);
        r.error = Some("permission denied".to_string());
        assert!(!r.complete());
    }

    #[test]
    fn test_pull_report_totals() {
        let pull = PullReport {
            groups: vec![report(0, None), report(2, Some(MergeStatus::Incomplete))],
        };
        assert!(!pull.complete());
        assert_eq!(pull.total_failed(), 2);
    }
}
