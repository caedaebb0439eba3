//! Catalog-level pull behavior with a scripted HTTP client.

use std::fs;
use std::path::Path;

use skyhaul_core::catalog::{Catalog, ResourceGroup};
use skyhaul_core::run::{self, MergeStatus};
use skyhaul_fetch::Fetcher;
use skyhaul_fetch::mock::{MockClient, MockResponse};

const CHUNK1: &str = "https://releases.example.org/v1/piloted_zipchunk01";
const CHUNK2: &str = "https://releases.example.org/v1/piloted_zipchunk02";
const CHUNK3: &str = "https://releases.example.org/v1/piloted_zipchunk03";
const SOLO: &str = "https://data.example.org/sequences/indoor_forward_3.zip";

fn demo_catalog() -> Catalog {
    Catalog {
        groups: vec![
            ResourceGroup {
                name: "demo_piloted".to_string(),
                locators: vec![
                    CHUNK1.to_string(),
                    CHUNK2.to_string(),
                    CHUNK3.to_string(),
                ],
                merge_target: Some("piloted.zip".to_string()),
            },
            ResourceGroup {
                name: "demo_solo".to_string(),
                locators: vec![SOLO.to_string()],
                merge_target: None,
            },
        ],
    }
}

fn routed_mock() -> MockClient {
    MockClient::new()
        .route(CHUNK1, MockResponse::ok(&[b"AAAA"]))
        .route(CHUNK2, MockResponse::ok(&[b"BB", b"BB"]))
        .route(CHUNK3, MockResponse::ok(&[b"CC"]))
        .route(SOLO, MockResponse::ok(&[b"standalone archive"]))
}

fn assert_content(path: &Path, expected: &[u8]) {
    assert_eq!(fs::read(path).unwrap(), expected);
}

#[test]
fn test_pull_fetches_merges_and_cleans_up() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    let fetcher = Fetcher::new(routed_mock());

    let report = run::pull_catalog(&fetcher, &demo_catalog(), root);

    assert!(report.complete());
    assert_eq!(report.total_failed(), 0);
    assert_eq!(report.groups.len(), 2);

    let piloted = &report.groups[0];
    assert_eq!(piloted.fetched, 3);
    assert_eq!(piloted.merge, Some(MergeStatus::Merged));

    let dir = root.join("demo_piloted");
    assert_content(&dir.join("piloted.zip"), b"AAAABBBBCC");
    assert!(!dir.join("piloted_zipchunk01").exists());
    assert!(!dir.join("piloted_zipchunk02").exists());
    assert!(!dir.join("piloted_zipchunk03").exists());

    let solo = &report.groups[1];
    assert_eq!(solo.fetched, 1);
    assert_eq!(solo.merge, None);
    assert_content(
        &root.join("demo_solo").join("indoor_forward_3.zip"),
        b"standalone archive",
    );
}

#[test]
fn test_pull_with_failed_chunk_skips_merge_and_continues() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    // chunk02 is unrouted and behaves like an unreachable host.
    let mock = MockClient::new()
        .route(CHUNK1, MockResponse::ok(&[b"AAAA"]))
        .route(CHUNK3, MockResponse::ok(&[b"CC"]))
        .route(SOLO, MockResponse::ok(&[b"standalone archive"]));
    let fetcher = Fetcher::new(mock);

    let report = run::pull_catalog(&fetcher, &demo_catalog(), root);

    assert!(!report.complete());
    assert_eq!(report.total_failed(), 1);

    let piloted = &report.groups[0];
    assert_eq!(piloted.fetched, 2);
    assert_eq!(piloted.failed, 1);
    assert_eq!(piloted.merge, Some(MergeStatus::Incomplete));

    let dir = root.join("demo_piloted");
    assert!(!dir.join("piloted.zip").exists());
    assert!(dir.join("piloted_zipchunk01").exists());
    assert!(dir.join("piloted_zipchunk03").exists());

    // The run continued past the broken group.
    assert!(report.groups[1].complete());
    assert!(root.join("demo_solo").join("indoor_forward_3.zip").exists());
}

#[test]
fn test_second_pull_is_idempotent() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    let mock = routed_mock();
    let fetcher = Fetcher::new(mock.clone());
    let catalog = demo_catalog();

    let first = run::pull_catalog(&fetcher, &catalog, root);
    assert!(first.complete());
    let chunks_after_first = mock.chunks_served();

    let second = run::pull_catalog(&fetcher, &catalog, root);
    assert!(second.complete());

    // The merged archive is found and left alone.
    assert_eq!(second.groups[0].merge, Some(MergeStatus::AlreadyMerged));
    assert_content(&root.join("demo_piloted").join("piloted.zip"), b"AAAABBBBCC");

    // Chunks were deleted by the first merge, so they are fetched again;
    // the merge no-op then leaves the fresh copies in place.
    assert_eq!(second.groups[0].fetched, 3);
    assert!(root.join("demo_piloted").join("piloted_zipchunk01").exists());

    // The standalone archive still matches its declared size: no bytes move.
    assert_eq!(second.groups[1].skipped, 1);
    assert_eq!(second.groups[1].fetched, 0);

    // 4 chunks for the re-fetched chunk files, none for the solo file.
    let second_run_chunks = mock.chunks_served() - chunks_after_first;
    assert_eq!(second_run_chunks, 4);
}

#[test]
fn test_unwritable_group_directory_is_reported() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    // A file sits where the group directory should go.
    fs::write(root.join("demo_piloted"), b"in the way").unwrap();
    let fetcher = Fetcher::new(routed_mock());

    let report = run::pull_catalog(&fetcher, &demo_catalog(), root);

    assert!(!report.complete());
    let piloted = &report.groups[0];
    assert!(piloted.error.is_some());
    assert_eq!(piloted.fetched, 0);

    // The other group is unaffected.
    assert!(report.groups[1].complete());
}
