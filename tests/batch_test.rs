//! Batch orchestration: fixed order, independent outcomes.

use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use ddmetrics::batch::run_batch;
use ddmetrics::config::Settings;
use ddmetrics::driver::{CollectionRequest, DriverOptions};
use ddmetrics::error::{ProcessingError, TreebankErrorKind};
use ddmetrics::util::testing::{init_test_setup, MockProcessor};

fn requests_in(dir: &TempDir, names: &[&str]) -> Vec<CollectionRequest> {
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();
    names
        .iter()
        .map(|name| {
            CollectionRequest::new(
                *name,
                dir.path().join(format!("{name}_list.txt")),
                out.clone(),
            )
        })
        .collect()
}

fn failing() -> MockProcessor {
    MockProcessor::failing_init(ProcessingError::Collection(
        TreebankErrorKind::MainFileNotFound(PathBuf::from("missing_list.txt")),
    ))
}

#[test]
fn given_one_failing_collection_then_the_rest_are_still_attempted() {
    init_test_setup();
    let dir = TempDir::new().unwrap();
    let requests = requests_in(&dir, &["prague", "stanford", "ud26"]);
    let mut queue = VecDeque::from(vec![
        MockProcessor::succeeding(),
        failing(),
        MockProcessor::succeeding(),
    ]);

    let summary = run_batch(
        || queue.pop_front().expect("one processor per collection"),
        &requests,
        &DriverOptions::default(),
    );

    assert_eq!(summary.succeeded, vec!["prague", "ud26"]);
    assert_eq!(summary.failed, vec!["stanford"]);
    assert_eq!(summary.total(), 3);
    assert!(!summary.all_succeeded());
    assert!(queue.is_empty(), "every collection consumed a processor");
}

#[test]
fn given_all_succeeding_then_summary_keeps_run_order() {
    init_test_setup();
    let dir = TempDir::new().unwrap();
    let settings = Settings::default();
    let mut requests = settings.requests().unwrap();
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();
    for request in &mut requests {
        request.output_dir = out.clone();
    }

    let summary = run_batch(
        MockProcessor::succeeding,
        &requests,
        &DriverOptions::default(),
    );

    assert!(summary.all_succeeded());
    assert_eq!(
        summary.succeeded,
        vec!["prague", "stanford", "psud26", "pud26", "sud26", "ud26"]
    );
    assert!(summary.succeeded_for("psud26"));
}

#[test]
fn given_empty_collection_list_then_empty_summary() {
    init_test_setup();
    let summary = run_batch(
        MockProcessor::succeeding,
        &[],
        &DriverOptions::default(),
    );

    assert!(summary.all_succeeded());
    assert_eq!(summary.total(), 0);
}
