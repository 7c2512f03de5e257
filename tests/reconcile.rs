use std::io::Write;

use tempfile::NamedTempFile;
use wordtable::config::ReconcileConfig;
use wordtable::confirm::AssumeYes;
use wordtable::jobs::reconcile::{self, ReconcileStatus};
use wordtable::memory::MemoryWordStore;

fn reference_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn never_asked(_: &[String]) -> bool {
    panic!("confirmation should not be requested")
}

#[tokio::test]
async fn deletes_words_missing_from_reference() {
    let store = MemoryWordStore::with_words(["apple", "mango", "kiwi"]);
    let file = reference_file("Apple\n  KIWI \n\n");
    let config = ReconcileConfig::new(file.path());

    let mut asked_with = Vec::new();
    let mut confirm = |words: &[String]| {
        asked_with = words.to_vec();
        true
    };
    let report = reconcile::run(&store, &config, &mut confirm).await.unwrap();

    assert_eq!(asked_with, ["mango"]);
    assert_eq!(report.status, ReconcileStatus::Completed);
    assert_eq!(report.reference_words, 2);
    assert_eq!(report.table_words, 3);
    assert_eq!(report.to_delete, ["mango"]);
    assert_eq!(report.deleted, 1);
    assert_eq!(store.words(), ["apple", "kiwi"]);
}

#[tokio::test]
async fn missing_reference_file_aborts_before_scanning() {
    let store = MemoryWordStore::with_words(["apple"]);
    let dir = tempfile::tempdir().unwrap();
    let config = ReconcileConfig::new(dir.path().join("missing.txt"));

    let report = reconcile::run(&store, &config, &mut never_asked)
        .await
        .unwrap();

    assert_eq!(report.status, ReconcileStatus::NoReference);
    assert_eq!(store.scan_calls(), 0);
    assert_eq!(store.delete_calls(), 0);
}

#[tokio::test]
async fn blank_reference_file_never_deletes() {
    let store = MemoryWordStore::with_words(["apple", "mango"]);
    let file = reference_file("\n   \n\n");
    let config = ReconcileConfig::new(file.path());

    let report = reconcile::run(&store, &config, &mut AssumeYes).await.unwrap();

    assert_eq!(report.status, ReconcileStatus::NoReference);
    assert_eq!(store.delete_calls(), 0);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn empty_reference_path_is_a_config_error() {
    let store = MemoryWordStore::with_words(["apple"]);
    let config = ReconcileConfig::new("");

    let result = reconcile::run(&store, &config, &mut AssumeYes).await;

    assert!(matches!(result, Err(wordtable::Error::Config(_))));
    assert_eq!(store.delete_calls(), 0);
}

#[tokio::test]
async fn declined_confirmation_deletes_nothing() {
    let store = MemoryWordStore::with_words(["apple", "mango"]);
    let file = reference_file("apple\n");
    let config = ReconcileConfig::new(file.path());

    let report = reconcile::run(&store, &config, &mut |_: &[String]| false)
        .await
        .unwrap();

    assert_eq!(report.status, ReconcileStatus::Cancelled);
    assert_eq!(report.to_delete, ["mango"]);
    assert_eq!(store.delete_calls(), 0);
}

#[tokio::test]
async fn dry_run_reports_without_asking() {
    let store = MemoryWordStore::with_words(["apple", "mango"]);
    let file = reference_file("apple\n");
    let config = ReconcileConfig {
        dry_run: true,
        ..ReconcileConfig::new(file.path())
    };

    let report = reconcile::run(&store, &config, &mut never_asked)
        .await
        .unwrap();

    assert_eq!(report.status, ReconcileStatus::DryRun);
    assert_eq!(report.to_delete, ["mango"]);
    assert_eq!(store.delete_calls(), 0);
}

#[tokio::test]
async fn nothing_to_delete() {
    let store = MemoryWordStore::with_words(["apple"]);
    let file = reference_file("apple\nmango\n");
    let config = ReconcileConfig::new(file.path());

    let report = reconcile::run(&store, &config, &mut never_asked)
        .await
        .unwrap();

    assert_eq!(report.status, ReconcileStatus::NothingToDelete);
}

#[tokio::test]
async fn empty_table() {
    let store = MemoryWordStore::new();
    let file = reference_file("apple\n");
    let config = ReconcileConfig::new(file.path());

    let report = reconcile::run(&store, &config, &mut never_asked)
        .await
        .unwrap();

    assert_eq!(report.status, ReconcileStatus::EmptyTable);
    assert_eq!(store.scan_calls(), 1);
}

#[tokio::test]
async fn delete_failures_are_isolated() {
    let store = MemoryWordStore::with_page_size(2);
    for word in ["apple", "berry", "cherry", "grape", "lemon"] {
        store.insert(wordtable::WordEntry::new(word));
    }
    store.fail_word("cherry");
    let file = reference_file("apple\n");
    let config = ReconcileConfig::new(file.path());

    let report = reconcile::run(&store, &config, &mut AssumeYes).await.unwrap();

    assert_eq!(report.table_words, 5);
    assert_eq!(report.to_delete.len(), 4);
    assert_eq!(report.deleted, 3);
    assert_eq!(report.failed_words, ["cherry"]);
    assert_eq!(report.deleted + report.failed(), report.to_delete.len());
    assert_eq!(store.words(), ["apple", "cherry"]);
}

#[tokio::test]
async fn scan_failure_is_an_error() {
    let store = MemoryWordStore::with_words(["apple"]);
    store.fail_scan_after(0);
    let file = reference_file("apple\n");
    let config = ReconcileConfig::new(file.path());

    let result = reconcile::run(&store, &config, &mut never_asked).await;

    assert!(result.is_err());
    assert_eq!(store.delete_calls(), 0);
}

#[tokio::test]
async fn case_variants_are_counted_once_but_deleted_by_stored_key() {
    let store = MemoryWordStore::with_words(["Mango", "mango", "apple"]);
    let file = reference_file("apple\n");
    let config = ReconcileConfig::new(file.path());

    let report = reconcile::run(&store, &config, &mut AssumeYes).await.unwrap();

    assert_eq!(report.table_words, 2);
    assert_eq!(report.to_delete, ["Mango", "mango"]);
    assert_eq!(report.deleted, 2);
    assert_eq!(store.words(), ["apple"]);
}
