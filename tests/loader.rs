use std::io::Write;

use tempfile::NamedTempFile;
use wordtable::config::LoaderConfig;
use wordtable::entry::{FIVE_LETTER_WORD, WordEntry};
use wordtable::jobs::loader;
use wordtable::memory::MemoryWordStore;

fn word_list(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn config_for(file: &NamedTempFile) -> LoaderConfig {
    LoaderConfig {
        word_list: file.path().to_path_buf(),
        skip_existing: false,
    }
}

#[tokio::test]
async fn loads_valid_words_only() {
    let store = MemoryWordStore::new();
    let file = word_list("Crane\nab12c\n\nslate\nfour\n  TRACE  \n");

    let report = loader::run(&store, &config_for(&file)).await.unwrap();

    assert_eq!(report.attempted, 3);
    assert_eq!(report.succeeded, 3);
    assert_eq!(report.failed(), 0);
    assert_eq!(report.rejected, 2);
    assert_eq!(store.words(), ["crane", "slate", "trace"]);
}

#[tokio::test]
async fn duplicate_lines_are_written_once() {
    let store = MemoryWordStore::new();
    let file = word_list("crane\nCRANE\ncrane\n");

    let report = loader::run(&store, &config_for(&file)).await.unwrap();

    assert_eq!(report.attempted, 1);
    assert_eq!(report.duplicates, 2);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn missing_word_list_is_an_error() {
    let store = MemoryWordStore::new();
    let dir = tempfile::tempdir().unwrap();
    let config = LoaderConfig {
        word_list: dir.path().join("words.txt"),
        skip_existing: false,
    };

    let err = loader::run(&store, &config).await.unwrap_err();

    assert!(matches!(err, wordtable::Error::Input { .. }));
    assert_eq!(store.batch_calls(), 0);
}

#[tokio::test]
async fn no_valid_words_writes_nothing() {
    let store = MemoryWordStore::new();
    let file = word_list("ab\n12345\n");

    let report = loader::run(&store, &config_for(&file)).await.unwrap();

    assert_eq!(report.attempted, 0);
    assert_eq!(store.batch_calls(), 0);
}

#[tokio::test]
async fn large_lists_are_flushed_in_batches() {
    let store = MemoryWordStore::new();
    let words: Vec<String> = (0..60u8)
        .map(|i| {
            let a = (b'a' + i / 26) as char;
            let b = (b'a' + i % 26) as char;
            format!("{a}{b}xyz")
        })
        .collect();
    let file = word_list(&words.join("\n"));

    let report = loader::run(&store, &config_for(&file)).await.unwrap();

    assert_eq!(report.succeeded, 60);
    assert_eq!(store.batch_calls(), 3);
}

#[tokio::test]
async fn per_item_failures_are_counted() {
    let store = MemoryWordStore::new();
    store.fail_word("slate");
    let file = word_list("crane\nslate\ntrace\n");

    let report = loader::run(&store, &config_for(&file)).await.unwrap();

    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed_words, ["slate"]);
    assert_eq!(report.succeeded + report.failed(), report.attempted);
}

#[tokio::test]
async fn existing_items_are_replaced_whole() {
    let store = MemoryWordStore::new();
    store.insert(WordEntry {
        word: "crane".into(),
        random_id: Some(0.3),
        partition_tag: Some(FIVE_LETTER_WORD.into()),
    });
    let file = word_list("crane\n");

    loader::run(&store, &config_for(&file)).await.unwrap();

    assert_eq!(store.entry("crane").unwrap(), WordEntry::new("crane"));
}

#[tokio::test]
async fn skip_existing_leaves_present_words_alone() {
    let store = MemoryWordStore::new();
    store.insert(WordEntry {
        word: "crane".into(),
        random_id: Some(0.3),
        partition_tag: Some(FIVE_LETTER_WORD.into()),
    });
    let file = word_list("crane\nslate\n");
    let config = LoaderConfig {
        skip_existing: true,
        ..config_for(&file)
    };

    let report = loader::run(&store, &config).await.unwrap();

    assert_eq!(store.get_calls(), 2);
    assert_eq!(report.skipped_existing, 1);
    assert_eq!(report.succeeded, 1);
    assert_eq!(store.entry("crane").unwrap().random_id, Some(0.3));
    assert_eq!(store.entry("slate").unwrap(), WordEntry::new("slate"));
}
