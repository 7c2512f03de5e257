//! Reading and validating word files.
//!
//! Every line is trimmed and lowercased before use; blank lines are ignored.

use std::collections::HashSet;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::errors::{Error, Result};

/// Length of every word the loader accepts.
pub const WORD_LENGTH: usize = 5;

/// Trim and lowercase a line; `None` for blank lines.
pub fn normalize(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Exactly five characters, all alphabetic.
pub fn is_valid_word(word: &str) -> bool {
    word.chars().count() == WORD_LENGTH && word.chars().all(char::is_alphabetic)
}

/// The loader's view of a word file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordList {
    /// Valid words in file order, first occurrence only.
    pub accepted: Vec<String>,
    /// Normalized lines that failed validation.
    pub rejected: Vec<String>,
    /// Valid words dropped because they already appeared earlier.
    pub duplicates: usize,
}

impl WordList {
    /// Sort lines of a word file into accepted, rejected and duplicate words.
    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let mut list = WordList::default();
        let mut seen = HashSet::new();
        for line in lines {
            let Some(word) = normalize(line.as_ref()) else {
                continue;
            };
            if !is_valid_word(&word) {
                tracing::warn!("skipping '{}': not a {}-letter alphabetic word", word, WORD_LENGTH);
                list.rejected.push(word);
            } else if seen.insert(word.clone()) {
                list.accepted.push(word);
            } else {
                list.duplicates += 1;
            }
        }
        list
    }
}

/// Build the reference set from the lines of a reference file.
pub fn reference_set<I, L>(lines: I) -> HashSet<String>
where
    I: IntoIterator<Item = L>,
    L: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| normalize(line.as_ref()))
        .collect()
}

async fn read_lines(path: &Path) -> Result<Vec<String>> {
    let input_err = |source: std::io::Error| Error::Input {
        path: path.to_path_buf(),
        source,
    };

    let file = tokio::fs::File::open(path).await.map_err(input_err)?;
    let mut lines = BufReader::new(file).lines();
    let mut out = Vec::new();
    while let Some(line) = lines.next_line().await.map_err(input_err)? {
        out.push(line);
    }
    Ok(out)
}

/// Read the loader's word list.
///
/// # Errors
///
/// `Error::Input` if the file is missing or unreadable.
pub async fn read_word_list(path: &Path) -> Result<WordList> {
    Ok(WordList::from_lines(read_lines(path).await?))
}

/// Read the reconciliation reference file into a de-duplicated set.
///
/// # Errors
///
/// `Error::Input` if the file is missing or unreadable.
pub async fn load_reference_words(path: &Path) -> Result<HashSet<String>> {
    Ok(reference_set(read_lines(path).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn lines_are_trimmed_and_lowercased() {
        assert_eq!(normalize("  Crane \n").as_deref(), Some("crane"));
        assert_eq!(normalize("   "), None);
        assert_eq!(normalize(""), None);
    }

    #[test]
    fn only_five_letter_alphabetic_words_pass() {
        assert!(is_valid_word("crane"));
        assert!(is_valid_word("ÉCLAT".to_lowercase().as_str()));
        assert!(!is_valid_word("ab12c"));
        assert!(!is_valid_word("four"));
        assert!(!is_valid_word("sixers"));
        assert!(!is_valid_word("ab-cd"));
        assert!(!is_valid_word(""));
    }

    #[test]
    fn word_list_sorts_lines() {
        let list = WordList::from_lines(["Crane\n", "ab12c", "", "  ", "slate", "CRANE", "toolong"]);
        assert_eq!(list.accepted, ["crane", "slate"]);
        assert_eq!(list.rejected, ["ab12c", "toolong"]);
        assert_eq!(list.duplicates, 1);
    }

    #[test]
    fn reference_set_dedups_case_insensitively() {
        let set = reference_set(["Apple", "apple ", "", "KIWI"]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("apple"));
        assert!(set.contains("kiwi"));
    }

    #[tokio::test]
    async fn reads_files_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Crane\nab12c\n\nslate").unwrap();

        let list = read_word_list(file.path()).await.unwrap();
        assert_eq!(list.accepted, ["crane", "slate"]);

        let set = load_reference_words(file.path()).await.unwrap();
        assert_eq!(set.len(), 3);
    }

    #[tokio::test]
    async fn missing_file_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_word_list(&dir.path().join("nope.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Input { .. }));
    }
}
