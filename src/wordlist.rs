//! Wordlist management module
//!
//! Handles loading and querying the common-password wordlist. The list is
//! loaded once at process start into an immutable shared snapshot.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::RwLock;
use thiserror::Error;

static COMMON_PASSWORDS: RwLock<Option<HashSet<String>>> = RwLock::new(None);

/// Entries shorter than this are only matched exactly, never as
/// substrings, to avoid flagging every password containing "ab".
const MIN_SUBSTRING_LEN: usize = 4;

#[derive(Error, Debug)]
pub enum WordlistError {
    #[error("Wordlist file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read wordlist file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Wordlist file is empty")]
    EmptyFile,
}

/// Returns the wordlist file path.
///
/// Priority:
/// 1. Environment variable `SECUREPASS_WORDLIST_PATH`
/// 2. Default path `./assets/common-passwords.txt`
pub fn get_wordlist_path() -> PathBuf {
    std::env::var("SECUREPASS_WORDLIST_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./assets/common-passwords.txt"))
}

/// Initializes the common-password wordlist from an external file.
///
/// Call once at startup; a missing or empty wordlist is a configuration
/// error and should be fatal to the process, not to individual analyses.
///
/// # Environment Variable
///
/// Set `SECUREPASS_WORDLIST_PATH` to specify a custom wordlist location.
/// If not set, defaults to `./assets/common-passwords.txt`.
///
/// # Errors
///
/// Returns error if:
/// - File does not exist
/// - File cannot be read
/// - File is empty
pub fn init_wordlist() -> Result<usize, WordlistError> {
    let path = get_wordlist_path();
    init_wordlist_from_path(&path)
}

/// Initializes the wordlist from a specific file path.
///
/// Idempotent: if the snapshot is already loaded, returns its size without
/// re-reading the file.
pub fn init_wordlist_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<usize, WordlistError> {
    {
        let guard = COMMON_PASSWORDS.read().unwrap();
        if let Some(set) = guard.as_ref() {
            return Ok(set.len());
        }
    }

    let path = path.as_ref();

    if !path.exists() {
        #[cfg(feature = "tracing")]
        tracing::error!("Wordlist initialization FAILED: FileNotFound {:?}", path);
        return Err(WordlistError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;

    if content.trim().is_empty() {
        #[cfg(feature = "tracing")]
        tracing::error!("Wordlist initialization FAILED: Empty file {:?}", path);
        return Err(WordlistError::EmptyFile);
    }

    let set: HashSet<String> = content
        .lines()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .collect();

    let count = set.len();
    {
        let mut guard = COMMON_PASSWORDS.write().unwrap();
        *guard = Some(set);
    }

    #[cfg(feature = "tracing")]
    tracing::info!("Wordlist initialized: {} entries from {:?}", count, path);

    Ok(count)
}

/// Returns a cloned copy of the loaded wordlist.
///
/// Returns `None` if `init_wordlist()` has not been called.
pub fn get_wordlist() -> Option<HashSet<String>> {
    let guard = COMMON_PASSWORDS.read().unwrap();
    guard.clone()
}

/// Checks whether the password is, or contains, a listed common password.
///
/// Matching is case-insensitive. The substring policy is deliberate:
/// `password123` must be caught, not just `password`. Returns `false` if
/// the wordlist is not initialized.
pub fn contains_dictionary_word(password: &str) -> bool {
    let guard = COMMON_PASSWORDS.read().unwrap();
    let Some(wordlist) = guard.as_ref() else {
        return false;
    };

    let lowered = password.to_lowercase();
    if wordlist.contains(&lowered) {
        return true;
    }
    wordlist
        .iter()
        .any(|word| word.len() >= MIN_SUBSTRING_LEN && lowered.contains(word.as_str()))
}

/// Resets the wordlist for testing purposes.
#[cfg(test)]
pub fn reset_wordlist_for_testing() {
    let mut guard = COMMON_PASSWORDS.write().unwrap();
    *guard = None;
}
