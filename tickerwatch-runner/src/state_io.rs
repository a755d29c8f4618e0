//! Wholesale load/save of the dedup state and the recap store.
//!
//! Reads degrade: a missing or corrupt document is an empty default — the
//! monitor must never die over its own scratch files. Writes report
//! [`StorageError`], which callers log and survive.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tickerwatch_core::dedup::AlertState;
use tickerwatch_core::recap::RecapBook;
use tracing::warn;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("write {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("serialize {}: {}", .path.display(), .source)]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("remove {}: {}", .path.display(), .source)]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Load the dedup state for `today`. Missing, unreadable, or corrupt files
/// and state stored under any other date all come back as a fresh empty
/// state.
pub fn load_alert_state(path: &Path, today: NaiveDate) -> AlertState {
    match std::fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str::<AlertState>(&raw) {
            Ok(state) => state.for_date(today),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt alert state, starting fresh");
                AlertState::new(today)
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => AlertState::new(today),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable alert state, starting fresh");
            AlertState::new(today)
        }
    }
}

pub fn save_alert_state(path: &Path, state: &AlertState) -> Result<(), StorageError> {
    save_json(path, state)
}

/// Load the recap store. Missing or corrupt files come back empty.
pub fn load_recap_book(path: &Path) -> RecapBook {
    match std::fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str::<RecapBook>(&raw) {
            Ok(book) => book,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt recap store, starting empty");
                RecapBook::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => RecapBook::default(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable recap store, starting empty");
            RecapBook::default()
        }
    }
}

pub fn save_recap_book(path: &Path, book: &RecapBook) -> Result<(), StorageError> {
    save_json(path, book)
}

/// Remove a file if present; `Ok(false)` when there was nothing to remove.
pub fn remove_if_exists(path: &Path) -> Result<bool, StorageError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(StorageError::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub(crate) fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let raw = serde_json::to_string_pretty(value).map_err(|source| StorageError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, raw).map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })
}
