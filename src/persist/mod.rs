//! # Persistence Module
//!
//! Durable storage for the single high-score value. The save is a small
//! versioned JSON file written with a temp-file-and-rename so a crash mid
//! write never corrupts the previous best. Any read or write failure
//! degrades the store to in-memory for the rest of the process; gameplay
//! never sees a persistence error.

use crate::{MunchError, MunchResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub(crate) const SAVE_VERSION: u32 = 1;

/// File name of the high-score save under the data directory.
const SAVE_FILE_NAME: &str = "high-score.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SaveFile {
    version: u32,
    best: u32,
}

/// Owns the best score across sessions and the file it lives in.
///
/// # Examples
///
/// ```
/// use moodmunch::HighScoreStore;
///
/// let mut store = HighScoreStore::in_memory();
/// assert_eq!(store.best(), 0);
/// store.record(60);
/// assert_eq!(store.best(), 60);
/// ```
#[derive(Debug)]
pub struct HighScoreStore {
    path: Option<PathBuf>,
    best: u32,
}

impl HighScoreStore {
    /// Opens the store at the platform data directory.
    ///
    /// Falls back to an in-memory store when no data directory can be
    /// resolved for the current user.
    pub fn open_default() -> Self {
        match directories::ProjectDirs::from("", "", "moodmunch") {
            Some(dirs) => Self::open(dirs.data_dir().join(SAVE_FILE_NAME)),
            None => {
                log::warn!("no data directory available, high score will not persist");
                Self::in_memory()
            }
        }
    }

    /// Opens the store backed by an explicit file path.
    ///
    /// An absent, unreadable, or unparseable file reads as a best of 0.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let best = Self::read_best(&path);
        Self {
            path: Some(path),
            best,
        }
    }

    /// Opens a store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            best: 0,
        }
    }

    /// The best score seen so far.
    pub fn best(&self) -> u32 {
        self.best
    }

    /// Records a final score, persisting it when it beats the current best.
    ///
    /// Returns whether the score became the new best. A failed write logs a
    /// warning and drops the store to in-memory for the rest of the process.
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;

        if let Some(path) = self.path.clone() {
            if let Err(err) = self.write(&path) {
                log::warn!(
                    "failed to persist high score to {}: {}, keeping it in memory",
                    path.display(),
                    err
                );
                self.path = None;
            }
        }
        true
    }

    fn read_best(path: &Path) -> u32 {
        let Ok(data) = fs::read_to_string(path) else {
            return 0;
        };
        match serde_json::from_str::<SaveFile>(&data) {
            Ok(save) => save.best,
            Err(err) => {
                log::warn!("unreadable high score file {}: {}", path.display(), err);
                0
            }
        }
    }

    fn write(&self, path: &Path) -> MunchResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let save = SaveFile {
            version: SAVE_VERSION,
            best: self.best,
        };
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&save)?)?;
        fs::rename(&tmp, path).map_err(MunchError::from)
    }
}
