//! Score history
//!
//! Every finished run is appended with an auto-incremented id. Readers ask for
//! the best score or the top 10 entries.

use serde::{Deserialize, Serialize};

use crate::persistence::{Storage, StoreError, load_json, save_json};

/// Maximum number of entries returned by `top_scores`
pub const MAX_HIGH_SCORES: usize = 10;

/// A single finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Auto-incremented, starting at 1
    pub id: u64,
    pub score: u64,
    /// Unix timestamp (ms) when the run ended
    pub timestamp: f64,
}

/// Append-only score table
pub trait ScoreStore {
    /// Record a run, returning its id
    fn append(&mut self, score: u64, timestamp: f64) -> Result<u64, StoreError>;
    /// Best score so far, 0 when empty
    fn highscore(&self) -> Result<u64, StoreError>;
    /// Up to `MAX_HIGH_SCORES` entries, best first; equal scores newest first
    fn top_scores(&self) -> Result<Vec<HighScoreEntry>, StoreError>;
}

/// In-memory score table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreLog {
    entries: Vec<HighScoreEntry>,
    next_id: u64,
}

impl Default for ScoreLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, score: u64, timestamp: f64) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(HighScoreEntry {
            id,
            score,
            timestamp,
        });
        id
    }

    fn ranked(&self) -> Vec<HighScoreEntry> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.score.cmp(&a.score).then(b.id.cmp(&a.id)));
        ranked.truncate(MAX_HIGH_SCORES);
        ranked
    }
}

impl ScoreStore for ScoreLog {
    fn append(&mut self, score: u64, timestamp: f64) -> Result<u64, StoreError> {
        Ok(self.push(score, timestamp))
    }

    fn highscore(&self) -> Result<u64, StoreError> {
        Ok(self.entries.iter().map(|e| e.score).max().unwrap_or(0))
    }

    fn top_scores(&self) -> Result<Vec<HighScoreEntry>, StoreError> {
        Ok(self.ranked())
    }
}

/// Score table mirrored to a key-value store as JSON
pub struct PersistentScoreStore<S: Storage> {
    storage: S,
    log: ScoreLog,
}

impl<S: Storage> PersistentScoreStore<S> {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "jump_and_run_highscores";

    /// Load the saved table; unreadable data starts a fresh one
    pub fn load(storage: S) -> Self {
        let log = match load_json::<ScoreLog>(&storage, Self::STORAGE_KEY) {
            Ok(Some(log)) => {
                log::info!("Loaded {} scores", log.len());
                log
            }
            Ok(None) => {
                log::info!("No scores found, starting fresh");
                ScoreLog::new()
            }
            Err(e) => {
                log::warn!("Discarding unreadable scores: {e}");
                ScoreLog::new()
            }
        };
        Self { storage, log }
    }

    pub fn log(&self) -> &ScoreLog {
        &self.log
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: Storage> ScoreStore for PersistentScoreStore<S> {
    /// The entry is kept in memory even when the write fails
    fn append(&mut self, score: u64, timestamp: f64) -> Result<u64, StoreError> {
        let id = self.log.push(score, timestamp);
        save_json(&mut self.storage, Self::STORAGE_KEY, &self.log)?;
        log::info!("Score {score} saved as #{id}");
        Ok(id)
    }

    fn highscore(&self) -> Result<u64, StoreError> {
        self.log.highscore()
    }

    fn top_scores(&self) -> Result<Vec<HighScoreEntry>, StoreError> {
        self.log.top_scores()
    }
}

/// Format a timestamp relative to `now` (both Unix ms)
pub fn format_age(now: f64, timestamp: f64) -> String {
    let diff_mins = (now - timestamp) / 60_000.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        match diff_days.floor() as i64 {
            1 => "Yesterday".to_string(),
            days => format!("{days} days ago"),
        }
    } else if diff_hours >= 1.0 {
        match diff_hours.floor() as i64 {
            1 => "1 hour ago".to_string(),
            hours => format!("{hours} hours ago"),
        }
    } else if diff_mins >= 1.0 {
        match diff_mins.floor() as i64 {
            1 => "1 min ago".to_string(),
            mins => format!("{mins} mins ago"),
        }
    } else {
        "Just now".to_string()
    }
}
