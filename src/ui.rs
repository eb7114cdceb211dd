//! HUD state and game-over bookkeeping
//!
//! Watches snapshots for the running -> game-over edge and records the run in
//! the score store. Store failures are logged here and go no further.

use crate::highscores::ScoreStore;
use crate::sim::GameState;

/// Shareable link for a finished run
pub fn share_url(base: &str, score: u64) -> String {
    format!("{base}?score={score}")
}

/// What the overlay and score labels show
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hud {
    pub game_started: bool,
    pub game_over: bool,
    pub current_score: u64,
    pub highscore: u64,
    pub share_url: Option<String>,
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a new run. Call before starting the engine.
    pub fn start(&mut self) {
        self.game_started = true;
        self.game_over = false;
        self.current_score = 0;
        self.share_url = None;
    }

    /// Track a snapshot. Returns the final score once per game-over edge.
    pub fn observe(&mut self, state: &GameState) -> Option<u64> {
        self.current_score = state.score;
        if state.game_over && !self.game_over {
            self.game_over = true;
            self.game_started = false;
            return Some(state.score);
        }
        None
    }

    /// Refresh the displayed best score
    pub fn refresh_highscore(&mut self, store: &impl ScoreStore) {
        match store.highscore() {
            Ok(best) => self.highscore = best,
            Err(e) => log::warn!("Could not read highscore: {e}"),
        }
    }

    /// Save a finished run, update the best score and build the share link
    pub fn record_game_over(
        &mut self,
        score: u64,
        timestamp: f64,
        store: &mut impl ScoreStore,
        base_url: &str,
    ) {
        if let Err(e) = store.append(score, timestamp) {
            log::warn!("Could not save score {score}: {e}");
        }
        self.refresh_highscore(store);
        self.share_url = Some(share_url(base_url, score));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::{HighScoreEntry, ScoreLog};
    use crate::persistence::StoreError;

    /// Store whose backend is always down
    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn append(&mut self, _score: u64, _timestamp: f64) -> Result<u64, StoreError> {
            Err(StoreError::Unavailable)
        }
        fn highscore(&self) -> Result<u64, StoreError> {
            Err(StoreError::Unavailable)
        }
        fn top_scores(&self) -> Result<Vec<HighScoreEntry>, StoreError> {
            Err(StoreError::Unavailable)
        }
    }

    fn over(score: u64) -> GameState {
        GameState {
            running: false,
            game_over: true,
            score,
            ..GameState::new()
        }
    }

    #[test]
    fn test_share_url() {
        assert_eq!(
            share_url("https://example.com/play", 300),
            "https://example.com/play?score=300"
        );
    }

    #[test]
    fn test_game_over_edge_fires_once() {
        let mut hud = Hud::new();
        hud.start();
        assert_eq!(hud.observe(&GameState::fresh_run()), None);
        assert_eq!(hud.observe(&over(400)), Some(400));
        assert_eq!(hud.observe(&over(400)), None);
        assert!(hud.game_over);
        assert!(!hud.game_started);

        hud.start();
        assert_eq!(hud.observe(&GameState::fresh_run()), None);
        assert_eq!(hud.observe(&over(100)), Some(100));
    }

    #[test]
    fn test_record_game_over() {
        let mut hud = Hud::new();
        let mut store = ScoreLog::new();
        store.append(900, 0.0).unwrap();

        hud.record_game_over(300, 1.0, &mut store, "http://localhost/");
        assert_eq!(store.len(), 2);
        assert_eq!(hud.highscore, 900);
        assert_eq!(hud.share_url.as_deref(), Some("http://localhost/?score=300"));
    }

    #[test]
    fn test_store_failure_is_swallowed() {
        let mut hud = Hud::new();
        hud.highscore = 50;
        hud.record_game_over(300, 1.0, &mut BrokenStore, "http://x/");
        assert_eq!(hud.highscore, 50);
        assert!(hud.share_url.is_some());
    }
}
