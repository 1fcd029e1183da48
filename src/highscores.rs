//! Per-game best score
//!
//! Persisted under a game-specific key, updated only when beaten.

use crate::persistence::{SharedStore, read_number, write_number};

/// Best score for one game
pub struct HighScore {
    key: &'static str,
    best: u64,
    store: SharedStore,
}

impl HighScore {
    /// Load the stored best (0 when absent or malformed)
    pub fn load(store: SharedStore, key: &'static str) -> Self {
        let best = read_number(&*store.borrow(), key, 0);
        Self { key, best, store }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Record a score. Persists and returns true only if it beats the best.
    pub fn submit(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        write_number(&mut *self.store.borrow_mut(), self.key, score);
        log::debug!("High score {} persisted for {}", score, self.key);
        true
    }

    /// Whether a final score deserves the "new high score" flag
    ///
    /// The best is kept in step with the running score, so a final score
    /// equal to the best means this run set (or tied) the record.
    pub fn is_record(&self, score: u64) -> bool {
        score > 0 && score >= self.best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, ScoreStore, keys};

    #[test]
    fn test_submit_only_persists_improvements() {
        let store = MemoryStore::shared();
        let mut hs = HighScore::load(store.clone(), keys::SNAKE_HIGH_SCORE);
        assert_eq!(hs.best(), 0);

        assert!(hs.submit(30));
        assert!(!hs.submit(20));
        assert!(!hs.submit(30));
        assert_eq!(store.borrow().get(keys::SNAKE_HIGH_SCORE).as_deref(), Some("30"));

        let reloaded = HighScore::load(store, keys::SNAKE_HIGH_SCORE);
        assert_eq!(reloaded.best(), 30);
    }

    #[test]
    fn test_malformed_store_value_reads_as_zero() {
        let store = MemoryStore::shared();
        store.borrow_mut().set(keys::BREAKOUT_HIGH_SCORE, "garbage");
        let hs = HighScore::load(store, keys::BREAKOUT_HIGH_SCORE);
        assert_eq!(hs.best(), 0);
    }

    #[test]
    fn test_is_record() {
        let store = MemoryStore::shared();
        let mut hs = HighScore::load(store, keys::BREAKOUT_HIGH_SCORE);
        assert!(!hs.is_record(0));
        hs.submit(50);
        assert!(hs.is_record(50));
        assert!(!hs.is_record(40));
    }
}
