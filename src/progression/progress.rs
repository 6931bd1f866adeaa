//! Player progress
//!
//! Level, experience, currencies and content unlocks that carry between sessions.

use serde::{Deserialize, Serialize};

use super::xp::level_for_exp;

/// Persistent player progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProgress {
    /// Current level, derived from `exp` and never lowered
    pub level: u32,
    /// Total experience earned
    pub exp: u64,
    /// Soft currency
    pub coins: u64,
    /// Premium currency
    pub gems: u64,
    /// Unlocked song IDs, in unlock order
    pub unlocked_songs: Vec<String>,
    /// Completed tutorial IDs, in completion order
    pub completed_tutorials: Vec<String>,
}

impl Default for PlayerProgress {
    fn default() -> Self {
        Self {
            level: 1,
            exp: 0,
            coins: 0,
            gems: 0,
            unlocked_songs: Vec::new(),
            completed_tutorials: Vec::new(),
        }
    }
}

/// Result of granting experience
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelChange {
    pub old_level: u32,
    pub new_level: u32,
}

impl LevelChange {
    pub fn leveled_up(&self) -> bool {
        self.new_level > self.old_level
    }
}

impl PlayerProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add experience and raise the level if the curve allows it.
    ///
    /// Returns `None` when `amount` is not positive (nothing changes).
    pub fn add_experience(&mut self, amount: i64) -> Option<LevelChange> {
        if amount <= 0 {
            return None;
        }

        self.exp = self.exp.saturating_add(amount.unsigned_abs());

        let old_level = self.level;
        let computed = level_for_exp(self.exp);
        if computed > self.level {
            self.level = computed;
        }

        Some(LevelChange {
            old_level,
            new_level: self.level,
        })
    }

    /// Apply a signed delta to the coin balance, clamping at zero
    pub fn adjust_coins(&mut self, delta: i64) -> u64 {
        self.coins = apply_delta(self.coins, delta);
        self.coins
    }

    /// Apply a signed delta to the gem balance, clamping at zero
    pub fn adjust_gems(&mut self, delta: i64) -> u64 {
        self.gems = apply_delta(self.gems, delta);
        self.gems
    }

    pub fn is_song_unlocked(&self, song_id: &str) -> bool {
        self.unlocked_songs.iter().any(|s| s == song_id)
    }

    /// Unlock a song. Returns false if it was already unlocked.
    pub fn unlock_song(&mut self, song_id: &str) -> bool {
        if self.is_song_unlocked(song_id) {
            return false;
        }
        self.unlocked_songs.push(song_id.to_string());
        true
    }

    pub fn is_tutorial_completed(&self, tutorial_id: &str) -> bool {
        self.completed_tutorials.iter().any(|t| t == tutorial_id)
    }

    /// Mark a tutorial as completed. Returns false if it already was.
    pub fn complete_tutorial(&mut self, tutorial_id: &str) -> bool {
        if self.is_tutorial_completed(tutorial_id) {
            return false;
        }
        self.completed_tutorials.push(tutorial_id.to_string());
        true
    }
}

fn apply_delta(balance: u64, delta: i64) -> u64 {
    if delta >= 0 {
        balance.saturating_add(delta.unsigned_abs())
    } else {
        balance.saturating_sub(delta.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_experience_levels_up() {
        let mut progress = PlayerProgress::new();
        let change = progress.add_experience(400).unwrap();

        assert!(change.leveled_up());
        assert_eq!(change.old_level, 1);
        assert_eq!(progress.level, 3);
        assert_eq!(progress.exp, 400);
    }

    #[test]
    fn test_add_experience_ignores_non_positive() {
        let mut progress = PlayerProgress::new();
        assert!(progress.add_experience(0).is_none());
        assert!(progress.add_experience(-50).is_none());
        assert_eq!(progress, PlayerProgress::default());
    }

    #[test]
    fn test_level_never_decreases() {
        // A level ahead of the curve (e.g. granted by an older build) is kept
        let mut progress = PlayerProgress {
            level: 10,
            ..PlayerProgress::default()
        };
        let change = progress.add_experience(100).unwrap();

        assert!(!change.leveled_up());
        assert_eq!(progress.level, 10);
    }

    #[test]
    fn test_currency_clamps_at_zero() {
        let mut progress = PlayerProgress::new();
        assert_eq!(progress.adjust_coins(50), 50);
        assert_eq!(progress.adjust_coins(-20), 30);
        assert_eq!(progress.adjust_coins(-100), 0);
        assert_eq!(progress.adjust_gems(i64::MIN), 0);
        assert_eq!(progress.adjust_gems(7), 7);
    }

    #[test]
    fn test_unlock_song_is_idempotent() {
        let mut progress = PlayerProgress::new();
        assert!(progress.unlock_song("canon"));
        assert!(!progress.unlock_song("canon"));
        assert_eq!(progress.unlocked_songs, vec!["canon".to_string()]);
    }

    #[test]
    fn test_complete_tutorial() {
        let mut progress = PlayerProgress::new();
        assert!(!progress.is_tutorial_completed("basics"));
        assert!(progress.complete_tutorial("basics"));
        assert!(!progress.complete_tutorial("basics"));
        assert!(progress.is_tutorial_completed("basics"));
    }
}
