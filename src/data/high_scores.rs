//! Per-song high scores
//!
//! One best entry per song ID, replaced only by a strictly higher score.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::statistics::finite_or_zero;

/// Best recorded performance on a single song
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighScoreEntry {
    pub score: u64,
    pub accuracy: f64,
    pub max_combo: u32,
    pub perfect: u32,
    pub good: u32,
    pub ok: u32,
    pub miss: u32,
    /// Unix timestamp (ms) when achieved
    pub date: u64,
}

/// A finished play offered to the high score table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreSubmission {
    pub score: u64,
    pub accuracy: f64,
    pub max_combo: u32,
    pub perfect: u32,
    pub good: u32,
    pub ok: u32,
    pub miss: u32,
}

impl ScoreSubmission {
    fn into_entry(self, date: u64) -> HighScoreEntry {
        HighScoreEntry {
            score: self.score,
            // Non-finite accuracy would serialize as null
            accuracy: finite_or_zero(self.accuracy),
            max_combo: self.max_combo,
            perfect: self.perfect,
            good: self.good,
            ok: self.ok,
            miss: self.miss,
            date,
        }
    }
}

/// High score table keyed by song ID
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: BTreeMap<String, HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, song_id: &str) -> Option<&HighScoreEntry> {
        self.entries.get(song_id)
    }

    /// Check if a score would replace the stored entry
    pub fn qualifies(&self, song_id: &str, score: u64) -> bool {
        self.get(song_id).map_or(true, |best| score > best.score)
    }

    /// Record a submission if it beats the stored score.
    /// Returns true if it became the new high score.
    pub fn submit(&mut self, song_id: &str, submission: ScoreSubmission, date: u64) -> bool {
        if !self.qualifies(song_id, submission.score) {
            return false;
        }
        self.entries
            .insert(song_id.to_string(), submission.into_entry(date));
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(score: u64) -> ScoreSubmission {
        ScoreSubmission {
            score,
            accuracy: 95.0,
            max_combo: 120,
            perfect: 100,
            good: 15,
            ok: 4,
            miss: 1,
        }
    }

    #[test]
    fn test_first_submission_is_high_score() {
        let mut scores = HighScores::new();
        assert!(scores.submit("song", submission(1000), 1));
        assert_eq!(scores.get("song").unwrap().score, 1000);
        assert_eq!(scores.len(), 1);
    }

    #[test]
    fn test_lower_or_equal_score_is_rejected() {
        let mut scores = HighScores::new();
        scores.submit("song", submission(1000), 1);

        assert!(!scores.submit("song", submission(999), 2));
        assert!(!scores.submit("song", submission(1000), 3));

        let entry = scores.get("song").unwrap();
        assert_eq!(entry.score, 1000);
        assert_eq!(entry.date, 1);
    }

    #[test]
    fn test_higher_score_replaces_entry() {
        let mut scores = HighScores::new();
        scores.submit("song", submission(1000), 1);

        let mut better = submission(1500);
        better.accuracy = 80.0; // only the raw score is compared
        assert!(scores.submit("song", better, 9));

        let entry = scores.get("song").unwrap();
        assert_eq!(entry.score, 1500);
        assert_eq!(entry.accuracy, 80.0);
        assert_eq!(entry.date, 9);
    }

    #[test]
    fn test_non_finite_accuracy_is_stored_as_zero() {
        let mut scores = HighScores::new();
        let mut broken = submission(500);
        broken.accuracy = f64::NAN;
        assert!(scores.submit("song", broken, 1));
        assert_eq!(scores.get("song").unwrap().accuracy, 0.0);

        let json = serde_json::to_string(&scores).unwrap();
        let reparsed: HighScores = serde_json::from_str(&json).unwrap();
        assert_eq!(reparsed, scores);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut scores = HighScores::new();
        scores.submit("song", submission(10), 5);
        let json = serde_json::to_value(&scores).unwrap();
        assert_eq!(json["song"]["maxCombo"], 120);
        assert_eq!(json["song"]["date"], 5);
    }
}
