//! Cumulative play statistics

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifetime play statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatistics {
    /// Number of completed plays
    pub total_play_count: u32,
    /// Total play time in seconds
    pub total_play_time: f64,
    pub perfect_count: u64,
    pub good_count: u64,
    pub ok_count: u64,
    pub miss_count: u64,
    /// Best combo across all plays
    pub max_combo: u32,
    /// Running average accuracy, weighted equally per play
    pub average_accuracy: f64,
    /// Plays per song ID
    pub song_play_counts: BTreeMap<String, u32>,
}

/// Outcome of a single play, fed into the statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaySession {
    pub song_id: String,
    /// Seconds spent in the song
    pub play_time: f64,
    pub perfect: u32,
    pub good: u32,
    pub ok: u32,
    pub miss: u32,
    pub max_combo: u32,
    pub accuracy: f64,
}

impl PlayerStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one play into the counters and the running average.
    ///
    /// Counters saturate. A non-finite play time or accuracy counts as 0 so the
    /// record always serializes to plain numbers.
    pub fn record_session(&mut self, session: &PlaySession) {
        let count = self
            .song_play_counts
            .entry(session.song_id.clone())
            .or_insert(0);
        *count = count.saturating_add(1);

        self.total_play_count = self.total_play_count.saturating_add(1);
        self.total_play_time = finite_sum(self.total_play_time, finite_or_zero(session.play_time));

        self.perfect_count = self.perfect_count.saturating_add(u64::from(session.perfect));
        self.good_count = self.good_count.saturating_add(u64::from(session.good));
        self.ok_count = self.ok_count.saturating_add(u64::from(session.ok));
        self.miss_count = self.miss_count.saturating_add(u64::from(session.miss));

        if session.max_combo > self.max_combo {
            self.max_combo = session.max_combo;
        }

        let accuracy = finite_or_zero(session.accuracy);
        let n = f64::from(self.total_play_count);
        let old_weight = (n - 1.0) / n;
        let new_weight = 1.0 / n;
        let average = self.average_accuracy * old_weight + accuracy * new_weight;
        if average.is_finite() {
            self.average_accuracy = average;
        }
    }

    /// Plays recorded for one song
    pub fn song_play_count(&self, song_id: &str) -> u32 {
        self.song_play_counts.get(song_id).copied().unwrap_or(0)
    }

    /// Total judged notes across all plays
    pub fn total_notes(&self) -> u64 {
        self.perfect_count
            .saturating_add(self.good_count)
            .saturating_add(self.ok_count)
            .saturating_add(self.miss_count)
    }
}

/// Replace NaN and infinities with 0
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// `a + b`, clamped to the finite range
fn finite_sum(a: f64, b: f64) -> f64 {
    (a + b).clamp(f64::MIN, f64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(song_id: &str, accuracy: f64, max_combo: u32) -> PlaySession {
        PlaySession {
            song_id: song_id.to_string(),
            play_time: 120.0,
            perfect: 80,
            good: 10,
            ok: 5,
            miss: 5,
            max_combo,
            accuracy,
        }
    }

    #[test]
    fn test_record_session_counters() {
        let mut stats = PlayerStatistics::new();
        stats.record_session(&session("a", 90.0, 40));
        stats.record_session(&session("a", 80.0, 25));
        stats.record_session(&session("b", 70.0, 60));

        assert_eq!(stats.total_play_count, 3);
        assert_eq!(stats.total_play_time, 360.0);
        assert_eq!(stats.perfect_count, 240);
        assert_eq!(stats.miss_count, 15);
        assert_eq!(stats.total_notes(), 300);
        assert_eq!(stats.max_combo, 60);
        assert_eq!(stats.song_play_count("a"), 2);
        assert_eq!(stats.song_play_count("b"), 1);
        assert_eq!(stats.song_play_count("missing"), 0);
    }

    #[test]
    fn test_running_average_matches_mean() {
        let mut stats = PlayerStatistics::new();
        let samples = [90.0, 80.0, 70.0, 100.0];
        for acc in samples {
            stats.record_session(&session("a", acc, 0));
        }

        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        assert!((stats.average_accuracy - mean).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_inputs_count_as_zero() {
        let mut stats = PlayerStatistics::new();
        stats.record_session(&session("a", 90.0, 10));
        stats.record_session(&session("a", 90.0, 10));

        let mut broken = session("a", f64::NAN, 10);
        broken.play_time = f64::INFINITY;
        stats.record_session(&broken);

        assert_eq!(stats.total_play_count, 3);
        assert_eq!(stats.total_play_time, 240.0);
        assert!((stats.average_accuracy - 60.0).abs() < 1e-9);

        let json = serde_json::to_string(&stats).unwrap();
        assert!(!json.contains("null"));
        let reparsed: PlayerStatistics = serde_json::from_str(&json).unwrap();
        assert_eq!(reparsed, stats);
    }

    #[test]
    fn test_huge_play_time_stays_finite() {
        let mut stats = PlayerStatistics::new();
        let mut long = session("a", 50.0, 0);
        long.play_time = f64::MAX;
        stats.record_session(&long);
        stats.record_session(&long);
        assert_eq!(stats.total_play_time, f64::MAX);
    }

    #[test]
    fn test_counters_saturate() {
        let mut stats = PlayerStatistics {
            total_play_count: u32::MAX,
            perfect_count: u64::MAX,
            miss_count: u64::MAX - 1,
            ..PlayerStatistics::default()
        };
        stats.song_play_counts.insert("a".to_string(), u32::MAX);

        stats.record_session(&session("a", 80.0, 5));

        assert_eq!(stats.total_play_count, u32::MAX);
        assert_eq!(stats.perfect_count, u64::MAX);
        assert_eq!(stats.miss_count, u64::MAX);
        assert_eq!(stats.good_count, 10);
        assert_eq!(stats.song_play_count("a"), u32::MAX);
        assert_eq!(stats.total_notes(), u64::MAX);
        assert!(stats.average_accuracy.is_finite());
    }

    #[test]
    fn test_first_session_sets_average() {
        let mut stats = PlayerStatistics::new();
        stats.record_session(&session("a", 87.5, 0));
        assert_eq!(stats.average_accuracy, 87.5);
    }
}
