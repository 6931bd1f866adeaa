//! Persistent record types
//!
//! Settings, statistics and high scores, plus the merge used when loading
//! records over their defaults. Progress lives in [`crate::progression`].

pub mod settings;
pub mod statistics;
pub mod high_scores;
pub mod merge;

pub use settings::{PlayerSettings, SettingsUpdate};
pub use statistics::{PlaySession, PlayerStatistics};
pub use high_scores::{HighScoreEntry, HighScores, ScoreSubmission};
pub use merge::{merge_over_defaults, merge_value_over_defaults};
