//! Tapkeep - persistent player data for a tile-tapping rhythm game
//!
//! Settings, progress, statistics and per-song high scores, each kept as a
//! JSON record in host-supplied key-value storage.

pub mod config;
pub mod data;
pub mod progression;
pub mod save;

// Re-export commonly used types
pub use config::StoreConfig;
pub use data::{
    HighScoreEntry, HighScores, PlaySession, PlayerSettings, PlayerStatistics, ScoreSubmission,
    SettingsUpdate,
};
pub use progression::PlayerProgress;
pub use save::{FileStorage, KeyValueStorage, MemoryStorage, PlayerDataStore, RecordGroup};
