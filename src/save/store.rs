//! Player data store
//!
//! Owns the four record groups, loads them from key-value storage over their
//! defaults and writes a group back every time it changes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use super::snapshot::DataSnapshot;
use super::storage::{KeyValueStorage, StorageError};
use crate::config::StoreConfig;
use crate::data::{
    merge_over_defaults, HighScoreEntry, HighScores, PlaySession, PlayerSettings,
    PlayerStatistics, ScoreSubmission, SettingsUpdate,
};
use crate::progression::PlayerProgress;

/// Key prefix used by the shipped game
pub const DEFAULT_KEY_PREFIX: &str = "magicTiles";

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One of the independently persisted record groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordGroup {
    Settings,
    Progress,
    Statistics,
    HighScores,
}

impl RecordGroup {
    pub const ALL: [RecordGroup; 4] = [
        RecordGroup::Settings,
        RecordGroup::Progress,
        RecordGroup::Statistics,
        RecordGroup::HighScores,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordGroup::Settings => "settings",
            RecordGroup::Progress => "progress",
            RecordGroup::Statistics => "statistics",
            RecordGroup::HighScores => "highScores",
        }
    }
}

/// Error for a record group name that matches no group
#[derive(Debug, Error)]
#[error("unknown record group `{0}`")]
pub struct UnknownRecordGroup(pub String);

impl FromStr for RecordGroup {
    type Err = UnknownRecordGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "settings" => Ok(RecordGroup::Settings),
            "progress" => Ok(RecordGroup::Progress),
            "statistics" | "stats" => Ok(RecordGroup::Statistics),
            "highscores" | "high_scores" | "high-scores" | "scores" => {
                Ok(RecordGroup::HighScores)
            }
            _ => Err(UnknownRecordGroup(s.to_string())),
        }
    }
}

impl fmt::Display for RecordGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage keys of the four record groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub settings: String,
    pub progress: String,
    pub statistics: String,
    pub high_scores: String,
}

impl StorageKeys {
    /// Keys of the form `<prefix>_settings`, `<prefix>_highScores`, ...
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            settings: format!("{}_settings", prefix),
            progress: format!("{}_progress", prefix),
            statistics: format!("{}_statistics", prefix),
            high_scores: format!("{}_highScores", prefix),
        }
    }

    pub fn key(&self, group: RecordGroup) -> &str {
        match group {
            RecordGroup::Settings => &self.settings,
            RecordGroup::Progress => &self.progress,
            RecordGroup::Statistics => &self.statistics,
            RecordGroup::HighScores => &self.high_scores,
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }
}

/// Source of high score timestamps (ms since the Unix epoch)
pub type Clock = Box<dyn Fn() -> u64>;

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

#[derive(Default)]
struct Listeners {
    settings_changed: Option<Box<dyn FnMut(&PlayerSettings)>>,
    progress_changed: Option<Box<dyn FnMut(&PlayerProgress)>>,
    coins_changed: Option<Box<dyn FnMut(u64)>>,
}

/// Persistent player data backed by key-value storage.
///
/// Construct one per player and pass it to whatever needs it. Mutators write
/// the touched group immediately; write failures are logged and the in-memory
/// state is kept.
pub struct PlayerDataStore<S: KeyValueStorage> {
    storage: S,
    keys: StorageKeys,
    pretty_json: bool,
    clock: Clock,

    settings: PlayerSettings,
    progress: PlayerProgress,
    statistics: PlayerStatistics,
    high_scores: HighScores,

    listeners: Listeners,
}

impl<S: KeyValueStorage> fmt::Debug for PlayerDataStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerDataStore")
            .field("keys", &self.keys)
            .field("settings", &self.settings)
            .field("progress", &self.progress)
            .field("statistics", &self.statistics)
            .field("high_scores", &self.high_scores)
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStorage> PlayerDataStore<S> {
    /// Create a store holding defaults. Call [`load`](Self::load) to read storage.
    pub fn new(storage: S) -> Self {
        Self::with_keys(storage, StorageKeys::default())
    }

    /// Create a store using custom storage keys
    pub fn with_keys(storage: S, keys: StorageKeys) -> Self {
        Self {
            storage,
            keys,
            pretty_json: false,
            clock: Box::new(unix_millis),
            settings: PlayerSettings::default(),
            progress: PlayerProgress::default(),
            statistics: PlayerStatistics::default(),
            high_scores: HighScores::default(),
            listeners: Listeners::default(),
        }
    }

    /// Create a store configured from a [`StoreConfig`]
    pub fn with_config(storage: S, config: &StoreConfig) -> Self {
        let mut store = Self::with_keys(storage, config.storage_keys());
        store.pretty_json = config.pretty_json;
        store
    }

    /// Create a store and load all groups
    pub fn open(storage: S) -> Self {
        let mut store = Self::new(storage);
        store.load();
        store
    }

    /// Replace the timestamp source
    pub fn set_clock(&mut self, clock: impl Fn() -> u64 + 'static) {
        self.clock = Box::new(clock);
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // ========================================================================
    // Load / save
    // ========================================================================

    /// Load every group from storage over its defaults
    pub fn load(&mut self) {
        self.settings = load_merged(&self.storage, &self.keys.settings, PlayerSettings::default());
        self.progress = load_merged(&self.storage, &self.keys.progress, PlayerProgress::default());
        self.statistics =
            load_merged(&self.storage, &self.keys.statistics, PlayerStatistics::default());
        self.high_scores = load_high_scores(&self.storage, &self.keys.high_scores);

        log::info!(
            "Player data loaded (level {}, {} unlocked songs, {} high scores)",
            self.progress.level,
            self.progress.unlocked_songs.len(),
            self.high_scores.len()
        );
    }

    /// Write one group, logging any failure
    pub fn save(&mut self, group: RecordGroup) {
        if let Err(e) = self.try_save(group) {
            log::error!("Failed to save {} data: {}", group, e);
        }
    }

    /// Write one group, returning any failure to the caller
    pub fn try_save(&mut self, group: RecordGroup) -> Result<(), StoreError> {
        let json = match group {
            RecordGroup::Settings => self.encode(&self.settings)?,
            RecordGroup::Progress => self.encode(&self.progress)?,
            RecordGroup::Statistics => self.encode(&self.statistics)?,
            RecordGroup::HighScores => self.encode(&self.high_scores)?,
        };
        self.storage.set(self.keys.key(group), &json)?;
        Ok(())
    }

    /// Write all groups
    pub fn save_all(&mut self) {
        for group in RecordGroup::ALL {
            self.save(group);
        }
        log::info!("All player data saved");
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<String, serde_json::Error> {
        if self.pretty_json {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
    }

    // ========================================================================
    // Settings
    // ========================================================================

    pub fn settings(&self) -> PlayerSettings {
        self.settings.clone()
    }

    /// Apply a partial settings change and persist it
    pub fn update_settings(&mut self, update: SettingsUpdate) {
        self.settings.apply(update);
        self.save(RecordGroup::Settings);

        if let Some(listener) = self.listeners.settings_changed.as_mut() {
            listener(&self.settings);
        }
    }

    // ========================================================================
    // Progress
    // ========================================================================

    pub fn progress(&self) -> PlayerProgress {
        self.progress.clone()
    }

    /// Grant experience. Returns true if the player leveled up.
    ///
    /// Non-positive amounts are ignored.
    pub fn add_experience(&mut self, amount: i64) -> bool {
        let Some(change) = self.progress.add_experience(amount) else {
            return false;
        };

        if change.leveled_up() {
            log::info!(
                "Player leveled up from {} to {}",
                change.old_level,
                change.new_level
            );
        }

        self.save(RecordGroup::Progress);
        self.notify_progress();
        change.leveled_up()
    }

    /// Add or subtract coins (never below zero). Returns the new balance.
    pub fn update_coins(&mut self, delta: i64) -> u64 {
        let coins = self.progress.adjust_coins(delta);
        self.save(RecordGroup::Progress);

        if let Some(listener) = self.listeners.coins_changed.as_mut() {
            listener(coins);
        }
        coins
    }

    /// Add or subtract gems (never below zero). Returns the new balance.
    pub fn update_gems(&mut self, delta: i64) -> u64 {
        let gems = self.progress.adjust_gems(delta);
        self.save(RecordGroup::Progress);
        gems
    }

    pub fn is_song_unlocked(&self, song_id: &str) -> bool {
        self.progress.is_song_unlocked(song_id)
    }

    /// Unlock a song. Returns false if it was already unlocked.
    pub fn unlock_song(&mut self, song_id: &str) -> bool {
        if !self.progress.unlock_song(song_id) {
            return false;
        }
        self.save(RecordGroup::Progress);
        true
    }

    pub fn unlocked_songs(&self) -> Vec<String> {
        self.progress.unlocked_songs.clone()
    }

    /// Mark a tutorial completed. Returns false if it already was.
    pub fn complete_tutorial(&mut self, tutorial_id: &str) -> bool {
        if !self.progress.complete_tutorial(tutorial_id) {
            return false;
        }
        self.save(RecordGroup::Progress);
        true
    }

    pub fn is_tutorial_completed(&self, tutorial_id: &str) -> bool {
        self.progress.is_tutorial_completed(tutorial_id)
    }

    fn notify_progress(&mut self) {
        if let Some(listener) = self.listeners.progress_changed.as_mut() {
            listener(&self.progress);
        }
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    pub fn statistics(&self) -> PlayerStatistics {
        self.statistics.clone()
    }

    /// Record a finished play
    pub fn update_statistics(&mut self, session: &PlaySession) {
        self.statistics.record_session(session);
        self.save(RecordGroup::Statistics);
    }

    pub fn song_play_count(&self, song_id: &str) -> u32 {
        self.statistics.song_play_count(song_id)
    }

    pub fn song_play_counts(&self) -> BTreeMap<String, u32> {
        self.statistics.song_play_counts.clone()
    }

    // ========================================================================
    // High scores
    // ========================================================================

    pub fn high_score(&self, song_id: &str) -> Option<HighScoreEntry> {
        self.high_scores.get(song_id).cloned()
    }

    pub fn high_scores(&self) -> HighScores {
        self.high_scores.clone()
    }

    /// Submit a score. Returns true if it is a new high score for the song.
    pub fn submit_score(&mut self, song_id: &str, submission: ScoreSubmission) -> bool {
        let now = (self.clock)();
        let is_new = self.high_scores.submit(song_id, submission, now);
        if is_new {
            log::info!("New high score on {}", song_id);
            self.save(RecordGroup::HighScores);
        }
        is_new
    }

    // ========================================================================
    // Backup / reset
    // ========================================================================

    /// Copy of every group
    pub fn snapshot(&self) -> DataSnapshot {
        DataSnapshot {
            settings: Some(self.settings.clone()),
            progress: Some(self.progress.clone()),
            statistics: Some(self.statistics.clone()),
            high_scores: Some(self.high_scores.clone()),
        }
    }

    /// Export all data as JSON (for backup or transfer)
    pub fn export_data(&self) -> Result<String, StoreError> {
        Ok(self.encode(&self.snapshot())?)
    }

    /// Import a JSON snapshot.
    ///
    /// Every group present replaces the current one wholesale, then all groups
    /// are saved. On a parse error nothing changes.
    pub fn import_data(&mut self, json: &str) -> Result<(), StoreError> {
        let snapshot: DataSnapshot = serde_json::from_str(json).map_err(|e| {
            log::error!("Failed to import data: {}", e);
            e
        })?;
        self.restore(snapshot);
        Ok(())
    }

    /// Apply an already-parsed snapshot (see [`import_data`](Self::import_data))
    pub fn restore(&mut self, snapshot: DataSnapshot) {
        if snapshot.is_empty() {
            log::warn!("Imported snapshot contains no record groups");
        }

        let DataSnapshot {
            settings,
            progress,
            statistics,
            high_scores,
        } = snapshot;

        if let Some(settings) = settings {
            self.settings = settings;
        }
        if let Some(progress) = progress {
            self.progress = progress;
        }
        if let Some(statistics) = statistics {
            self.statistics = statistics;
        }
        if let Some(high_scores) = high_scores {
            self.high_scores = high_scores;
        }

        self.save_all();
    }

    /// Erase all stored groups and reset to defaults
    pub fn clear_all_data(&mut self) {
        for group in RecordGroup::ALL {
            if let Err(e) = self.storage.remove(self.keys.key(group)) {
                log::error!("Failed to remove {} data: {}", group, e);
            }
        }

        self.settings = PlayerSettings::default();
        self.progress = PlayerProgress::default();
        self.statistics = PlayerStatistics::default();
        self.high_scores = HighScores::default();

        log::info!("All player data cleared");
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    /// Called after every settings change. Replaces any previous listener.
    pub fn on_settings_changed(&mut self, listener: impl FnMut(&PlayerSettings) + 'static) {
        self.listeners.settings_changed = Some(Box::new(listener));
    }

    /// Called after experience is granted. Replaces any previous listener.
    pub fn on_progress_changed(&mut self, listener: impl FnMut(&PlayerProgress) + 'static) {
        self.listeners.progress_changed = Some(Box::new(listener));
    }

    /// Called with the new balance after every coin change. Replaces any previous listener.
    pub fn on_coins_changed(&mut self, listener: impl FnMut(u64) + 'static) {
        self.listeners.coins_changed = Some(Box::new(listener));
    }
}

/// Read a record and merge it over `defaults`; any failure yields `defaults`
fn load_merged<S, T>(storage: &S, key: &str, defaults: T) -> T
where
    S: KeyValueStorage,
    T: Serialize + DeserializeOwned,
{
    match storage.get(key) {
        Ok(Some(data)) => match merge_over_defaults(&defaults, &data) {
            Ok(merged) => merged,
            Err(e) => {
                log::error!("Failed to parse {}: {}", key, e);
                defaults
            }
        },
        Ok(None) => defaults,
        Err(e) => {
            log::error!("Failed to read {}: {}", key, e);
            defaults
        }
    }
}

/// High scores are replaced wholesale, not merged
fn load_high_scores<S: KeyValueStorage>(storage: &S, key: &str) -> HighScores {
    match storage.get(key) {
        Ok(Some(data)) => match serde_json::from_str(&data) {
            Ok(scores) => scores,
            Err(e) => {
                log::error!("Failed to parse {}: {}", key, e);
                HighScores::default()
            }
        },
        Ok(None) => HighScores::default(),
        Err(e) => {
            log::error!("Failed to read {}: {}", key, e);
            HighScores::default()
        }
    }
}
