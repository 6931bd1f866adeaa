//! Player settings and preferences

use serde::{Deserialize, Serialize};

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSettings {
    // === Audio ===
    /// Music volume (0.0 - 1.0)
    pub music_volume: f64,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f64,
    /// Audio offset in milliseconds
    pub audio_offset: f64,

    // === Gameplay ===
    /// Note scroll speed multiplier
    pub note_speed: f64,
    /// Remaining free auto-play uses
    pub auto_play_count: u32,
    /// ID of the most recently played song ("" if none)
    pub last_played_song_id: String,

    // === Device ===
    pub vibration_enabled: bool,
    pub notification_enabled: bool,

    // === Presentation ===
    /// UI language code
    pub language: String,
    /// Visual effects level (0 = off, 1 = reduced, 2 = full)
    pub visual_effects_level: u8,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            music_volume: 0.8,
            sfx_volume: 1.0,
            audio_offset: 0.0,

            note_speed: 1.0,
            auto_play_count: 5,
            last_played_song_id: String::new(),

            vibration_enabled: true,
            notification_enabled: true,

            language: "en".to_string(),
            visual_effects_level: 2,
        }
    }
}

/// Partial settings change; `None` fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsUpdate {
    pub music_volume: Option<f64>,
    pub sfx_volume: Option<f64>,
    pub audio_offset: Option<f64>,
    pub note_speed: Option<f64>,
    pub auto_play_count: Option<u32>,
    pub last_played_song_id: Option<String>,
    pub vibration_enabled: Option<bool>,
    pub notification_enabled: Option<bool>,
    pub language: Option<String>,
    pub visual_effects_level: Option<u8>,
}

impl SettingsUpdate {
    /// True if no field would change anything
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl PlayerSettings {
    /// Override the fields present in `update`. Non-finite numbers are ignored.
    pub fn apply(&mut self, update: SettingsUpdate) {
        let SettingsUpdate {
            music_volume,
            sfx_volume,
            audio_offset,
            note_speed,
            auto_play_count,
            last_played_song_id,
            vibration_enabled,
            notification_enabled,
            language,
            visual_effects_level,
        } = update;

        if let Some(v) = music_volume.filter(|v| v.is_finite()) {
            self.music_volume = v;
        }
        if let Some(v) = sfx_volume.filter(|v| v.is_finite()) {
            self.sfx_volume = v;
        }
        if let Some(v) = audio_offset.filter(|v| v.is_finite()) {
            self.audio_offset = v;
        }
        if let Some(v) = note_speed.filter(|v| v.is_finite()) {
            self.note_speed = v;
        }
        if let Some(v) = auto_play_count {
            self.auto_play_count = v;
        }
        if let Some(v) = last_played_song_id {
            self.last_played_song_id = v;
        }
        if let Some(v) = vibration_enabled {
            self.vibration_enabled = v;
        }
        if let Some(v) = notification_enabled {
            self.notification_enabled = v;
        }
        if let Some(v) = language {
            self.language = v;
        }
        if let Some(v) = visual_effects_level {
            self.visual_effects_level = v;
        }
    }
}
