//! Defaults ⊕ persisted-partial merge
//!
//! Records written by older builds may lack fields. Loading overlays the
//! persisted top-level keys onto the serialized defaults, key by key:
//!
//! - a key present in the persisted object replaces the default value wholesale
//!   (nested maps and lists are not merged)
//! - a key missing from the persisted object keeps the default
//! - unknown keys are dropped
//!
//! The persisted document must be a JSON object, and every overriding value
//! must have the field's type; otherwise the merge fails as a whole.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Overlay a persisted JSON record onto `defaults`
pub fn merge_over_defaults<T>(defaults: &T, persisted: &str) -> Result<T, serde_json::Error>
where
    T: Serialize + DeserializeOwned,
{
    let overlay: Value = serde_json::from_str(persisted)?;
    merge_value_over_defaults(defaults, overlay)
}

/// Same as [`merge_over_defaults`] for an already-parsed value
pub fn merge_value_over_defaults<T>(defaults: &T, overlay: Value) -> Result<T, serde_json::Error>
where
    T: Serialize + DeserializeOwned,
{
    let overlay = match overlay {
        Value::Object(map) => map,
        other => {
            return Err(serde::de::Error::custom(format!(
                "expected a JSON object, found {}",
                kind_of(&other)
            )))
        }
    };

    let mut merged = match serde_json::to_value(defaults)? {
        Value::Object(map) => map,
        other => {
            return Err(serde::ser::Error::custom(format!(
                "defaults must serialize to an object, found {}",
                kind_of(&other)
            )))
        }
    };

    for (key, value) in overlay {
        if merged.contains_key(&key) {
            merged.insert(key, value);
        }
    }

    serde_json::from_value(Value::Object(merged))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{PlayerSettings, PlayerStatistics};
    use crate::progression::PlayerProgress;

    #[test]
    fn test_partial_record_keeps_defaults() {
        let merged: PlayerSettings =
            merge_over_defaults(&PlayerSettings::default(), r#"{"musicVolume": 0.3}"#).unwrap();

        assert_eq!(merged.music_volume, 0.3);
        assert_eq!(merged.sfx_volume, 1.0);
        assert_eq!(merged.language, "en");
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let merged: PlayerProgress = merge_over_defaults(
            &PlayerProgress::default(),
            r#"{"coins": 12, "legacyField": [1, 2, 3]}"#,
        )
        .unwrap();

        assert_eq!(merged.coins, 12);
        assert_eq!(merged.level, 1);
    }

    #[test]
    fn test_nested_values_are_replaced_not_merged() {
        let mut defaults = PlayerStatistics::default();
        defaults.song_play_counts.insert("default".to_string(), 3);

        let merged: PlayerStatistics =
            merge_over_defaults(&defaults, r#"{"songPlayCounts": {"other": 1}}"#).unwrap();

        assert_eq!(merged.song_play_counts.len(), 1);
        assert_eq!(merged.song_play_count("other"), 1);
        assert_eq!(merged.song_play_count("default"), 0);
    }

    #[test]
    fn test_non_object_is_rejected() {
        let result: Result<PlayerSettings, _> =
            merge_over_defaults(&PlayerSettings::default(), "[1, 2]");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_field_type_is_rejected() {
        let result: Result<PlayerSettings, _> =
            merge_over_defaults(&PlayerSettings::default(), r#"{"language": 5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let result: Result<PlayerSettings, _> =
            merge_over_defaults(&PlayerSettings::default(), "{not json");
        assert!(result.is_err());
    }
}
