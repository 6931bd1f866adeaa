//! Backup snapshot of all record groups

use serde::{Deserialize, Serialize};

use crate::data::{HighScores, PlayerSettings, PlayerStatistics};
use crate::progression::PlayerProgress;

/// All four record groups as one document.
///
/// Exports always carry every group. On import a missing (or null) group
/// leaves the current one untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<PlayerSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<PlayerProgress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<PlayerStatistics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_scores: Option<HighScores>,
}

impl DataSnapshot {
    /// True if the snapshot would not replace anything
    pub fn is_empty(&self) -> bool {
        self.settings.is_none()
            && self.progress.is_none()
            && self.statistics.is_none()
            && self.high_scores.is_none()
    }
}
