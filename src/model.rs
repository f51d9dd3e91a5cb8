//! Input types in the shape the score API returns them.

use serde::Deserialize;

/// A play's hit statistics.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayStatistics {
    #[serde(default)]
    pub count_miss: u32,
    #[serde(default)]
    pub count_100: u32,
    #[serde(default)]
    pub count_50: u32,
}

/// A recorded play.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayResult {
    #[serde(default)]
    pub mods: Vec<String>,
    /// Accuracy as a fraction in `[0, 1]`.
    pub accuracy: f64,
    pub max_combo: u32,
    #[serde(default)]
    pub statistics: PlayStatistics,
}

impl PlayResult {
    /// The zero-statistics baseline used when the calculator opens straight
    /// from a beatmap: a clean 100% run at the map's known max combo.
    pub fn baseline(max_combo: u32) -> Self {
        Self {
            mods: Vec::new(),
            accuracy: 1.0,
            max_combo,
            statistics: PlayStatistics::default(),
        }
    }
}

/// The slice of the API's beatmap metadata the calculator consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct BeatmapMeta {
    pub id: u64,
    pub version: String,
    #[serde(default)]
    pub max_combo: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BeatmapsetMeta {
    pub artist: String,
    pub title: String,
}
