//! Contracts for the external difficulty/performance engine.

use serde::Serialize;

use crate::error::PfResult;

/// Static facts about a parsed beatmap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapInfo {
    pub total_objects: u32,
    pub cs: f32,
    pub ar: f32,
    pub od: f32,
    pub hp: f32,
    pub bpm: f64,
}

/// Everything a difficulty computation depends on besides the map itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyInput {
    /// Sum of the active modifiers' protocol codes.
    pub mods: u32,
    /// Alternate (lazer-style) ruleset.
    pub lazer: bool,
}

/// The scalar slice of the difficulty attributes the calculator needs for
/// clamping and display. The full attribute set stays inside the engine
/// handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DifficultySummary {
    pub stars: f64,
    pub max_combo: u32,
    /// Maximum slider large-tick hits; zero outside the alternate ruleset.
    pub slider_ticks: u32,
    /// Maximum slider-end hits; zero outside the alternate ruleset.
    pub slider_ends: u32,
}

/// Effective beatmap attributes under the current modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapAttributes {
    pub ar: f64,
    pub od: f64,
    pub cs: f64,
    pub hp: f64,
    pub clock_rate: f64,
}

/// Which statistic is authoritative for a performance calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitInput {
    /// Accuracy in percent; the engine chooses the hit distribution
    /// (fastest-distribution hint).
    Accuracy(f64),
    /// Exact partition; accuracy is derived.
    Exact { n300: u32, n100: u32, n50: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceInput {
    pub mods: u32,
    pub lazer: bool,
    pub combo: u32,
    pub misses: u32,
    pub hits: HitInput,
    pub slider_ticks: Option<u32>,
    pub slider_ends: Option<u32>,
}

/// The hit distribution the engine settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitBreakdown {
    pub n300: u32,
    pub n100: u32,
    pub n50: u32,
}

/// Result of one performance calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceOutput {
    pub pp: f64,
    pub pp_aim: f64,
    pub pp_speed: f64,
    pub pp_accuracy: f64,
    pub pp_flashlight: f64,
    /// Present when the engine chose the distribution itself, i.e. under
    /// accuracy-driven input.
    pub breakdown: Option<HitBreakdown>,
}

/// The difficulty/performance engine as the calculator consumes it.
///
/// `Map` and `DiffAttrs` are engine-owned handles. The session owns at most
/// one of each at a time and releases them by dropping; transient
/// performance results never outlive a single calculation pass.
pub trait Engine {
    type Map: std::fmt::Debug;
    type DiffAttrs: std::fmt::Debug;

    /// Parse a raw beatmap definition file.
    fn parse(&self, raw: &str) -> PfResult<Self::Map>;

    /// Baseline facts about a parsed map.
    fn map_info(&self, map: &Self::Map) -> MapInfo;

    /// Compute difficulty attributes. Only depends on the map and
    /// `DifficultyInput`, so callers may cache the result per input.
    fn difficulty(
        &self,
        map: &Self::Map,
        input: &DifficultyInput,
    ) -> PfResult<(Self::DiffAttrs, DifficultySummary)>;

    /// Project effective beatmap attributes under the given modifiers.
    fn map_attributes(&self, map: &Self::Map, input: &DifficultyInput) -> PfResult<MapAttributes>;

    /// Compute performance attributes on top of difficulty attributes.
    fn performance(
        &self,
        attrs: &Self::DiffAttrs,
        input: &PerformanceInput,
    ) -> PfResult<PerformanceOutput>;
}
