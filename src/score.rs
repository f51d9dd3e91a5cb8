//! The mutable score statistics driving a calculation.

use serde::Serialize;

use crate::model::PlayResult;

/// The four-way partition of a map's objects into hit results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HitCounts {
    pub n300: u32,
    pub n100: u32,
    pub n50: u32,
    pub misses: u32,
}

impl HitCounts {
    pub fn total(&self) -> u32 {
        self.n300 + self.n100 + self.n50 + self.misses
    }

    /// Classic accuracy weighting over the current counts, in percent.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 100.0;
        }
        let weighted = 300 * self.n300 + 100 * self.n100 + 50 * self.n50;
        round2(f64::from(weighted) / f64::from(300 * total) * 100.0)
    }
}

/// Round to the two decimals the accuracy readout carries.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Current hypothetical or real score statistics for one session.
///
/// The struct itself is mode-agnostic storage; the session decides which
/// field is authoritative and keeps the rest derived.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreInput {
    total_objects: u32,
    accuracy: f64,
    combo: u32,
    counts: HitCounts,
    slider_ticks: u32,
    slider_ends: u32,
}

impl ScoreInput {
    /// Prefill from a recorded play. n300 is the derived remainder so the
    /// partition always holds; the reported accuracy is kept as-is rather
    /// than rederived.
    pub fn from_play(play: &PlayResult, total_objects: u32) -> Self {
        let stats = &play.statistics;
        let misses = stats.count_miss.min(total_objects);
        let n100 = stats.count_100.min(total_objects - misses);
        let n50 = stats.count_50.min(total_objects - misses - n100);
        Self {
            total_objects,
            accuracy: round2((play.accuracy * 100.0).clamp(0.0, 100.0)),
            combo: play.max_combo,
            counts: HitCounts {
                n300: total_objects - misses - n100 - n50,
                n100,
                n50,
                misses,
            },
            slider_ticks: 0,
            slider_ends: 0,
        }
    }

    pub fn total_objects(&self) -> u32 {
        self.total_objects
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn counts(&self) -> HitCounts {
        self.counts
    }

    pub fn slider_ticks(&self) -> u32 {
        self.slider_ticks
    }

    pub fn slider_ends(&self) -> u32 {
        self.slider_ends
    }

    pub(crate) fn set_accuracy(&mut self, value: f64) {
        self.accuracy = round2(value.clamp(0.0, 100.0));
    }

    pub(crate) fn set_combo(&mut self, value: u32, max_combo: u32) {
        self.combo = value.min(max_combo);
    }

    /// Re-partition the hit counts with n300 as the derived remainder.
    /// Inputs are clamped so n300 never goes negative: misses keep their
    /// requested value first, then 100s, then 50s. The display accuracy is
    /// rederived from the new counts.
    pub(crate) fn set_partition(&mut self, n100: u32, n50: u32, misses: u32) {
        let misses = misses.min(self.total_objects);
        let n100 = n100.min(self.total_objects - misses);
        let n50 = n50.min(self.total_objects - misses - n100);
        self.counts = HitCounts {
            n300: self.total_objects - misses - n100 - n50,
            n100,
            n50,
            misses,
        };
        self.accuracy = self.counts.accuracy();
    }

    /// Set the miss count without touching the rest of the partition; used
    /// in simple mode where the engine rederives the distribution anyway.
    pub(crate) fn set_misses_raw(&mut self, misses: u32) {
        self.counts.misses = misses.min(self.total_objects);
    }

    /// Overwrite the displayed distribution with the engine's chosen one.
    /// Informational only; the next accuracy edit replaces it again.
    pub(crate) fn apply_breakdown(&mut self, n300: u32, n100: u32, n50: u32) {
        self.counts.n300 = n300;
        self.counts.n100 = n100;
        self.counts.n50 = n50;
    }

    /// Max combo, zero misses. Accuracy and the 100/50 counts are left
    /// alone.
    pub(crate) fn force_full_combo(&mut self, max_combo: u32) {
        self.combo = max_combo;
        self.counts.misses = 0;
    }

    pub(crate) fn set_slider_ticks(&mut self, value: u32) {
        self.slider_ticks = value;
    }

    pub(crate) fn set_slider_ends(&mut self, value: u32) {
        self.slider_ends = value;
    }

    /// Pull stored stats back inside freshly computed difficulty bounds.
    pub(crate) fn clamp_to(&mut self, max_combo: u32, max_ticks: u32, max_ends: u32) {
        self.combo = self.combo.min(max_combo);
        self.slider_ticks = self.slider_ticks.min(max_ticks);
        self.slider_ends = self.slider_ends.min(max_ends);
    }
}
