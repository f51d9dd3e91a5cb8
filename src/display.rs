//! Pure projection from engine attributes to user-facing numbers.

use serde::Serialize;

/// Direction of an attribute change relative to the unmodified beatmap.
/// Higher values read as harder for every attribute shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Harder,
    Easier,
    Unchanged,
}

/// One numeric readout with its unmodified baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Readout {
    pub base: f64,
    pub value: f64,
    pub trend: Trend,
}

impl Readout {
    pub fn new(base: f64, value: f64) -> Self {
        let trend = if value > base {
            Trend::Harder
        } else if value < base {
            Trend::Easier
        } else {
            Trend::Unchanged
        };
        Self { base, value, trend }
    }
}

/// Everything the calculator shows for the current state. Plain data,
/// rebuilt on every calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayAttributes {
    pub stars: f64,
    pub max_combo: u32,
    pub total_objects: u32,
    pub ar: Readout,
    pub od: Readout,
    pub cs: Readout,
    pub hp: Readout,
    pub bpm: Readout,
    pub pp: f64,
    pub pp_aim: f64,
    pub pp_speed: f64,
    pub pp_accuracy: f64,
    pub pp_flashlight: f64,
    /// pp of a hypothetical perfect full combo under the same modifiers.
    pub full_combo_pp: f64,
}
