//! Typed field registry: semantic field identifiers and their ranges,
//! decoupling the score model from whatever renders it.

use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString};

/// Semantic identifier for every calculator input field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display, Serialize,
)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    Combo,
    Accuracy,
    Count300,
    Count100,
    Count50,
    Miss,
    SliderTicks,
    SliderEnds,
}

/// Range, step and interactivity of one field, as a UI should render it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldState {
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub enabled: bool,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Up,
    Down,
}
