//! Performance-point recalculation core for an osu! score dashboard:
//! keeps hypothetical score statistics consistent, drives the
//! difficulty/performance engine, and projects the results for display.

pub mod display;
pub mod engine;
pub mod error;
pub mod fields;
pub mod model;
pub mod mods;
pub mod rosu;
pub mod score;
pub mod session;
pub mod source;

pub use error::{PfResult, PpForgeError};
pub use session::{Calculator, CalculatorSession};
