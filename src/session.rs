//! Calculator sessions: mode control, stat derivation, and engine
//! orchestration.

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumString};
use tracing::{debug, warn};

use crate::display::{DisplayAttributes, Readout};
use crate::engine::{
    DifficultyInput, DifficultySummary, Engine, HitInput, MapInfo, PerformanceInput,
};
use crate::error::{PfResult, PpForgeError};
use crate::fields::{Field, FieldState, StepDirection};
use crate::model::{BeatmapMeta, BeatmapsetMeta, PlayResult};
use crate::mods::{Mod, ModSet};
use crate::score::ScoreInput;
use crate::source::{BeatmapCache, BeatmapSource};

/// Named stat transformations that reset the score to a canonical
/// high-performance state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
pub enum Preset {
    /// Max achievable combo, zero misses; accuracy untouched.
    #[strum(serialize = "fc")]
    FullCombo,
    /// 100% accuracy at max combo.
    #[strum(serialize = "ss")]
    PerfectFullCombo,
}

/// Opens calculator sessions; owns the beatmap source and the content
/// cache shared across opens.
pub struct Calculator<E: Engine + Clone, S: BeatmapSource> {
    engine: E,
    source: S,
    cache: BeatmapCache,
}

impl<E, S> Calculator<E, S>
where
    E: Engine + Clone,
    S: BeatmapSource,
{
    pub fn new(engine: E, source: S) -> Self {
        Self {
            engine,
            source,
            cache: BeatmapCache::new(),
        }
    }

    pub fn cache(&self) -> &BeatmapCache {
        &self.cache
    }

    /// Open a session prefilled from a recorded play. Fetch and parse
    /// failures abort the open; no partial session is left behind.
    pub fn open_for_play(
        &mut self,
        play: &PlayResult,
        beatmap: &BeatmapMeta,
        beatmapset: &BeatmapsetMeta,
    ) -> PfResult<CalculatorSession<E>> {
        let raw = self.cache.get_or_fetch(beatmap.id, &self.source)?;
        CalculatorSession::open(self.engine.clone(), &raw, play, beatmap, beatmapset)
    }

    /// Open a session with a clean 100% baseline for a beatmap.
    pub fn open_for_beatmap(
        &mut self,
        beatmap: &BeatmapMeta,
        beatmapset: &BeatmapsetMeta,
    ) -> PfResult<CalculatorSession<E>> {
        let play = PlayResult::baseline(beatmap.max_combo.unwrap_or(0));
        self.open_for_play(&play, beatmap, beatmapset)
    }
}

/// Difficulty attributes held between calculations, together with the
/// input they were computed for.
#[derive(Debug)]
struct CachedDifficulty<E: Engine> {
    input: DifficultyInput,
    attrs: E::DiffAttrs,
    summary: DifficultySummary,
}

/// One open calculator: the parsed map, the current score statistics, and
/// the active modes. Constructed per (play, beatmap) pair, never persisted.
#[derive(Debug)]
pub struct CalculatorSession<E: Engine> {
    engine: E,
    map: E::Map,
    base: MapInfo,
    title: String,
    total_objects: u32,
    score: ScoreInput,
    mods: ModSet,
    advanced: bool,
    lazer: bool,
    /// Re-entrancy guard: mutation entry points no-op while a derivation
    /// span holds it, so engine feedback cannot cascade into another
    /// calculation.
    guard: bool,
    difficulty: Option<CachedDifficulty<E>>,
    display: Option<DisplayAttributes>,
    error: Option<String>,
}

impl<E: Engine> CalculatorSession<E> {
    fn open(
        engine: E,
        raw: &str,
        play: &PlayResult,
        beatmap: &BeatmapMeta,
        beatmapset: &BeatmapsetMeta,
    ) -> PfResult<Self> {
        debug!("Parsing beatmap content ({} bytes)", raw.len());
        let map = engine.parse(raw)?;
        let base = engine.map_info(&map);
        let mut session = Self {
            engine,
            map,
            base,
            title: format!(
                "{} - {} [{}]",
                beatmapset.artist, beatmapset.title, beatmap.version
            ),
            total_objects: base.total_objects,
            score: ScoreInput::from_play(play, base.total_objects),
            mods: ModSet::from_acronyms(&play.mods),
            advanced: true,
            lazer: false,
            guard: false,
            difficulty: None,
            display: None,
            error: None,
        };
        session.recalculate()?;
        Ok(session)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn total_objects(&self) -> u32 {
        self.total_objects
    }

    pub fn score(&self) -> &ScoreInput {
        &self.score
    }

    pub fn mods(&self) -> &ModSet {
        &self.mods
    }

    pub fn is_advanced_mode(&self) -> bool {
        self.advanced
    }

    pub fn is_alternate_ruleset(&self) -> bool {
        self.lazer
    }

    /// Max achievable combo under the current modifier set.
    pub fn max_combo(&self) -> u32 {
        self.difficulty_summary().max_combo
    }

    /// The latest successful projection, if any.
    pub fn current_display_attributes(&self) -> Option<&DisplayAttributes> {
        self.display.as_ref()
    }

    /// The error indicator from the last calculation, cleared on success.
    pub fn calculation_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn difficulty_summary(&self) -> DifficultySummary {
        self.difficulty
            .as_ref()
            .map(|d| d.summary)
            .unwrap_or_default()
    }

    /// Set accuracy (simple mode only). Exactly 100% implies a clean full
    /// combo, matching genuine gameplay semantics.
    pub fn set_accuracy(&mut self, value: f64) -> PfResult<()> {
        if self.guard {
            return Ok(());
        }
        self.ensure_editable(Field::Accuracy)?;
        self.guard = true;
        self.score.set_accuracy(value);
        if self.score.accuracy() == 100.0 {
            let max_combo = self.max_combo();
            self.score.force_full_combo(max_combo);
        }
        self.guard = false;
        self.recalculate()
    }

    pub fn set_combo(&mut self, value: u32) -> PfResult<()> {
        if self.guard {
            return Ok(());
        }
        self.ensure_editable(Field::Combo)?;
        self.score.set_combo(value, self.max_combo());
        self.recalculate()
    }

    /// Set the full partition at once (advanced mode); n300 is derived as
    /// the remainder.
    pub fn set_hit_counts(&mut self, n100: u32, n50: u32, misses: u32) -> PfResult<()> {
        if self.guard {
            return Ok(());
        }
        self.ensure_editable(Field::Count100)?;
        let requested = n100 + n50 + misses;
        if requested > self.total_objects {
            return Err(PpForgeError::Validation(format!(
                "hit counts exceed the object count ({requested} > {})",
                self.total_objects
            )));
        }
        self.guard = true;
        self.score.set_partition(n100, n50, misses);
        self.guard = false;
        self.recalculate()
    }

    pub fn set_count_100(&mut self, value: u32) -> PfResult<()> {
        self.set_count_field(Field::Count100, value)
    }

    pub fn set_count_50(&mut self, value: u32) -> PfResult<()> {
        self.set_count_field(Field::Count50, value)
    }

    fn set_count_field(&mut self, field: Field, value: u32) -> PfResult<()> {
        if self.guard {
            return Ok(());
        }
        self.ensure_editable(field)?;
        let c = self.score.counts();
        // A count can only grow at n300's expense.
        let (n100, n50) = match field {
            Field::Count100 => (value.min(c.n300 + c.n100), c.n50),
            _ => (c.n100, value.min(c.n300 + c.n50)),
        };
        self.guard = true;
        self.score.set_partition(n100, n50, c.misses);
        self.guard = false;
        self.recalculate()
    }

    pub fn set_miss_count(&mut self, value: u32) -> PfResult<()> {
        if self.guard {
            return Ok(());
        }
        self.ensure_editable(Field::Miss)?;
        let c = self.score.counts();
        let misses = value.min(c.n300 + c.misses);
        self.guard = true;
        if self.advanced {
            self.score.set_partition(c.n100, c.n50, misses);
        } else {
            // Simple mode: the engine rederives the distribution from
            // accuracy + misses on the next calculation.
            self.score.set_misses_raw(misses);
        }
        self.guard = false;
        self.recalculate()
    }

    pub fn set_slider_ticks(&mut self, value: u32) -> PfResult<()> {
        if self.guard {
            return Ok(());
        }
        self.ensure_editable(Field::SliderTicks)?;
        self.score
            .set_slider_ticks(value.min(self.difficulty_summary().slider_ticks));
        self.recalculate()
    }

    pub fn set_slider_ends(&mut self, value: u32) -> PfResult<()> {
        if self.guard {
            return Ok(());
        }
        self.ensure_editable(Field::SliderEnds)?;
        self.score
            .set_slider_ends(value.min(self.difficulty_summary().slider_ends));
        self.recalculate()
    }

    /// Switch between accuracy-driven (simple) and exact-hit-count
    /// (advanced) input.
    pub fn set_advanced_mode(&mut self, advanced: bool) -> PfResult<()> {
        if self.guard || self.advanced == advanced {
            return Ok(());
        }
        self.advanced = advanced;
        self.recalculate()
    }

    /// Toggle the alternate (lazer-style) ruleset, revealing the slider
    /// tick/end statistics. Enabling prefills them with their maxima.
    pub fn set_alternate_ruleset(&mut self, lazer: bool) -> PfResult<()> {
        if self.guard || self.lazer == lazer {
            return Ok(());
        }
        self.lazer = lazer;
        if lazer {
            let summary = self.difficulty_summary();
            self.guard = true;
            self.score.set_slider_ticks(summary.slider_ticks);
            self.score.set_slider_ends(summary.slider_ends);
            self.guard = false;
        }
        self.recalculate()
    }

    pub fn toggle_mod(&mut self, m: Mod) -> PfResult<()> {
        if self.guard {
            return Ok(());
        }
        self.mods.toggle(m);
        self.recalculate()
    }

    /// The "No Mod" control: deactivate every modifier.
    pub fn clear_mods(&mut self) -> PfResult<()> {
        if self.guard {
            return Ok(());
        }
        self.mods.clear();
        self.recalculate()
    }

    /// Replace the whole modifier set, e.g. from a parsed acronym string.
    pub fn set_mods(&mut self, mods: ModSet) -> PfResult<()> {
        if self.guard {
            return Ok(());
        }
        self.mods = mods;
        self.recalculate()
    }

    /// Apply a named stat transformation atomically, then recalculate once.
    pub fn apply_preset(&mut self, preset: Preset) -> PfResult<()> {
        if self.guard {
            return Ok(());
        }
        let summary = self.difficulty_summary();
        self.guard = true;
        match preset {
            Preset::FullCombo => {
                self.score.force_full_combo(summary.max_combo);
                if self.advanced {
                    let c = self.score.counts();
                    self.score.set_partition(c.n100, c.n50, 0);
                }
            }
            Preset::PerfectFullCombo => {
                self.score.set_accuracy(100.0);
                self.score.force_full_combo(summary.max_combo);
                self.score.set_partition(0, 0, 0);
            }
        }
        if self.lazer {
            self.score.set_slider_ticks(summary.slider_ticks);
            self.score.set_slider_ends(summary.slider_ends);
        }
        self.guard = false;
        self.recalculate()
    }

    /// One stepper increment/decrement, honoring the field's range, step
    /// and the n300 guard. Disabled fields are a silent no-op, like a
    /// disabled control.
    pub fn step_field(&mut self, field: Field, direction: StepDirection) -> PfResult<()> {
        if self.guard {
            return Ok(());
        }
        let state = self.field_state(field);
        if !state.enabled {
            return Ok(());
        }
        if direction == StepDirection::Up
            && matches!(field, Field::Count100 | Field::Count50 | Field::Miss)
            && self.score.counts().n300 == 0
        {
            // Raising these would push the derived n300 below zero.
            return Ok(());
        }
        let next = match direction {
            StepDirection::Up => (state.value + state.step).min(state.max),
            StepDirection::Down => (state.value - state.step).max(state.min),
        };
        self.apply_field(field, next)
    }

    /// Route a raw field write to the matching setter.
    pub fn apply_field(&mut self, field: Field, value: f64) -> PfResult<()> {
        let as_count = value.max(0.0).round() as u32;
        match field {
            Field::Accuracy => self.set_accuracy(value),
            Field::Combo => self.set_combo(as_count),
            Field::Count100 => self.set_count_100(as_count),
            Field::Count50 => self.set_count_50(as_count),
            Field::Miss => self.set_miss_count(as_count),
            Field::SliderTicks => self.set_slider_ticks(as_count),
            Field::SliderEnds => self.set_slider_ends(as_count),
            Field::Count300 => Err(PpForgeError::Validation(
                "count300 is always derived from the other counts".into(),
            )),
        }
    }

    /// Range, step and interactivity of one field under the current modes.
    pub fn field_state(&self, field: Field) -> FieldState {
        let summary = self.difficulty_summary();
        let c = self.score.counts();
        let acc_locked = !self.advanced && self.score.accuracy() == 100.0;
        match field {
            Field::Combo => FieldState {
                value: f64::from(self.score.combo()),
                min: 0.0,
                max: f64::from(summary.max_combo),
                step: 1.0,
                enabled: !acc_locked,
                visible: true,
            },
            Field::Accuracy => FieldState {
                value: self.score.accuracy(),
                min: 0.0,
                max: 100.0,
                step: 0.01,
                enabled: !self.advanced,
                visible: true,
            },
            // n300 is a derived readout in both modes: always shown, never
            // editable.
            Field::Count300 => FieldState {
                value: f64::from(c.n300),
                min: 0.0,
                max: f64::from(self.total_objects),
                step: 1.0,
                enabled: false,
                visible: true,
            },
            Field::Count100 => FieldState {
                value: f64::from(c.n100),
                min: 0.0,
                max: f64::from(c.n300 + c.n100),
                step: 1.0,
                enabled: self.advanced,
                visible: self.advanced,
            },
            Field::Count50 => FieldState {
                value: f64::from(c.n50),
                min: 0.0,
                max: f64::from(c.n300 + c.n50),
                step: 1.0,
                enabled: self.advanced,
                visible: self.advanced,
            },
            Field::Miss => FieldState {
                value: f64::from(c.misses),
                min: 0.0,
                max: f64::from(c.n300 + c.misses),
                step: 1.0,
                enabled: true,
                visible: true,
            },
            Field::SliderTicks => FieldState {
                value: f64::from(self.score.slider_ticks()),
                min: 0.0,
                max: f64::from(summary.slider_ticks),
                step: 1.0,
                enabled: self.lazer,
                visible: self.lazer,
            },
            Field::SliderEnds => FieldState {
                value: f64::from(self.score.slider_ends()),
                min: 0.0,
                max: f64::from(summary.slider_ends),
                step: 1.0,
                enabled: self.lazer,
                visible: self.lazer,
            },
        }
    }

    /// The whole registry, in fixed field order.
    pub fn field_states(&self) -> Vec<(Field, FieldState)> {
        Field::iter().map(|f| (f, self.field_state(f))).collect()
    }

    fn ensure_editable(&self, field: Field) -> PfResult<()> {
        if !self.field_state(field).enabled {
            return Err(PpForgeError::Validation(format!(
                "field '{field}' is not editable in the current mode"
            )));
        }
        Ok(())
    }

    /// Run a full calculation pass for the current state.
    ///
    /// Failures become the session's error indicator; the session stays
    /// open and editable either way, and every transient engine result is
    /// released before this returns.
    pub fn recalculate(&mut self) -> PfResult<()> {
        if self.guard {
            return Ok(());
        }
        match self.run_calculation() {
            Ok(display) => {
                self.display = Some(display);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!("Calculation failed: {e}");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn run_calculation(&mut self) -> PfResult<DisplayAttributes> {
        let input = DifficultyInput {
            mods: self.mods.bits(),
            lazer: self.lazer,
        };

        // Difficulty only depends on (map, mods, ruleset); recompute on a
        // key change and drop the previous attributes with the replace.
        if self.difficulty.as_ref().map(|d| d.input) != Some(input) {
            debug!(
                mods = input.mods,
                lazer = input.lazer,
                "Recomputing difficulty attributes"
            );
            let (attrs, summary) = self.engine.difficulty(&self.map, &input)?;
            self.difficulty = Some(CachedDifficulty {
                input,
                attrs,
                summary,
            });
            self.score
                .clamp_to(summary.max_combo, summary.slider_ticks, summary.slider_ends);
        }
        let Some(difficulty) = self.difficulty.as_ref() else {
            return Err(PpForgeError::Calculation(
                "difficulty attributes unavailable".into(),
            ));
        };
        let summary = difficulty.summary;

        let map_attrs = self.engine.map_attributes(&self.map, &input)?;

        let c = self.score.counts();
        let perf_input = PerformanceInput {
            mods: input.mods,
            lazer: self.lazer,
            combo: self.score.combo(),
            misses: c.misses,
            hits: if self.advanced {
                HitInput::Exact {
                    n300: c.n300,
                    n100: c.n100,
                    n50: c.n50,
                }
            } else {
                HitInput::Accuracy(self.score.accuracy())
            },
            slider_ticks: self.lazer.then(|| self.score.slider_ticks()),
            slider_ends: self.lazer.then(|| self.score.slider_ends()),
        };
        let perf = self.engine.performance(&difficulty.attrs, &perf_input)?;

        // Hypothetical perfect full combo under the same modifiers, kept
        // only long enough to read its pp.
        let full_combo_input = PerformanceInput {
            combo: summary.max_combo,
            misses: 0,
            hits: HitInput::Accuracy(100.0),
            slider_ticks: self.lazer.then_some(summary.slider_ticks),
            slider_ends: self.lazer.then_some(summary.slider_ends),
            ..perf_input
        };
        let full_combo = self.engine.performance(&difficulty.attrs, &full_combo_input)?;

        let display = DisplayAttributes {
            stars: summary.stars,
            max_combo: summary.max_combo,
            total_objects: self.total_objects,
            ar: Readout::new(f64::from(self.base.ar), map_attrs.ar),
            od: Readout::new(f64::from(self.base.od), map_attrs.od),
            cs: Readout::new(f64::from(self.base.cs), map_attrs.cs),
            hp: Readout::new(f64::from(self.base.hp), map_attrs.hp),
            bpm: Readout::new(self.base.bpm, self.base.bpm * map_attrs.clock_rate),
            pp: perf.pp,
            pp_aim: perf.pp_aim,
            pp_speed: perf.pp_speed,
            pp_accuracy: perf.pp_accuracy,
            pp_flashlight: perf.pp_flashlight,
            full_combo_pp: full_combo.pp,
        };

        // Engine feedback: in simple mode the chosen distribution becomes
        // the displayed hit counts. The guard is held so the write cannot
        // cascade into another calculation.
        if !self.advanced {
            if let Some(b) = perf.breakdown {
                self.guard = true;
                self.score.apply_breakdown(b.n300, b.n100, b.n50);
                self.guard = false;
            }
        }

        Ok(display)
    }
}
