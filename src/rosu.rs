//! rosu-pp implementation of the engine contract.

use rosu_pp::any::{DifficultyAttributes, HitResultPriority, PerformanceAttributes};
use rosu_pp::{Beatmap, Difficulty, Performance};

use crate::engine::{
    DifficultyInput, DifficultySummary, Engine, HitBreakdown, HitInput, MapAttributes, MapInfo,
    PerformanceInput, PerformanceOutput,
};
use crate::error::{PfResult, PpForgeError};

/// The stock engine: rosu-pp, the same calculation library the dashboard
/// consumed through its wasm bindings.
#[derive(Debug, Clone, Copy, Default)]
pub struct RosuEngine;

impl Engine for RosuEngine {
    type Map = Beatmap;
    type DiffAttrs = DifficultyAttributes;

    fn parse(&self, raw: &str) -> PfResult<Beatmap> {
        raw.parse::<Beatmap>()
            .map_err(|e| PpForgeError::Parse(e.to_string()))
    }

    fn map_info(&self, map: &Beatmap) -> MapInfo {
        MapInfo {
            total_objects: map.hit_objects.len() as u32,
            cs: map.cs,
            ar: map.ar,
            od: map.od,
            hp: map.hp,
            bpm: map.bpm(),
        }
    }

    fn difficulty(
        &self,
        map: &Beatmap,
        input: &DifficultyInput,
    ) -> PfResult<(Self::DiffAttrs, DifficultySummary)> {
        let attrs = Difficulty::new()
            .mods(input.mods)
            .lazer(input.lazer)
            .calculate(map);
        let summary = match &attrs {
            DifficultyAttributes::Osu(osu) => DifficultySummary {
                stars: osu.stars,
                max_combo: osu.max_combo,
                slider_ticks: osu.n_large_ticks,
                slider_ends: osu.n_sliders,
            },
            other => DifficultySummary {
                stars: other.stars(),
                max_combo: other.max_combo(),
                slider_ticks: 0,
                slider_ends: 0,
            },
        };
        Ok((attrs, summary))
    }

    fn map_attributes(&self, map: &Beatmap, input: &DifficultyInput) -> PfResult<MapAttributes> {
        let attrs = map.attributes().mods(input.mods).build();
        Ok(MapAttributes {
            ar: attrs.ar,
            od: attrs.od,
            cs: attrs.cs,
            hp: attrs.hp,
            clock_rate: attrs.clock_rate,
        })
    }

    fn performance(
        &self,
        attrs: &Self::DiffAttrs,
        input: &PerformanceInput,
    ) -> PfResult<PerformanceOutput> {
        let mut perf = Performance::new(attrs.clone())
            .mods(input.mods)
            .lazer(input.lazer)
            .combo(input.combo)
            .misses(input.misses);

        let accuracy_driven = match input.hits {
            HitInput::Accuracy(acc) => {
                perf = perf
                    .accuracy(acc)
                    .hitresult_priority(HitResultPriority::Fastest);
                true
            }
            HitInput::Exact { n300, n100, n50 } => {
                perf = perf.n300(n300).n100(n100).n50(n50);
                false
            }
        };

        if let Some(ticks) = input.slider_ticks {
            perf = perf.large_tick_hits(ticks);
        }
        if let Some(ends) = input.slider_ends {
            perf = perf.slider_end_hits(ends);
        }

        // The engine's chosen distribution is only meaningful when it had
        // to pick one itself.
        let breakdown = if accuracy_driven {
            let state = perf.generate_state();
            Some(HitBreakdown {
                n300: state.n300,
                n100: state.n100,
                n50: state.n50,
            })
        } else {
            None
        };

        let perf_attrs = perf.calculate();
        let (pp_aim, pp_speed, pp_accuracy, pp_flashlight) = match &perf_attrs {
            PerformanceAttributes::Osu(osu) => {
                (osu.pp_aim, osu.pp_speed, osu.pp_acc, osu.pp_flashlight)
            }
            _ => (0.0, 0.0, 0.0, 0.0),
        };

        Ok(PerformanceOutput {
            pp: perf_attrs.pp(),
            pp_aim,
            pp_speed,
            pp_accuracy,
            pp_flashlight,
            breakdown,
        })
    }
}
