#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use ppforge::engine::{
    DifficultyInput, DifficultySummary, Engine, HitBreakdown, HitInput, MapAttributes, MapInfo,
    PerformanceInput, PerformanceOutput,
};
use ppforge::error::{PfResult, PpForgeError};
use ppforge::model::{BeatmapMeta, BeatmapsetMeta};
use ppforge::session::{Calculator, CalculatorSession};
use ppforge::source::BeatmapSource;

/// Call and live-handle counters shared between the mock engine and the
/// test body. Handles decrement their counter on Drop, which makes the
/// acquire/release pairing observable.
#[derive(Debug, Default)]
pub struct EngineCounters {
    pub parse_calls: AtomicUsize,
    pub maps_alive: AtomicUsize,
    pub difficulty_calls: AtomicUsize,
    pub attrs_alive: AtomicUsize,
    pub performance_calls: AtomicUsize,
    pub fail_parse: AtomicBool,
    pub fail_performance: AtomicBool,
}

#[derive(Debug)]
pub struct MockMap {
    info: MapInfo,
    counters: Arc<EngineCounters>,
}

impl Drop for MockMap {
    fn drop(&mut self) {
        self.counters.maps_alive.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct MockAttrs {
    summary: DifficultySummary,
    total_objects: u32,
    counters: Arc<EngineCounters>,
}

impl Drop for MockAttrs {
    fn drop(&mut self) {
        self.counters.attrs_alive.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Deterministic stand-in for the real engine. The numbers are arbitrary
/// but react to mods, combo, misses and accuracy so derivations are
/// observable.
#[derive(Clone, Debug)]
pub struct MockEngine {
    pub counters: Arc<EngineCounters>,
    pub info: MapInfo,
    pub max_combo: u32,
    pub slider_ticks: u32,
    pub slider_ends: u32,
}

impl MockEngine {
    pub fn new(total_objects: u32, max_combo: u32) -> Self {
        Self {
            counters: Arc::new(EngineCounters::default()),
            info: MapInfo {
                total_objects,
                cs: 4.0,
                ar: 9.0,
                od: 8.0,
                hp: 5.0,
                bpm: 180.0,
            },
            max_combo,
            slider_ticks: 30,
            slider_ends: 20,
        }
    }

    fn clock_rate(mods: u32) -> f64 {
        if mods & 64 != 0 {
            1.5
        } else if mods & 256 != 0 {
            0.75
        } else {
            1.0
        }
    }
}

impl Engine for MockEngine {
    type Map = MockMap;
    type DiffAttrs = MockAttrs;

    fn parse(&self, raw: &str) -> PfResult<MockMap> {
        self.counters.parse_calls.fetch_add(1, Ordering::SeqCst);
        if self.counters.fail_parse.load(Ordering::SeqCst) || raw.is_empty() {
            return Err(PpForgeError::Parse("unreadable beatmap".into()));
        }
        self.counters.maps_alive.fetch_add(1, Ordering::SeqCst);
        Ok(MockMap {
            info: self.info,
            counters: Arc::clone(&self.counters),
        })
    }

    fn map_info(&self, map: &MockMap) -> MapInfo {
        map.info
    }

    fn difficulty(
        &self,
        map: &MockMap,
        input: &DifficultyInput,
    ) -> PfResult<(MockAttrs, DifficultySummary)> {
        self.counters.difficulty_calls.fetch_add(1, Ordering::SeqCst);
        let summary = DifficultySummary {
            stars: 5.0 * Self::clock_rate(input.mods),
            max_combo: self.max_combo,
            slider_ticks: self.slider_ticks,
            slider_ends: self.slider_ends,
        };
        self.counters.attrs_alive.fetch_add(1, Ordering::SeqCst);
        Ok((
            MockAttrs {
                summary,
                total_objects: map.info.total_objects,
                counters: Arc::clone(&self.counters),
            },
            summary,
        ))
    }

    fn map_attributes(&self, map: &MockMap, input: &DifficultyInput) -> PfResult<MapAttributes> {
        let scale = if input.mods & 16 != 0 {
            1.4
        } else if input.mods & 2 != 0 {
            0.5
        } else {
            1.0
        };
        Ok(MapAttributes {
            ar: (f64::from(map.info.ar) * scale).min(11.0),
            od: (f64::from(map.info.od) * scale).min(11.0),
            cs: (f64::from(map.info.cs) * scale).min(10.0),
            hp: (f64::from(map.info.hp) * scale).min(10.0),
            clock_rate: Self::clock_rate(input.mods),
        })
    }

    fn performance(
        &self,
        attrs: &MockAttrs,
        input: &PerformanceInput,
    ) -> PfResult<PerformanceOutput> {
        self.counters
            .performance_calls
            .fetch_add(1, Ordering::SeqCst);
        if self.counters.fail_performance.load(Ordering::SeqCst) {
            return Err(PpForgeError::Calculation("engine rejected the input".into()));
        }

        let total = attrs.total_objects;
        let (accuracy, breakdown) = match input.hits {
            HitInput::Accuracy(acc) => {
                // House distribution: every lost point becomes a 100, so
                // `n100 * (200/300)` accounts for the accuracy deficit.
                let playable = total - input.misses.min(total);
                let n100 = ((((100.0 - acc) / 100.0) * f64::from(total)) * 1.5).round() as u32;
                let n100 = n100.min(playable);
                (
                    acc,
                    Some(HitBreakdown {
                        n300: playable - n100,
                        n100,
                        n50: 0,
                    }),
                )
            }
            HitInput::Exact { n300, n100, n50 } => {
                let hits = n300 + n100 + n50 + input.misses;
                let acc = if hits == 0 {
                    100.0
                } else {
                    f64::from(300 * n300 + 100 * n100 + 50 * n50) / f64::from(300 * hits) * 100.0
                };
                (acc, None)
            }
        };

        let combo_factor =
            f64::from(input.combo) / f64::from(attrs.summary.max_combo.max(1));
        let pp = attrs.summary.stars
            * 40.0
            * combo_factor
            * (accuracy / 100.0).powi(4)
            * 0.97_f64.powi(input.misses as i32);

        Ok(PerformanceOutput {
            pp,
            pp_aim: pp * 0.4,
            pp_speed: pp * 0.3,
            pp_accuracy: pp * 0.25,
            pp_flashlight: if input.mods & 1024 != 0 { pp * 0.05 } else { 0.0 },
            breakdown,
        })
    }
}

/// Serves fixed content for any id, counting fetches. `None` simulates an
/// unreachable source.
pub struct StaticSource {
    content: Option<String>,
    pub fetches: Arc<AtomicUsize>,
}

impl StaticSource {
    pub fn with_content(content: &str) -> Self {
        Self {
            content: Some(content.to_string()),
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            content: None,
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl BeatmapSource for StaticSource {
    fn fetch(&self, _beatmap_id: u64) -> PfResult<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.content
            .clone()
            .ok_or_else(|| PpForgeError::Fetch("HTTP status 404".into()))
    }
}

pub fn beatmap_meta(id: u64, max_combo: Option<u32>) -> BeatmapMeta {
    BeatmapMeta {
        id,
        version: "Insane".into(),
        max_combo,
    }
}

pub fn beatmapset_meta() -> BeatmapsetMeta {
    BeatmapsetMeta {
        artist: "Artist".into(),
        title: "Song".into(),
    }
}

/// Open a ready-to-use session over the mock engine, returning the shared
/// counters alongside it.
pub fn open_session(
    total_objects: u32,
    max_combo: u32,
) -> (CalculatorSession<MockEngine>, Arc<EngineCounters>) {
    let engine = MockEngine::new(total_objects, max_combo);
    let counters = Arc::clone(&engine.counters);
    let mut calculator = Calculator::new(engine, StaticSource::with_content("mock map"));
    let session = calculator
        .open_for_beatmap(&beatmap_meta(42, Some(max_combo)), &beatmapset_meta())
        .expect("session opens");
    (session, counters)
}
