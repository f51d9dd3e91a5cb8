use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use ppforge::display::DisplayAttributes;
use ppforge::model::{BeatmapMeta, BeatmapsetMeta, PlayResult};
use ppforge::mods::ModSet;
use ppforge::rosu::RosuEngine;
use ppforge::score::ScoreInput;
use ppforge::session::{Calculator, CalculatorSession, Preset};
use ppforge::source::{BeatmapSource, FileSource, HttpSource};
use ppforge::{PfResult, PpForgeError};

use crate::reports;

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Path to a local .osu file.
    #[arg(long, conflicts_with = "beatmap_id")]
    pub map: Option<PathBuf>,

    /// Beatmap id to fetch from the osu! file endpoint.
    #[arg(long)]
    pub beatmap_id: Option<u64>,

    /// Prefill from a play JSON file in the score API shape.
    #[arg(long)]
    pub play: Option<PathBuf>,

    /// Mod acronyms, e.g. HDDT. NM for none.
    #[arg(long, default_value = "NM")]
    pub mods: String,

    /// Accuracy in percent (simple mode).
    #[arg(long)]
    pub acc: Option<f64>,

    #[arg(long)]
    pub combo: Option<u32>,

    #[arg(long, default_value_t = 0)]
    pub misses: u32,

    /// Exact 100 count (switches to advanced mode).
    #[arg(long)]
    pub n100: Option<u32>,

    /// Exact 50 count (switches to advanced mode).
    #[arg(long)]
    pub n50: Option<u32>,

    /// Use the lazer-style ruleset (slider tick/end statistics).
    #[arg(long, default_value_t = false)]
    pub lazer: bool,

    /// Apply a preset after the stats: fc or ss.
    #[arg(long)]
    pub preset: Option<Preset>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Serialize)]
struct SimulationReport<'a> {
    title: &'a str,
    mods: String,
    score: &'a ScoreInput,
    attributes: &'a DisplayAttributes,
}

pub fn run(args: SimulateArgs) -> PfResult<()> {
    let (source, beatmap_id, label): (Box<dyn BeatmapSource>, u64, String) =
        match (&args.map, args.beatmap_id) {
            (Some(path), _) => (
                Box::new(FileSource::new(path.clone())),
                0,
                path.display().to_string(),
            ),
            (None, Some(id)) => (Box::new(HttpSource::new()), id, format!("b/{id}")),
            (None, None) => {
                return Err(PpForgeError::Validation(
                    "either --map or --beatmap-id is required".into(),
                ))
            }
        };

    let play: Option<PlayResult> = match &args.play {
        Some(path) => Some(serde_json::from_str(&std::fs::read_to_string(path)?)?),
        None => None,
    };

    let beatmap = BeatmapMeta {
        id: beatmap_id,
        version: label.clone(),
        max_combo: None,
    };
    let beatmapset = BeatmapsetMeta {
        artist: String::new(),
        title: String::new(),
    };

    info!("📂 Loading beatmap: {label}");
    let mut calculator = Calculator::new(RosuEngine, source);
    let mut session = match &play {
        Some(play) => calculator.open_for_play(play, &beatmap, &beatmapset)?,
        None => {
            let mut session = calculator.open_for_beatmap(&beatmap, &beatmapset)?;
            // No recorded play to anchor on; start from a clean full combo.
            session.apply_preset(Preset::FullCombo)?;
            session
        }
    };

    apply_stats(&mut session, &args)?;

    if let Some(preset) = args.preset {
        session.apply_preset(preset)?;
    }

    let Some(attributes) = session.current_display_attributes() else {
        return Err(PpForgeError::Calculation(
            session
                .calculation_error()
                .unwrap_or("no calculation result")
                .to_string(),
        ));
    };

    if args.json {
        let report = SimulationReport {
            title: session.title(),
            mods: session.mods().to_string(),
            score: session.score(),
            attributes,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        reports::print_map_overview(&label, &session.mods().to_string(), attributes);
        reports::print_score(session.score(), session.is_advanced_mode());
        reports::print_performance(attributes);
    }

    Ok(())
}

fn apply_stats(session: &mut CalculatorSession<RosuEngine>, args: &SimulateArgs) -> PfResult<()> {
    let mods: ModSet = args.mods.parse()?;
    if !mods.is_empty() || args.play.is_none() {
        session.set_mods(mods)?;
    }

    if args.lazer {
        session.set_alternate_ruleset(true)?;
    }

    if args.n100.is_some() || args.n50.is_some() {
        session.set_hit_counts(
            args.n100.unwrap_or(0),
            args.n50.unwrap_or(0),
            args.misses,
        )?;
    } else if let Some(acc) = args.acc {
        session.set_advanced_mode(false)?;
        session.set_accuracy(acc)?;
        if args.misses > 0 {
            session.set_miss_count(args.misses)?;
        }
    } else if args.misses > 0 {
        session.set_miss_count(args.misses)?;
    }

    if let Some(combo) = args.combo {
        session.set_combo(combo)?;
    }

    Ok(())
}
