use clap::Args;
use std::path::PathBuf;
use tracing::info;

use ppforge::model::{BeatmapMeta, BeatmapsetMeta};
use ppforge::rosu::RosuEngine;
use ppforge::session::Calculator;
use ppforge::source::{BeatmapSource, FileSource, HttpSource};
use ppforge::{PfResult, PpForgeError};

use crate::reports;

#[derive(Args, Debug, Clone)]
pub struct InfoArgs {
    /// Path to a local .osu file.
    #[arg(long, conflicts_with = "beatmap_id")]
    pub map: Option<PathBuf>,

    /// Beatmap id to fetch from the osu! file endpoint.
    #[arg(long)]
    pub beatmap_id: Option<u64>,

    /// Mod acronyms, e.g. HDDT. NM for none.
    #[arg(long, default_value = "NM")]
    pub mods: String,

    /// Use the lazer-style ruleset.
    #[arg(long, default_value_t = false)]
    pub lazer: bool,
}

pub fn run(args: InfoArgs) -> PfResult<()> {
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
    let mut session = calculator.open_for_beatmap(&beatmap, &beatmapset)?;
    session.set_mods(args.mods.parse()?)?;
    if args.lazer {
        session.set_alternate_ruleset(true)?;
    }

    let Some(attributes) = session.current_display_attributes() else {
        return Err(PpForgeError::Calculation(
            session
                .calculation_error()
                .unwrap_or("no calculation result")
                .to_string(),
        ));
    };

    reports::print_map_overview(&label, &session.mods().to_string(), attributes);

    Ok(())
}
