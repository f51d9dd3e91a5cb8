use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ppforge::display::{DisplayAttributes, Readout, Trend};
use ppforge::score::ScoreInput;

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn readout_cell(r: &Readout) -> Cell {
    let cell = Cell::new(format!("{:.2}", r.value)).set_alignment(CellAlignment::Right);
    match r.trend {
        Trend::Harder => cell.fg(Color::Red),
        Trend::Easier => cell.fg(Color::Green),
        Trend::Unchanged => cell,
    }
}

fn pp_cell(value: f64) -> Cell {
    Cell::new(format!("{value:.2}")).set_alignment(CellAlignment::Right)
}

pub fn print_map_overview(label: &str, mods: &str, attrs: &DisplayAttributes) {
    println!("\nMap: {label}  Mods: {mods}");
    let mut table = new_table();
    table.set_header(vec![
        "Stars", "Max Combo", "Objects", "AR", "OD", "CS", "HP", "BPM",
    ]);
    table.add_row(vec![
        Cell::new(format!("{:.2}", attrs.stars)).add_attribute(Attribute::Bold),
        Cell::new(attrs.max_combo).set_alignment(CellAlignment::Right),
        Cell::new(attrs.total_objects).set_alignment(CellAlignment::Right),
        readout_cell(&attrs.ar),
        readout_cell(&attrs.od),
        readout_cell(&attrs.cs),
        readout_cell(&attrs.hp),
        readout_cell(&attrs.bpm),
    ]);
    println!("{table}");
}

pub fn print_score(score: &ScoreInput, advanced: bool) {
    let c = score.counts();
    let mut table = new_table();
    table.set_header(vec![
        "Mode", "Accuracy", "Combo", "300s", "100s", "50s", "Misses",
    ]);
    table.add_row(vec![
        Cell::new(if advanced { "advanced" } else { "simple" }),
        Cell::new(format!("{:.2}%", score.accuracy())).set_alignment(CellAlignment::Right),
        Cell::new(score.combo()).set_alignment(CellAlignment::Right),
        Cell::new(c.n300).set_alignment(CellAlignment::Right),
        Cell::new(c.n100).set_alignment(CellAlignment::Right),
        Cell::new(c.n50).set_alignment(CellAlignment::Right),
        Cell::new(c.misses).set_alignment(CellAlignment::Right),
    ]);
    println!("{table}");
}

pub fn print_performance(attrs: &DisplayAttributes) {
    let mut table = new_table();
    table.set_header(vec!["PP", "Aim", "Speed", "Accuracy", "Flashlight", "If FC"]);
    table.add_row(vec![
        pp_cell(attrs.pp).add_attribute(Attribute::Bold),
        pp_cell(attrs.pp_aim),
        pp_cell(attrs.pp_speed),
        pp_cell(attrs.pp_accuracy),
        pp_cell(attrs.pp_flashlight),
        pp_cell(attrs.full_combo_pp),
    ]);
    println!("{table}");
}
