//! Resource discipline: engine handles are acquired and released in pairs,
//! difficulty attributes persist across stat edits, and failure paths leak
//! nothing.

use std::sync::atomic::Ordering;

use ppforge::mods::Mod;
use ppforge::session::Preset;

mod common;
use common::open_session;

#[test]
fn one_map_and_one_difficulty_handle_per_session() {
    let (session, counters) = open_session(500, 700);

    assert_eq!(counters.maps_alive.load(Ordering::SeqCst), 1);
    assert_eq!(counters.attrs_alive.load(Ordering::SeqCst), 1);
    assert_eq!(counters.difficulty_calls.load(Ordering::SeqCst), 1);

    drop(session);
    assert_eq!(counters.maps_alive.load(Ordering::SeqCst), 0);
    assert_eq!(counters.attrs_alive.load(Ordering::SeqCst), 0);
}

#[test]
fn stat_edits_reuse_the_cached_difficulty() {
    let (mut session, counters) = open_session(500, 700);

    session.set_hit_counts(10, 5, 2).unwrap();
    session.set_combo(400).unwrap();
    session.set_miss_count(7).unwrap();
    session.apply_preset(Preset::FullCombo).unwrap();

    // Four recalculations, still the single difficulty computation from
    // opening.
    assert_eq!(counters.difficulty_calls.load(Ordering::SeqCst), 1);
    assert_eq!(counters.attrs_alive.load(Ordering::SeqCst), 1);
}

#[test]
fn modifier_changes_swap_the_difficulty_handle() {
    let (mut session, counters) = open_session(500, 700);

    session.toggle_mod(Mod::DoubleTime).unwrap();
    assert_eq!(counters.difficulty_calls.load(Ordering::SeqCst), 2);
    // The stale handle was dropped with the swap.
    assert_eq!(counters.attrs_alive.load(Ordering::SeqCst), 1);

    // Same key again: no recomputation.
    session.set_combo(500).unwrap();
    assert_eq!(counters.difficulty_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn ruleset_flag_is_part_of_the_difficulty_key() {
    let (mut session, counters) = open_session(500, 700);

    session.set_alternate_ruleset(true).unwrap();
    assert_eq!(counters.difficulty_calls.load(Ordering::SeqCst), 2);
    session.set_alternate_ruleset(false).unwrap();
    assert_eq!(counters.difficulty_calls.load(Ordering::SeqCst), 3);
    assert_eq!(counters.attrs_alive.load(Ordering::SeqCst), 1);
}

#[test]
fn failed_calculations_leak_nothing() {
    let (mut session, counters) = open_session(500, 700);

    counters.fail_performance.store(true, Ordering::SeqCst);
    for _ in 0..5 {
        let _ = session.set_combo(100);
        let _ = session.recalculate();
    }

    assert_eq!(counters.maps_alive.load(Ordering::SeqCst), 1);
    assert_eq!(counters.attrs_alive.load(Ordering::SeqCst), 1);

    // The difficulty attributes survived the failures and keep serving
    // once the engine recovers.
    counters.fail_performance.store(false, Ordering::SeqCst);
    session.recalculate().unwrap();
    assert_eq!(counters.difficulty_calls.load(Ordering::SeqCst), 1);

    drop(session);
    assert_eq!(counters.maps_alive.load(Ordering::SeqCst), 0);
    assert_eq!(counters.attrs_alive.load(Ordering::SeqCst), 0);
}
