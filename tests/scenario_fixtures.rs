//! Scenario harness tests against JSON fixtures.

use std::path::PathBuf;

use lines_layout::config::ResolvedConfig;
use lines_layout::scenario::{Scenario, ScenarioReport};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn run(name: &str) -> ScenarioReport {
    let scenario = Scenario::from_path(&fixture(name)).expect("fixture should parse");
    scenario.run(&ResolvedConfig::default())
}

#[test]
fn uniform_document_viewport() {
    let report = run("uniform.json");

    assert_eq!(report.lines_total_height, 20_000);
    assert_eq!(report.lines.start_line_number, 26);
    assert_eq!(report.lines.end_line_number, 35);
    assert_eq!(report.lines.centered_line_number, 31);
    assert_eq!(report.lines.completely_visible_start_line_number, 26);
    assert_eq!(report.lines.completely_visible_end_line_number, 35);
    assert_eq!(report.lines.relative_vertical_offset.first(), Some(&500));
    assert!(report.whitespaces.is_empty());
}

#[test]
fn zones_collapse_after_deletion() {
    let report = run("zones.json");

    assert_eq!(report.line_count, 42);
    assert_eq!(report.lines_total_height, 42 * 10 + 25 + 15 + 40);
    assert_eq!(report.whitespace_min_width, 320);

    assert_eq!(report.lines.start_line_number, 1);
    assert_eq!(report.lines.end_line_number, 4);
    assert_eq!(report.lines.relative_vertical_offset, vec![25, 35, 45, 55]);
    assert_eq!(report.lines.centered_line_number, 3);

    let zones: Vec<_> = report
        .whitespaces
        .iter()
        .map(|zone| (zone.after_line_number, zone.vertical_offset, zone.height))
        .collect();
    assert_eq!(zones, vec![(0, 0, 25), (4, 65, 15), (4, 80, 40)]);
}

#[test]
fn editor_session_replays_every_edit() {
    let report = run("editor_session.json");

    assert_eq!(report.line_count, 99);
    assert_eq!(report.default_line_height, 18);
    assert_eq!(report.lines_total_height, 6 + 91 * 18 + 27 + 7 * 22 + 50);
    assert_eq!(report.whitespaces_total_height, 50);

    let lines = &report.lines;
    assert_eq!(lines.start_line_number, 1);
    assert_eq!(lines.end_line_number, 19);
    assert_eq!(lines.relative_offset_for_line(1), Some(6));
    assert_eq!(lines.relative_offset_for_line(3), Some(6 + 18 + 27));
    assert_eq!(lines.relative_offset_for_line(11), Some(6 + 18 + 27 + 8 * 18 + 50));

    assert_eq!(report.whitespaces.len(), 1);
    assert_eq!(report.whitespaces[0].vertical_offset, 6 + 18 + 27 + 8 * 18);
}

#[test]
fn config_line_height_applies_when_scenario_omits_it() {
    let scenario = Scenario::from_json(r#"{"line_count": 10, "viewport": {"top": 0, "bottom": 50}}"#)
        .expect("valid scenario");
    let config = ResolvedConfig {
        default_line_height: 25,
        padding_bottom: 5,
        ..ResolvedConfig::default()
    };

    let report = scenario.run(&config);
    assert_eq!(report.lines_total_height, 255);
    assert_eq!(report.lines.end_line_number, 2);
}
