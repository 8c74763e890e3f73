//! Acceptance tests for the vertical layout engine.
//!
//! Scenarios A-E plus edits exactly at, one before and one after an
//! override's span.

use lines_layout::layout::{DecorationId, LineHeightsManager, LinesLayout};

fn decoration(name: &str) -> DecorationId {
    DecorationId::new(name).expect("valid decoration id")
}

fn layout(line_count: u32, line_height: i64) -> LinesLayout {
    LinesLayout::new(line_count, line_height, 0, 0, &[])
}

// ===== Scenario A: uniform document =====

#[test]
fn scenario_a_uniform_document() {
    let mut layout = layout(100, 20);

    assert_eq!(layout.vertical_offset_for_line_number(50, false), 980);
    assert_eq!(layout.lines_total_height(), 2000);
}

// ===== Scenario B: single override =====

#[test]
fn scenario_b_single_override() {
    let mut layout = layout(100, 20);
    layout.change_line_heights(|accessor| {
        accessor.insert_or_change_custom_line_height(&decoration("tall"), 10, 10, 50);
    });

    assert_eq!(layout.vertical_offset_for_line_number(11, false), 230);
    assert_eq!(layout.line_height_for_line_number(10), 50);
}

// ===== Scenario C: whitespace after line 5 =====

#[test]
fn scenario_c_whitespace_after_line_five() {
    let mut layout = layout(100, 20);
    layout.change_whitespace(|accessor| {
        accessor.insert_whitespace(5, 0, 30, 0);
    });

    assert_eq!(layout.vertical_offset_for_line_number(6, false), 130);
}

// ===== Scenario D: deleting an overridden line =====

#[test]
fn scenario_d_delete_span_with_override() {
    let mut layout = layout(10, 20);
    layout.change_line_heights(|accessor| {
        accessor.insert_or_change_custom_line_height(&decoration("d"), 3, 3, 40);
    });
    assert_eq!(layout.lines_total_height(), 9 * 20 + 40);

    layout.on_lines_deleted(3, 4);

    assert_eq!(layout.line_count(), 8);
    // The override collapses onto the first line after the edit, counted once.
    assert_eq!(layout.lines_total_height(), 7 * 20 + 40);
    assert_eq!(layout.line_height_for_line_number(3), 40);
    // Old line 5 is now line 3, old line 6 is now line 4.
    assert_eq!(layout.vertical_offset_for_line_number(4, false), 20 + 20 + 40);
    assert_eq!(layout.line_height_for_line_number(4), 20);
}

// ===== Scenario E: overlapping overrides =====

#[test]
fn scenario_e_overlapping_overrides_take_max() {
    let mut manager = LineHeightsManager::new(20, &[]);
    manager.insert_or_change_custom_line_height(&decoration("small"), 7, 7, 15);
    manager.insert_or_change_custom_line_height(&decoration("large"), 7, 7, 25);
    manager.commit();
    assert_eq!(manager.height_for_line_number(7), 25);

    manager.remove_custom_line_height(&decoration("large"));
    manager.commit();
    assert_eq!(manager.height_for_line_number(7), 15);
}

#[test]
fn scenario_e_through_the_layout() {
    let mut layout = layout(10, 20);
    layout.change_line_heights(|accessor| {
        accessor.insert_or_change_custom_line_height(&decoration("small"), 7, 7, 15);
        accessor.insert_or_change_custom_line_height(&decoration("large"), 7, 7, 25);
    });
    assert_eq!(layout.line_height_for_line_number(7), 25);

    layout.change_line_heights(|accessor| accessor.remove_custom_line_height(&decoration("large")));
    assert_eq!(layout.line_height_for_line_number(7), 15);
}

// ===== Edit boundaries around an override on lines 5..=7 =====

mod edit_boundaries {
    use super::*;

    const DEFAULT: i64 = 10;
    const TALL: i64 = 30;

    fn with_override() -> LinesLayout {
        let mut layout = layout(12, DEFAULT);
        layout.change_line_heights(|accessor| {
            accessor.insert_or_change_custom_line_height(&decoration("span"), 5, 7, TALL);
        });
        layout
    }

    fn heights(layout: &mut LinesLayout) -> Vec<i64> {
        (1..=layout.line_count())
            .map(|line| layout.line_height_for_line_number(line))
            .collect()
    }

    #[test]
    fn delete_line_before_span() {
        let mut layout = with_override();
        layout.on_lines_deleted(4, 4);
        assert_eq!(
            heights(&mut layout),
            vec![10, 10, 10, 30, 30, 30, 10, 10, 10, 10, 10]
        );
    }

    #[test]
    fn delete_first_line_of_span() {
        let mut layout = with_override();
        layout.on_lines_deleted(5, 5);
        assert_eq!(
            heights(&mut layout),
            vec![10, 10, 10, 10, 30, 30, 10, 10, 10, 10, 10]
        );
    }

    #[test]
    fn delete_line_after_span() {
        let mut layout = with_override();
        layout.on_lines_deleted(8, 8);
        assert_eq!(
            heights(&mut layout),
            vec![10, 10, 10, 10, 30, 30, 30, 10, 10, 10, 10]
        );
    }

    #[test]
    fn delete_last_line_of_span_and_the_next_keeps_span_height() {
        let mut layout = with_override();
        layout.on_lines_deleted(7, 8);
        assert_eq!(
            heights(&mut layout),
            vec![10, 10, 10, 10, 30, 30, 30, 10, 10, 10]
        );
    }

    #[test]
    fn delete_whole_span_collapses_to_one_line() {
        let mut layout = with_override();
        layout.on_lines_deleted(5, 7);
        assert_eq!(
            heights(&mut layout),
            vec![10, 10, 10, 10, 30, 10, 10, 10, 10]
        );
    }

    #[test]
    fn insert_before_span_shifts_it() {
        let mut layout = with_override();
        layout.on_lines_inserted(5, 6);
        assert_eq!(layout.line_height_for_line_number(5), DEFAULT);
        assert_eq!(layout.line_height_for_line_number(6), DEFAULT);
        assert_eq!(layout.line_height_for_line_number(7), TALL);
        assert_eq!(layout.line_height_for_line_number(9), TALL);
        assert_eq!(layout.line_height_for_line_number(10), DEFAULT);
    }

    #[test]
    fn insert_inside_span_extends_it() {
        let mut layout = with_override();
        layout.on_lines_inserted(6, 7);
        let expected: Vec<i64> = (1..=14)
            .map(|line| if (5..=9).contains(&line) { TALL } else { DEFAULT })
            .collect();
        assert_eq!(heights(&mut layout), expected);
    }

    #[test]
    fn insert_after_span_leaves_it() {
        let mut layout = with_override();
        layout.on_lines_inserted(8, 8);
        assert_eq!(layout.line_height_for_line_number(7), TALL);
        assert_eq!(layout.line_height_for_line_number(8), DEFAULT);
        assert_eq!(layout.lines_total_height(), 10 * DEFAULT + 3 * TALL);
    }
}

// ===== Empty batches =====

#[test]
fn empty_batches_report_no_change_and_keep_sums() {
    let mut layout = layout(20, 10);
    layout.change_whitespace(|accessor| {
        accessor.insert_whitespace(3, 0, 25, 0);
    });
    let before = layout.lines_total_height();

    assert!(!layout.change_whitespace(|_| {}));
    assert!(!layout.change_line_heights(|_| {}));
    assert_eq!(layout.lines_total_height(), before);
}
