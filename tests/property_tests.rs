//! Property-based tests for the layout engine.
//!
//! Tests validate:
//! 1. Offsets and totals agree with a naive per-line model
//! 2. `line_number_at_or_after_vertical_offset` inverts `vertical_offset_for_line_number`
//! 3. Viewport data is ordered and sized consistently
//! 4. Inserting then deleting the same lines restores every offset
//! 5. Empty batches change nothing

use lines_layout::layout::{DecorationId, LineNumber, LinesLayout, Pixels, MIN_LINE_HEIGHT};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Document {
    line_count: LineNumber,
    default_line_height: Pixels,
    padding_top: Pixels,
    overrides: Vec<(LineNumber, LineNumber, Pixels)>,
    whitespaces: Vec<(LineNumber, i32, Pixels)>,
}

fn document() -> impl Strategy<Value = Document> {
    (1u32..60, 0i64..30, 0i64..20).prop_flat_map(|(line_count, default_line_height, padding_top)| {
        let overrides = prop::collection::vec(
            (1..=line_count, 0u32..5, 0i64..80)
                .prop_map(move |(start, len, height)| (start, (start + len).min(line_count), height)),
            0..6,
        );
        let whitespaces = prop::collection::vec((0..=line_count, -3i32..3, 0i64..50), 0..6);
        (overrides, whitespaces).prop_map(move |(overrides, whitespaces)| Document {
            line_count,
            default_line_height,
            padding_top,
            overrides,
            whitespaces,
        })
    })
}

fn build(document: &Document) -> LinesLayout {
    let mut layout = LinesLayout::new(
        document.line_count,
        document.default_line_height,
        document.padding_top,
        0,
        &[],
    );
    layout.change_line_heights(|accessor| {
        for (index, &(start, end, height)) in document.overrides.iter().enumerate() {
            let id = DecorationId::new(format!("d{index}")).expect("non-empty id");
            accessor.insert_or_change_custom_line_height(&id, start, end, height);
        }
    });
    layout.change_whitespace(|accessor| {
        for &(after, ordinal, height) in &document.whitespaces {
            accessor.insert_whitespace(after, ordinal, height, 0);
        }
    });
    layout
}

/// Effective height of every line, index 0 is line 1. Heights below
/// `MIN_LINE_HEIGHT` are raised to it.
fn model_heights(document: &Document) -> Vec<Pixels> {
    (1..=document.line_count)
        .map(|line| {
            document
                .overrides
                .iter()
                .filter(|(start, end, _)| (*start..=*end).contains(&line))
                .map(|(_, _, height)| *height)
                .max()
                .unwrap_or(document.default_line_height)
                .max(MIN_LINE_HEIGHT)
        })
        .collect()
}

fn model_offset(document: &Document, heights: &[Pixels], line: LineNumber) -> Pixels {
    let lines: Pixels = heights[..(line - 1) as usize].iter().sum();
    let whitespace: Pixels = document
        .whitespaces
        .iter()
        .filter(|(after, _, _)| *after < line)
        .map(|(_, _, height)| *height)
        .sum();
    document.padding_top + lines + whitespace
}

// ===== Property 1: Agreement with the naive model =====

proptest! {
    #[test]
    fn offsets_match_model(document in document()) {
        let mut layout = build(&document);
        let heights = model_heights(&document);

        for line in 1..=document.line_count {
            prop_assert_eq!(
                layout.line_height_for_line_number(line),
                heights[(line - 1) as usize],
                "height of line {}", line
            );
            prop_assert_eq!(
                layout.vertical_offset_for_line_number(line, false),
                model_offset(&document, &heights, line),
                "offset of line {}", line
            );
        }
    }

    #[test]
    fn total_height_matches_model(document in document()) {
        let mut layout = build(&document);
        let heights = model_heights(&document);
        let whitespace: Pixels = document.whitespaces.iter().map(|(_, _, height)| height).sum();

        prop_assert_eq!(
            layout.lines_total_height(),
            document.padding_top + heights.iter().sum::<Pixels>() + whitespace
        );
        prop_assert_eq!(layout.whitespaces_total_height(), whitespace);
    }
}

// ===== Property 2: Inverse relationship =====

proptest! {
    #[test]
    fn line_at_offset_inverts_offset_for_line(document in document()) {
        let mut layout = build(&document);
        for line in 1..=document.line_count {
            let offset = layout.vertical_offset_for_line_number(line, false);
            prop_assert_eq!(layout.line_number_at_or_after_vertical_offset(offset), line);
        }
    }
}

// ===== Property 3: Viewport consistency =====

proptest! {
    #[test]
    fn viewport_is_ordered(document in document(), top in -50i64..2000, span in 1i64..500) {
        let mut layout = build(&document);
        let data = layout.lines_viewport_data(top, top + span);

        prop_assert!(data.start_line_number <= data.end_line_number);
        prop_assert_eq!(
            data.relative_vertical_offset.len(),
            (data.end_line_number - data.start_line_number + 1) as usize
        );
        prop_assert!(data
            .relative_vertical_offset
            .windows(2)
            .all(|pair| pair[0] < pair[1]));
        prop_assert!(data.start_line_number <= data.centered_line_number);
        prop_assert!(data.centered_line_number <= data.end_line_number);
    }

    #[test]
    fn viewport_offsets_match_absolute_offsets(document in document(), top in 0i64..1000) {
        let mut layout = build(&document);
        let data = layout.lines_viewport_data(top, top + 200);

        for line in data.line_numbers() {
            let relative = data.relative_offset_for_line(line).expect("visible line");
            prop_assert_eq!(
                relative + data.big_numbers_delta,
                layout.vertical_offset_for_line_number(line, false)
            );
        }
    }
}

// ===== Property 4: Insert/delete round trip =====

proptest! {
    #[test]
    fn insert_then_delete_restores_offsets(
        document in document(),
        position in 1u32..60,
        count in 1u32..5,
    ) {
        let mut layout = build(&document);
        let from = position.min(document.line_count);
        let to = from + count - 1;

        let offsets: Vec<Pixels> = (1..=document.line_count)
            .map(|line| layout.vertical_offset_for_line_number(line, false))
            .collect();
        let heights: Vec<Pixels> = (1..=document.line_count)
            .map(|line| layout.line_height_for_line_number(line))
            .collect();

        layout.on_lines_inserted(from, to);
        layout.on_lines_deleted(from, to);

        prop_assert_eq!(layout.line_count(), document.line_count);
        for line in 1..=document.line_count {
            prop_assert_eq!(layout.line_height_for_line_number(line), heights[(line - 1) as usize]);
            prop_assert_eq!(
                layout.vertical_offset_for_line_number(line, false),
                offsets[(line - 1) as usize]
            );
        }
    }
}

// ===== Property 5: Empty batches =====

proptest! {
    #[test]
    fn empty_batches_change_nothing(document in document()) {
        let mut layout = build(&document);
        let before = layout.lines_total_height();

        let whitespace_changed = layout.change_whitespace(|_| {});
        prop_assert!(!whitespace_changed);
        let line_heights_changed = layout.change_line_heights(|_| {});
        prop_assert!(!line_heights_changed);
        prop_assert_eq!(layout.lines_total_height(), before);
    }
}
