use chrono::{Datelike, FixedOffset, TimeZone, Utc};
use timeline_meter_core::collapse;
use timeline_meter_core::pointer;
use timeline_meter_core::render;
use timeline_meter_core::rows::{rows_from_heights, rows_from_timestamps};
use timeline_meter_core::{EntityKind, Row, Span, Timeline};

const EPSILON: f64 = 1e-9;

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

fn ms(y: i32, m: u32, d: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap().timestamp_millis()
}

/// Irregular rows over three years with uneven heights.
fn irregular_rows() -> Vec<Row> {
    let stamps: Vec<i64> = [
        (2022, 3, 2),
        (2022, 3, 28),
        (2022, 9, 1),
        (2023, 1, 5),
        (2023, 1, 6),
        (2023, 2, 1),
        (2023, 12, 30),
        (2024, 6, 15),
    ]
    .iter()
    .map(|&(y, m, d)| ms(y, m, d))
    .collect();
    let heights = [3.0, 1.0, 7.0, 2.0, 2.0, 5.0, 1.0, 9.0];
    rows_from_heights(&heights, Some(stamps.as_slice()), utc()).unwrap()
}

#[test]
fn label_heights_sum_to_one() {
    let timeline = Timeline::build(&irregular_rows(), Span::Year, Span::Month);
    assert!((timeline.total_height_fraction() - 1.0).abs() < EPSILON);
}

#[test]
fn marker_heights_sum_to_their_label() {
    let timeline = Timeline::build(&irregular_rows(), Span::Year, Span::Month);
    for label in timeline.labels() {
        let markers: f64 = label.markers.iter().map(|m| m.total_height_fraction).sum();
        assert!((markers - label.total_height_fraction).abs() < EPSILON);
    }
}

#[test]
fn tree_partitions_rows_in_order() {
    let rows = irregular_rows();
    let timeline = Timeline::build(&rows, Span::Year, Span::Month);

    let flattened: Vec<&Row> = timeline
        .labels()
        .iter()
        .flat_map(|label| &label.markers)
        .flat_map(|marker| &marker.items)
        .collect();
    assert_eq!(flattened.len(), rows.len());
    assert!(flattened.iter().zip(&rows).all(|(a, b)| *a == b));

    for marker in timeline.labels().iter().flat_map(|label| &label.markers) {
        let lead = marker.lead_date().unwrap();
        assert!(marker.items.iter().all(|row| {
            let date = row.date.unwrap();
            date.year() == lead.year() && date.month() == lead.month()
        }));
    }
    assert_eq!(timeline.len(), 3);
    assert_eq!(timeline.marker_count(), 6);
}

#[test]
fn twelve_months_make_one_label_with_twelve_markers() {
    let stamps: Vec<i64> = (1..=12).map(|m| ms(2024, m, 1)).collect();
    let timeline = Timeline::build(&rows_from_timestamps(&stamps, utc()), Span::Year, Span::Month);

    assert_eq!(timeline.len(), 1);
    let label = &timeline.labels()[0];
    assert_eq!(label.text, "2024");
    assert_eq!(label.markers.len(), 12);
    assert!(label
        .markers
        .iter()
        .all(|m| (m.total_height_fraction - 1.0 / 12.0).abs() < EPSILON));
}

#[test]
fn twenty_years_on_a_short_meter_keep_only_the_ends() {
    let stamps: Vec<i64> = (2005..=2024).map(|y| ms(y, 1, 1)).collect();
    let mut timeline = Timeline::build(&rows_from_timestamps(&stamps, utc()), Span::Year, Span::Month);
    collapse::measure(&mut timeline, 50.0, 12.0).unwrap();

    let labels = timeline.labels();
    assert_eq!(labels.len(), 20);
    assert!(labels[0].visible);
    assert!(labels[19].visible);
    assert!(labels[1..19].iter().all(|label| !label.visible));

    let entities = render::project(&timeline, true).unwrap();
    let tops: Vec<f64> = entities
        .iter()
        .filter(|e| e.kind == EntityKind::Label)
        .map(|e| e.top_offset_percent)
        .collect();
    let gap_px = (tops[1] - tops[0]) / 100.0 * 50.0;
    assert!(gap_px >= 12.0 + 15.0);
}

#[test]
fn last_label_survives_any_height() {
    let rows = irregular_rows();
    for height in [1.0, 10.0, 30.0, 80.0, 300.0] {
        let mut timeline = Timeline::build(&rows, Span::Year, Span::Month);
        collapse::measure(&mut timeline, height, 14.0).unwrap();
        assert!(timeline.labels().last().unwrap().visible, "height {height}");
    }
}

#[test]
fn projected_offsets_are_ordered_and_bounded() {
    let mut timeline = Timeline::build(&irregular_rows(), Span::Year, Span::Month);
    collapse::measure(&mut timeline, 600.0, 12.0).unwrap();
    let entities = render::project(&timeline, true).unwrap();
    assert!(!entities.is_empty());
    assert!(entities
        .windows(2)
        .all(|pair| pair[0].top_offset_percent <= pair[1].top_offset_percent));
    assert!(entities
        .iter()
        .all(|e| (0.0..=100.0).contains(&e.top_offset_percent)));
}

#[test]
fn pointer_edges_resolve_to_first_and_last_rows() {
    let rows = irregular_rows();
    assert_eq!(pointer::resolve(0.0, 300.0, &rows).unwrap().row, Some(0));
    assert_eq!(pointer::resolve(300.0, 300.0, &rows).unwrap().row, Some(rows.len() - 1));
    for pixel in [-1e6, -1.0, 0.0, 150.0, 299.9, 301.0, 1e6] {
        let fraction = pointer::resolve(pixel, 300.0, &rows).unwrap().scroll_fraction;
        assert!((0.0..=1.0).contains(&fraction));
    }
}
