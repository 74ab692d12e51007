//! Decides which labels and markers fit on a meter of a given pixel height.

use serde::Serialize;
use tracing::debug;

use crate::tree::{Label, Marker, Timeline};
use crate::MeterError;

/// Minimum gap, on top of the font size, between two visible labels.
pub const LABEL_MARGIN: f64 = 15.0;
/// Minimum gap between a marker and its visible neighbour.
pub const MARKER_MARGIN: f64 = 8.0;

/// Counts of what survived a collapse pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollapseSummary {
    pub visible_labels: usize,
    pub visible_markers: usize,
}

/// Recomputes every visibility flag of `timeline` for a meter
/// `meter_height_px` tall drawn with `font_size_px` text.
///
/// Flags are reset first, so the result depends only on the tree and the
/// geometry, never on an earlier pass.
pub fn measure(
    timeline: &mut Timeline,
    meter_height_px: f64,
    font_size_px: f64,
) -> Result<CollapseSummary, MeterError> {
    if !(meter_height_px.is_finite() && meter_height_px > 0.0) || !font_size_px.is_finite() {
        return Err(MeterError::InvalidGeometry);
    }

    timeline.reset_visibility();
    let labels = timeline.labels_mut();
    collapse_labels(labels, meter_height_px, font_size_px);
    collapse_markers(labels, meter_height_px, font_size_px);

    let summary = CollapseSummary {
        visible_labels: labels.iter().filter(|label| label.visible).count(),
        visible_markers: labels
            .iter()
            .flat_map(|label| &label.markers)
            .filter(|marker| marker.visible)
            .count(),
    };
    debug!(
        labels = labels.len(),
        visible_labels = summary.visible_labels,
        visible_markers = summary.visible_markers,
        meter_height_px,
        "collapsed meter"
    );
    Ok(summary)
}

/// Walks inward from both ends at once. Each side keeps its outermost label
/// and hides the next ones until the accumulated distance reaches the label
/// threshold. The last label is outside the scan and always stays.
fn collapse_labels(labels: &mut [Label], height: f64, font_size: f64) {
    if labels.len() < 2 {
        return;
    }
    let threshold = font_size + LABEL_MARGIN;
    let (mut lp, mut rp) = (0, labels.len() - 2);
    let (mut from_top, mut from_bottom) = (0.0, 0.0);

    while lp < rp {
        from_top += labels[lp].total_height_fraction * height;
        lp += 1;
        if from_top < threshold {
            labels[lp].visible = false;
        } else {
            from_top = 0.0;
        }

        from_bottom += labels[rp].total_height_fraction * height;
        if from_bottom < threshold {
            labels[rp].visible = false;
        } else {
            from_bottom = 0.0;
        }
        rp -= 1;
    }
}

fn collapse_markers(labels: &mut [Label], height: f64, font_size: f64) {
    let label_gap = font_size + MARKER_MARGIN;
    let mut budget = 0.0;

    for index in 0..labels.len() {
        if labels[index].visible {
            if index > 0 {
                hide_trailing_markers(&mut labels[index - 1].markers, height);
            }
            budget = -label_gap;
        }
        for marker in &mut labels[index].markers {
            let marker_px = marker.total_height_fraction * height;
            if budget > MARKER_MARGIN {
                marker.visible = true;
                budget = marker_px;
            } else {
                budget += marker_px;
            }
        }
    }
}

/// Hides markers at the end of a label that sit too close to the next label.
/// The first marker is never touched here.
fn hide_trailing_markers(markers: &mut [Marker], height: f64) {
    let Some(mut cursor) = markers.len().checked_sub(1) else {
        return;
    };
    let mut trailing = markers[cursor].total_height_fraction * height;
    while trailing < MARKER_MARGIN && cursor > 0 {
        markers[cursor].visible = false;
        cursor -= 1;
        trailing += markers[cursor].total_height_fraction * height;
    }
}
