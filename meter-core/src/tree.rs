//! Groups rows into the label → marker tree drawn on the meter.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::rows::Row;
use crate::span::{self, Span};

/// Consecutive rows sharing one mark-span unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub items: Vec<Row>,
    pub total_height_fraction: f64,
    pub visible: bool,
}

impl Marker {
    fn seeded(row: Row) -> Self {
        Self {
            total_height_fraction: row.height_fraction,
            items: vec![row],
            visible: false,
        }
    }

    fn push(&mut self, row: Row) {
        self.total_height_fraction += row.height_fraction;
        self.items.push(row);
    }

    /// Date of the first row; later rows are compared against it.
    pub fn lead_date(&self) -> Option<&DateTime<FixedOffset>> {
        self.items.first().and_then(|row| row.date.as_ref())
    }
}

/// Consecutive markers sharing one label-span unit. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub text: String,
    pub lead_date: Option<DateTime<FixedOffset>>,
    pub markers: Vec<Marker>,
    pub total_height_fraction: f64,
    pub visible: bool,
}

impl Label {
    fn seeded(marker: Marker, span: Span, need_parent_unit: bool) -> Self {
        let lead_date = marker.lead_date().copied();
        Self {
            text: span::label_text(lead_date.as_ref(), span, need_parent_unit),
            lead_date,
            markers: vec![marker],
            total_height_fraction: 0.0,
            visible: true,
        }
    }

    fn current_marker_lead(&self) -> Option<&DateTime<FixedOffset>> {
        self.markers.last().and_then(Marker::lead_date)
    }

    fn extend_current_marker(&mut self, row: Row) {
        if let Some(marker) = self.markers.last_mut() {
            marker.push(row);
        }
    }

    fn close(mut self) -> Self {
        self.total_height_fraction = self
            .markers
            .iter()
            .map(|marker| marker.total_height_fraction)
            .sum();
        self
    }
}

/// The whole meter tree, top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Timeline {
    labels: Vec<Label>,
}

impl Timeline {
    /// Groups `rows` in a single pass. `mark_span` must be finer than
    /// `label_span`; otherwise the grouping is meaningless but still total.
    ///
    /// A row joins the current marker when it shares a mark unit with the
    /// marker's *first* row. A new marker joins the current label when it shares
    /// a label unit with the label's lead date. A new label names its parent
    /// unit only when that unit changed too.
    pub fn build(rows: &[Row], label_span: Span, mark_span: Span) -> Self {
        let Some((first, rest)) = rows.split_first() else {
            return Self::default();
        };

        let mut labels = Vec::new();
        let mut label = Label::seeded(Marker::seeded(first.clone()), label_span, true);

        for row in rest {
            let marker_match = span::compare(label.current_marker_lead(), row.date.as_ref(), mark_span);
            if marker_match.same {
                label.extend_current_marker(row.clone());
                continue;
            }

            let marker = Marker::seeded(row.clone());
            let label_match = span::compare(label.lead_date.as_ref(), row.date.as_ref(), label_span);
            if label_match.same {
                label.markers.push(marker);
            } else {
                labels.push(label.close());
                label = Label::seeded(marker, label_span, !label_match.parent_same);
            }
        }
        labels.push(label.close());

        Self { labels }
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub(crate) fn labels_mut(&mut self) -> &mut [Label] {
        &mut self.labels
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn marker_count(&self) -> usize {
        self.labels.iter().map(|label| label.markers.len()).sum()
    }

    pub fn row_count(&self) -> usize {
        self.labels
            .iter()
            .flat_map(|label| &label.markers)
            .map(|marker| marker.items.len())
            .sum()
    }

    pub fn total_height_fraction(&self) -> f64 {
        self.labels.iter().map(|label| label.total_height_fraction).sum()
    }

    /// Puts every label back on and every marker off, the state before a
    /// collapse pass.
    pub(crate) fn reset_visibility(&mut self) {
        for label in &mut self.labels {
            label.visible = true;
            for marker in &mut label.markers {
                marker.visible = false;
            }
        }
    }
}
