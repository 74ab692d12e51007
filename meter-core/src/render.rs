//! Flattens the visible part of the tree into what the view layer draws.

use serde::{Deserialize, Serialize};

use crate::tree::Timeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Label,
    Marker,
}

/// A visible label or marker and where it starts on the meter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderEntity {
    pub kind: EntityKind,
    pub text: Option<String>,
    /// Distance from the top of the meter, in percent of its height.
    pub top_offset_percent: f64,
}

impl RenderEntity {
    fn label(text: &str, offset: f64) -> Self {
        Self {
            kind: EntityKind::Label,
            text: Some(text.to_string()),
            top_offset_percent: offset * 100.0,
        }
    }

    fn marker(offset: f64) -> Self {
        Self {
            kind: EntityKind::Marker,
            text: None,
            top_offset_percent: offset * 100.0,
        }
    }

    pub fn is_label(&self) -> bool {
        self.kind == EntityKind::Label
    }

    /// The offset as a CSS `top` value, e.g. `"25%"`.
    pub fn css_top(&self) -> String {
        format!("{}%", self.top_offset_percent)
    }
}

/// Visible labels and, when `show_markers` is set, visible markers, top to
/// bottom. Hidden nodes still advance the running offset.
///
/// Returns `None` for a timeline without labels so callers keep whatever list
/// they had.
pub fn project(timeline: &Timeline, show_markers: bool) -> Option<Vec<RenderEntity>> {
    if timeline.is_empty() {
        return None;
    }

    let mut entities = Vec::new();
    let mut label_top = 0.0;
    for label in timeline.labels() {
        if label.visible {
            entities.push(RenderEntity::label(&label.text, label_top));
        }
        if show_markers {
            let mut marker_top = label_top;
            for marker in &label.markers {
                if marker.visible {
                    entities.push(RenderEntity::marker(marker_top));
                }
                marker_top += marker.total_height_fraction;
            }
        }
        label_top += label.total_height_fraction;
    }
    Some(entities)
}
