//! Options recognised by the meter.

use std::time::Duration;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::span::Span;
use crate::MeterError;

/// Configuration of a meter. Every field has a default, so a partial JSON
/// object deserializes into a usable configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeterConfig {
    /// Coarsest unit labels are grouped by.
    pub label_span: Span,
    /// Unit markers are grouped by; must be finer than `label_span`.
    pub mark_span: Span,
    /// Whether markers are drawn at all.
    pub show_marker: bool,
    /// Fixed row height. When set, rows are spaced evenly by count.
    pub row_height: Option<f64>,
    /// Quiet window after the last resize before re-measuring.
    pub resize_debounce_ms: u64,
    /// Offset calendar fields are read in.
    pub utc_offset_minutes: i32,
    /// Font size used when the geometry provider cannot report one.
    pub fallback_font_size_px: f64,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            label_span: Span::Year,
            mark_span: Span::Month,
            show_marker: true,
            row_height: None,
            resize_debounce_ms: 300,
            utc_offset_minutes: 0,
            fallback_font_size_px: 16.0,
        }
    }
}

impl MeterConfig {
    /// Checks the span ordering and the offset.
    pub fn validate(&self) -> Result<(), MeterError> {
        if !self.mark_span.is_finer_than(self.label_span) {
            return Err(MeterError::SpanOrder {
                label: self.label_span,
                mark: self.mark_span,
            });
        }
        self.offset().map(|_| ())
    }

    pub fn offset(&self) -> Result<FixedOffset, MeterError> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(MeterError::InvalidOffset(self.utc_offset_minutes))
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    /// Row heights come from `row_height` rather than an explicit list.
    pub fn has_fixed_rows(&self) -> bool {
        self.row_height.is_some_and(|height| height > 0.0)
    }
}
