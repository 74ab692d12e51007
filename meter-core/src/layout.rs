//! One-shot layout: rows in, render list out, no widget state.

use serde::{Deserialize, Serialize};

use crate::collapse::{self, CollapseSummary};
use crate::config::MeterConfig;
use crate::pointer::{self, PointerResolution};
use crate::render::{self, RenderEntity};
use crate::rows::{self, Row};
use crate::tree::Timeline;
use crate::MeterError;

/// Serialized meter input: one timestamp per row, optionally with heights.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MeterInput {
    pub timestamps: Vec<i64>,
    #[serde(default)]
    pub heights: Option<Vec<f64>>,
}

impl MeterInput {
    /// Heights when given, even spacing otherwise.
    pub fn rows(&self, config: &MeterConfig) -> Result<Vec<Row>, MeterError> {
        let offset = config.offset()?;
        let rows = match &self.heights {
            Some(heights) => rows::rows_from_heights(heights, Some(self.timestamps.as_slice()), offset)?,
            None => rows::rows_from_timestamps(&self.timestamps, offset),
        };
        if rows.is_empty() {
            return Err(MeterError::MissingData);
        }
        Ok(rows)
    }
}

/// Result of a headless layout.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MeterLayout {
    pub labels: usize,
    pub markers: usize,
    pub collapse: CollapseSummary,
    pub entities: Vec<RenderEntity>,
}

/// Lays out a meter from a JSON [`MeterInput`].
pub fn layout_str(
    input_json: &str,
    config: &MeterConfig,
    meter_height_px: f64,
    font_size_px: f64,
) -> Result<MeterLayout, MeterError> {
    let input: MeterInput =
        serde_json::from_str(input_json).map_err(|err| MeterError::Parse(err.to_string()))?;
    layout_value(&input, config, meter_height_px, font_size_px)
}

/// Lays out a meter from an already parsed [`MeterInput`].
pub fn layout_value(
    input: &MeterInput,
    config: &MeterConfig,
    meter_height_px: f64,
    font_size_px: f64,
) -> Result<MeterLayout, MeterError> {
    config.validate()?;
    let rows = input.rows(config)?;

    let mut timeline = Timeline::build(&rows, config.label_span, config.mark_span);
    let collapse = collapse::measure(&mut timeline, meter_height_px, font_size_px)?;
    let entities = render::project(&timeline, config.show_marker).unwrap_or_default();

    Ok(MeterLayout {
        labels: timeline.len(),
        markers: timeline.marker_count(),
        collapse,
        entities,
    })
}

/// Resolves a pointer position against the rows of `input`.
pub fn resolve_pointer_value(
    input: &MeterInput,
    config: &MeterConfig,
    pixel: f64,
    meter_height_px: f64,
) -> Result<PointerResolution, MeterError> {
    let rows = input.rows(config)?;
    pointer::resolve(pixel, meter_height_px, &rows)
}
