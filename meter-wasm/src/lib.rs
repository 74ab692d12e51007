//! Bridge WASM <-> JavaScript trung lập framework cho thước thời gian.

use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use timeline_meter_core::{geometry, MeterConfig, MeterError, MeterInput};
use wasm_bindgen::prelude::*;

/// Cấu hình phía JavaScript; trường vắng mặt giữ giá trị mặc định.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsMeterConfig {
    #[serde(default)]
    label_span: Option<String>,
    #[serde(default)]
    mark_span: Option<String>,
    #[serde(default)]
    show_marker: Option<bool>,
    #[serde(default)]
    row_height: Option<f64>,
    #[serde(default)]
    utc_offset_minutes: Option<i32>,
}

impl TryFrom<JsMeterConfig> for MeterConfig {
    type Error = MeterError;

    fn try_from(cfg: JsMeterConfig) -> Result<Self, Self::Error> {
        let mut base = MeterConfig::default();
        if let Some(span) = cfg.label_span {
            base.label_span = span.parse()?;
        }
        if let Some(span) = cfg.mark_span {
            base.mark_span = span.parse()?;
        }
        if let Some(show) = cfg.show_marker {
            base.show_marker = show;
        }
        if cfg.row_height.is_some() {
            base.row_height = cfg.row_height;
        }
        if let Some(minutes) = cfg.utc_offset_minutes {
            base.utc_offset_minutes = minutes;
        }
        base.validate()?;
        Ok(base)
    }
}

fn read_config(config: Option<JsValue>) -> Result<MeterConfig, JsValue> {
    let js_cfg = match config {
        Some(value) if !value.is_undefined() && !value.is_null() => from_value::<JsMeterConfig>(value)
            .map_err(|err| JsValue::from_str(&format!("cannot read config: {err}")))?,
        _ => JsMeterConfig::default(),
    };
    MeterConfig::try_from(js_cfg).map_err(|err| JsValue::from_str(&format_meter_error(err)))
}

fn read_input(input: JsValue) -> Result<MeterInput, JsValue> {
    from_value::<MeterInput>(input).map_err(|err| JsValue::from_str(&format!("cannot read meter input: {err}")))
}

/// Lays out the meter and returns `{ labels, markers, collapse, entities }`.
#[wasm_bindgen(js_name = layoutMeter)]
pub fn layout_meter(
    input: JsValue,
    meter_height_px: f64,
    font_size_px: f64,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let cfg = read_config(config)?;
    let input = read_input(input)?;

    let layout = timeline_meter_core::layout_value(&input, &cfg, meter_height_px, font_size_px)
        .map_err(|err| JsValue::from_str(&format_meter_error(err)))?;

    to_value(&layout).map_err(|err| JsValue::from_str(&format!("cannot serialize layout: {err}")))
}

/// Maps a pointer offset from the meter top to `{ row, scrollFraction }`.
#[wasm_bindgen(js_name = resolvePointer)]
pub fn resolve_pointer(
    input: JsValue,
    pixel: f64,
    meter_height_px: f64,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    let cfg = read_config(config)?;
    let input = read_input(input)?;

    let resolution = timeline_meter_core::resolve_pointer_value(&input, &cfg, pixel, meter_height_px)
        .map_err(|err| JsValue::from_str(&format_meter_error(err)))?;

    to_value(&resolution).map_err(|err| JsValue::from_str(&format!("cannot serialize resolution: {err}")))
}

/// Reads `getComputedStyle(meter).fontSize`.
#[wasm_bindgen(js_name = parseFontSize)]
pub fn parse_font_size(css: &str) -> Option<f64> {
    geometry::parse_font_size(css)
}

fn format_meter_error(err: MeterError) -> String {
    format!("Timeline meter error: {err}")
}
