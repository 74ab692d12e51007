use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use timeline_meter_core::{layout_value, resolve_pointer_value, EntityKind, MeterConfig, MeterInput, Span};

#[derive(Parser, Debug)]
#[command(
    name = "timeline-meter-cli",
    about = "Dựng bố cục thước thời gian từ danh sách dòng JSON."
)]
struct Args {
    /// Đường dẫn tới file JSON có `timestamps` (epoch ms) và `heights` tùy chọn.
    #[arg(short, long)]
    input: PathBuf,

    /// Chiều cao thước (px).
    #[arg(long, default_value_t = 400.0)]
    height: f64,

    /// Cỡ chữ nhãn (px).
    #[arg(long, default_value_t = 16.0)]
    font_size: f64,

    #[arg(long, default_value = "year")]
    label_span: Span,

    #[arg(long, default_value = "month")]
    mark_span: Span,

    /// Leave markers out of the render list.
    #[arg(long)]
    hide_markers: bool,

    /// Offset from UTC, in minutes, used to read calendar fields.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    utc_offset: i32,

    /// Also resolve a pointer at this many pixels from the meter top.
    #[arg(long)]
    pointer: Option<f64>,

    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("cannot read file {:?}", args.input))?;
    let input: MeterInput =
        serde_json::from_str(&data).with_context(|| format!("{:?} is not a meter input", args.input))?;

    let config = MeterConfig {
        label_span: args.label_span,
        mark_span: args.mark_span,
        show_marker: !args.hide_markers,
        utc_offset_minutes: args.utc_offset,
        ..MeterConfig::default()
    };
    let layout = layout_value(&input, &config, args.height, args.font_size)?;
    let pointer = args
        .pointer
        .map(|pixel| resolve_pointer_value(&input, &config, pixel, args.height))
        .transpose()?;

    if args.json {
        let output = serde_json::json!({ "layout": layout, "pointer": pointer });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "Labels: {} ({} visible)\nMarkers: {} ({} visible)",
        layout.labels, layout.collapse.visible_labels, layout.markers, layout.collapse.visible_markers
    );
    for entity in &layout.entities {
        match entity.kind {
            EntityKind::Label => println!(
                "{:>8}  {}",
                entity.css_top(),
                entity.text.as_deref().unwrap_or_default()
            ),
            EntityKind::Marker => println!("{:>8}  -", entity.css_top()),
        }
    }
    if let Some(resolution) = pointer {
        let row = resolution
            .row
            .map_or_else(|| "none".to_string(), |index| index.to_string());
        println!(
            "Pointer: row {row}, scroll fraction {:.4}",
            resolution.scroll_fraction
        );
    }

    Ok(())
}
