//! Turns timestamps and row heights into normalized rows.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use tracing::warn;

use crate::MeterError;

/// One content row: its date and its share of the total content height.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub date: Option<DateTime<FixedOffset>>,
    pub height_fraction: f64,
}

impl Row {
    pub fn new(date: Option<DateTime<FixedOffset>>, height_fraction: f64) -> Self {
        Self {
            date,
            height_fraction,
        }
    }
}

/// Converts epoch milliseconds to a date read in `offset`.
pub fn to_date(timestamp_ms: i64, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms).map(|date| date.with_timezone(&offset))
}

/// Rows of equal height, one per timestamp.
pub fn rows_from_timestamps(timestamps: &[i64], offset: FixedOffset) -> Vec<Row> {
    let fraction = 1.0 / timestamps.len() as f64;
    timestamps
        .iter()
        .map(|&timestamp| Row::new(to_date(timestamp, offset), fraction))
        .collect()
}

/// Rows sized by `heights`, normalized so their fractions sum to one.
///
/// Dates are taken from `timestamps` by index; a missing or zero timestamp
/// leaves the row undated.
pub fn rows_from_heights(
    heights: &[f64],
    timestamps: Option<&[i64]>,
    offset: FixedOffset,
) -> Result<Vec<Row>, MeterError> {
    if let Some(bad) = heights.iter().find(|h| !h.is_finite() || **h < 0.0) {
        return Err(MeterError::InvalidHeights(format!("row height {bad}")));
    }
    let total: f64 = heights.iter().sum();
    if heights.is_empty() {
        return Ok(Vec::new());
    }
    if !total.is_finite() || total <= 0.0 {
        return Err(MeterError::InvalidHeights(format!("total height {total}")));
    }

    let rows = heights
        .iter()
        .enumerate()
        .map(|(index, height)| {
            let date = timestamps
                .and_then(|list| list.get(index))
                .and_then(|&timestamp| row_date(timestamp, offset));
            Row::new(date, height / total)
        })
        .collect();
    Ok(rows)
}

/// Date of a height-list row; zero stands for "no date".
fn row_date(timestamp_ms: i64, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    if timestamp_ms == 0 {
        return None;
    }
    to_date(timestamp_ms, offset)
}

/// Rewrites row dates in place, with zero clearing the date as in
/// [`rows_from_heights`]. Returns `false`, leaving the rows untouched, when
/// the lengths disagree.
pub fn rewrite_dates(rows: &mut [Row], timestamps: &[i64], offset: FixedOffset) -> bool {
    if rows.len() != timestamps.len() {
        warn!(
            rows = rows.len(),
            timestamps = timestamps.len(),
            "timestamp list length differs from row count; dates kept"
        );
        return false;
    }
    for (row, &timestamp) in rows.iter_mut().zip(timestamps) {
        row.date = row_date(timestamp, offset);
    }
    true
}
