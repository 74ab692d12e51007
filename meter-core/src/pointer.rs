//! Maps a position on the meter back to a content row.

use serde::Serialize;

use crate::rows::Row;
use crate::MeterError;

/// Where a pointer landed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerResolution {
    /// Index of the pointed row, `None` when there are no rows.
    pub row: Option<usize>,
    /// Position as a fraction of the meter height, always in `[0, 1]`.
    pub scroll_fraction: f64,
}

/// `pixel` clamped to the meter and divided by its height.
pub fn scroll_fraction(pixel: f64, meter_height_px: f64) -> Result<f64, MeterError> {
    if !(meter_height_px.is_finite() && meter_height_px > 0.0) {
        return Err(MeterError::InvalidGeometry);
    }
    let pixel = if pixel.is_nan() { 0.0 } else { pixel };
    Ok(pixel.clamp(0.0, meter_height_px) / meter_height_px)
}

/// Index of the row straddling `fraction`.
///
/// Zero maps to the first row. Otherwise the first row `i - 1` whose end
/// (the running height before row `i`) lies strictly past `fraction` wins, and
/// a fraction inside the last row falls through to the last row.
pub fn row_at_fraction(fraction: f64, rows: &[Row]) -> Option<usize> {
    if rows.is_empty() {
        return None;
    }
    if fraction == 0.0 {
        return Some(0);
    }
    let mut height_from_top = 0.0;
    for (index, row) in rows.iter().enumerate() {
        if index > 0 && height_from_top > fraction {
            return Some(index - 1);
        }
        height_from_top += row.height_fraction;
    }
    Some(rows.len() - 1)
}

pub fn resolve(pixel: f64, meter_height_px: f64, rows: &[Row]) -> Result<PointerResolution, MeterError> {
    let scroll_fraction = scroll_fraction(pixel, meter_height_px)?;
    Ok(PointerResolution {
        row: row_at_fraction(scroll_fraction, rows),
        scroll_fraction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(heights: &[f64]) -> Vec<Row> {
        heights.iter().map(|&h| Row::new(None, h)).collect()
    }

    #[test]
    fn top_edge_is_first_row() {
        let rows = rows(&[0.25; 4]);
        assert_eq!(resolve(0.0, 200.0, &rows).unwrap().row, Some(0));
    }

    #[test]
    fn bottom_edge_is_last_row() {
        let rows = rows(&[0.25; 4]);
        let resolution = resolve(200.0, 200.0, &rows).unwrap();
        assert_eq!(resolution.row, Some(3));
        assert_eq!(resolution.scroll_fraction, 1.0);
    }

    #[test]
    fn picks_the_straddling_row() {
        let rows = rows(&[0.5, 0.25, 0.25]);
        assert_eq!(row_at_fraction(0.1, &rows), Some(0));
        assert_eq!(row_at_fraction(0.6, &rows), Some(1));
        assert_eq!(row_at_fraction(0.9, &rows), Some(2));
    }

    #[test]
    fn exact_boundary_belongs_to_the_lower_row() {
        // The running height must exceed the fraction strictly, so 0.5 is not
        // yet past the end of row 0 and the scan moves on to row 1.
        let rows = rows(&[0.5, 0.25, 0.25]);
        assert_eq!(row_at_fraction(0.5, &rows), Some(1));
        assert_eq!(row_at_fraction(0.75, &rows), Some(2));
    }

    #[test]
    fn out_of_range_pixels_are_clamped() {
        let rows = rows(&[0.5, 0.5]);
        let above = resolve(-40.0, 100.0, &rows).unwrap();
        assert_eq!(above.scroll_fraction, 0.0);
        assert_eq!(above.row, Some(0));

        let below = resolve(1_000.0, 100.0, &rows).unwrap();
        assert_eq!(below.scroll_fraction, 1.0);
        assert_eq!(below.row, Some(1));

        assert_eq!(resolve(f64::NAN, 100.0, &rows).unwrap().scroll_fraction, 0.0);
    }

    #[test]
    fn no_rows_still_yields_a_fraction() {
        let resolution = resolve(25.0, 100.0, &[]).unwrap();
        assert_eq!(resolution.row, None);
        assert_eq!(resolution.scroll_fraction, 0.25);
    }

    #[test]
    fn zero_height_meter_is_rejected() {
        assert_eq!(resolve(10.0, 0.0, &[]), Err(MeterError::InvalidGeometry));
    }
}
