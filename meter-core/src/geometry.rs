//! Where the meter is on screen and how large its text is.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Bounding box of the meter in viewport pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MeterBounds {
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl MeterBounds {
    pub fn new(top: f64, width: f64, height: f64) -> Self {
        Self { top, width, height }
    }

    /// A pass needs both a width and a height.
    pub fn is_measurable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Supplies layout facts the meter cannot compute itself.
pub trait GeometryProvider {
    fn bounds(&self) -> MeterBounds;

    /// Computed font size of the meter, if known.
    fn font_size_px(&self) -> Option<f64>;
}

impl<G: GeometryProvider + ?Sized> GeometryProvider for Rc<G> {
    fn bounds(&self) -> MeterBounds {
        (**self).bounds()
    }

    fn font_size_px(&self) -> Option<f64> {
        (**self).font_size_px()
    }
}

/// Geometry held in cells, for hosts that push layout changes in.
#[derive(Debug, Default)]
pub struct FixedGeometry {
    bounds: Cell<MeterBounds>,
    font_size_px: Cell<Option<f64>>,
}

impl FixedGeometry {
    pub fn new(bounds: MeterBounds, font_size_px: Option<f64>) -> Self {
        Self {
            bounds: Cell::new(bounds),
            font_size_px: Cell::new(font_size_px),
        }
    }

    pub fn set_bounds(&self, bounds: MeterBounds) {
        self.bounds.set(bounds);
    }

    pub fn set_font_size_px(&self, font_size_px: Option<f64>) {
        self.font_size_px.set(font_size_px);
    }
}

impl GeometryProvider for FixedGeometry {
    fn bounds(&self) -> MeterBounds {
        self.bounds.get()
    }

    fn font_size_px(&self) -> Option<f64> {
        self.font_size_px.get()
    }
}

/// Reads a computed CSS font size such as `"12px"` or `"13.5px"`.
pub fn parse_font_size(css: &str) -> Option<f64> {
    css.trim()
        .strip_suffix("px")
        .and_then(|number| number.trim().parse::<f64>().ok())
        .filter(|size| size.is_finite() && *size > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pixel_font_sizes() {
        assert_eq!(parse_font_size("12px"), Some(12.0));
        assert_eq!(parse_font_size(" 13.5px "), Some(13.5));
        assert_eq!(parse_font_size("1em"), None);
        assert_eq!(parse_font_size("0px"), None);
    }

    #[test]
    fn zero_sized_bounds_are_not_measurable() {
        assert!(!MeterBounds::new(0.0, 0.0, 200.0).is_measurable());
        assert!(!MeterBounds::new(0.0, 20.0, 0.0).is_measurable());
        assert!(MeterBounds::new(10.0, 20.0, 200.0).is_measurable());
    }

    #[test]
    fn shared_geometry_sees_updates() {
        let geometry = Rc::new(FixedGeometry::default());
        let provider: Rc<FixedGeometry> = Rc::clone(&geometry);
        geometry.set_bounds(MeterBounds::new(0.0, 10.0, 90.0));
        geometry.set_font_size_px(Some(11.0));
        assert_eq!(provider.bounds().height, 90.0);
        assert_eq!(provider.font_size_px(), Some(11.0));
    }
}
