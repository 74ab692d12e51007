//! The meter widget: owns the rows, the tree and the render list, and runs
//! the passes in response to host events.

use std::time::Instant;

use chrono::FixedOffset;
use serde::Serialize;
use tracing::{debug, warn};

use crate::collapse;
use crate::config::MeterConfig;
use crate::debounce::Debouncer;
use crate::geometry::GeometryProvider;
use crate::gesture::DragGesture;
use crate::pointer;
use crate::render::{self, RenderEntity};
use crate::rows::{self, Row};
use crate::span::{self, Span};
use crate::subject::{Subject, SubscriptionHandle};
use crate::tree::Timeline;
use crate::MeterError;

/// In-flight marker for one kind of pass. A request arriving while the pass
/// runs is dropped, not queued.
#[derive(Debug)]
struct PassGuard {
    pass: &'static str,
    active: bool,
}

impl PassGuard {
    const fn new(pass: &'static str) -> Self {
        Self {
            pass,
            active: false,
        }
    }

    fn try_begin(&mut self) -> bool {
        if self.active {
            debug!(pass = self.pass, "pass already in flight; request dropped");
            return false;
        }
        self.active = true;
        true
    }

    fn end(&mut self) {
        self.active = false;
    }
}

/// The spot on the meter the user points at, or the host scrolled to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointerIndicator {
    pub offset_percent: f64,
    pub row: Option<usize>,
    /// Date of the pointed row at mark-span accuracy.
    pub caption: Option<String>,
}

/// A meter instance. Single-threaded: every input arrives through `&mut self`.
pub struct TimelineMeter {
    config: MeterConfig,
    offset: FixedOffset,
    geometry: Box<dyn GeometryProvider>,
    timestamps: Option<Vec<i64>>,
    rows: Vec<Row>,
    timeline: Timeline,
    render_list: Option<Vec<RenderEntity>>,
    meter_height: f64,
    building: PassGuard,
    measuring: PassGuard,
    scroll_position: Subject<f64>,
    gesture: DragGesture,
    resize: Debouncer,
    indicator: Option<PointerIndicator>,
    destroyed: bool,
}

impl TimelineMeter {
    pub fn new(config: MeterConfig, geometry: impl GeometryProvider + 'static) -> Result<Self, MeterError> {
        config.validate()?;
        let offset = config.offset()?;
        Ok(Self {
            resize: Debouncer::new(config.resize_debounce()),
            config,
            offset,
            geometry: Box::new(geometry),
            timestamps: None,
            rows: Vec::new(),
            timeline: Timeline::default(),
            render_list: None,
            meter_height: 0.0,
            building: PassGuard::new("build"),
            measuring: PassGuard::new("measure"),
            scroll_position: Subject::new(0.0),
            gesture: DragGesture::default(),
            indicator: None,
            destroyed: false,
        })
    }

    pub fn config(&self) -> &MeterConfig {
        &self.config
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Visible labels and markers, `None` until the first successful pass.
    pub fn render_list(&self) -> Option<&[RenderEntity]> {
        self.render_list.as_deref()
    }

    pub fn pointer_indicator(&self) -> Option<&PointerIndicator> {
        self.indicator.as_ref()
    }

    /// Last emitted scroll fraction.
    pub fn scroll_fraction(&self) -> f64 {
        *self.scroll_position.value()
    }

    /// Listens to scroll fractions; the current one is delivered at once.
    pub fn subscribe_scroll(&mut self, listener: impl FnMut(&f64) + 'static) -> SubscriptionHandle {
        self.scroll_position.on_next(listener)
    }

    pub fn unsubscribe_scroll(&mut self, handle: SubscriptionHandle) -> bool {
        self.scroll_position.unsubscribe(handle)
    }

    /// New row dates. Without a fixed row height, rows built from a height
    /// list keep their heights and only take the new dates.
    pub fn set_timestamps(&mut self, timestamps: Vec<i64>) {
        if self.destroyed {
            return;
        }
        if !self.config.has_fixed_rows() && !self.rows.is_empty() {
            rows::rewrite_dates(&mut self.rows, &timestamps, self.offset);
        }
        self.timestamps = Some(timestamps);
        self.rebuild(None);
    }

    pub fn set_row_height(&mut self, row_height: Option<f64>) {
        if self.destroyed {
            return;
        }
        self.config.row_height = row_height;
        self.rebuild(None);
    }

    /// Heights of each row as laid out by the paired content widget.
    pub fn set_row_height_list(&mut self, heights: &[f64]) {
        if self.destroyed {
            return;
        }
        match rows::rows_from_heights(heights, self.timestamps.as_deref(), self.offset) {
            Ok(rows) => self.rebuild(Some(rows)),
            Err(err) => warn!(error = %err, "row height list ignored"),
        }
    }

    /// Regroups the rows under new spans.
    pub fn set_spans(&mut self, label_span: Span, mark_span: Span) -> Result<(), MeterError> {
        if self.destroyed {
            return Ok(());
        }
        let config = MeterConfig {
            label_span,
            mark_span,
            ..self.config.clone()
        };
        config.validate()?;
        self.config = config;
        self.rebuild(None);
        Ok(())
    }

    /// Toggles markers. Only re-projects; the collapse result is unchanged.
    pub fn set_show_marker(&mut self, show_marker: bool) {
        if self.destroyed {
            return;
        }
        self.config.show_marker = show_marker;
        if !self.building.active && !self.measuring.active {
            self.project();
        }
    }

    fn rebuild(&mut self, supplied: Option<Vec<Row>>) {
        if self.destroyed || !self.building.try_begin() {
            return;
        }

        if let Some(rows) = supplied {
            self.rows = rows;
        } else if self.config.has_fixed_rows() {
            if let Some(timestamps) = &self.timestamps {
                self.rows = rows::rows_from_timestamps(timestamps, self.offset);
            }
        }

        if self.rows.is_empty() {
            debug!("no rows; build skipped");
        } else {
            self.timeline = Timeline::build(&self.rows, self.config.label_span, self.config.mark_span);
            debug!(
                rows = self.rows.len(),
                labels = self.timeline.len(),
                markers = self.timeline.marker_count(),
                "timeline built"
            );
            self.measure();
        }

        self.building.end();
    }

    /// Re-runs the collapse pass against the provider's current geometry and
    /// refreshes the render list. Unmeasurable geometry leaves everything as
    /// it was.
    pub fn measure(&mut self) {
        if self.destroyed || self.timeline.is_empty() || !self.measuring.try_begin() {
            return;
        }

        let bounds = self.geometry.bounds();
        if bounds.is_measurable() {
            let font_size = self
                .geometry
                .font_size_px()
                .filter(|size| size.is_finite() && *size > 0.0)
                .unwrap_or(self.config.fallback_font_size_px);
            match collapse::measure(&mut self.timeline, bounds.height, font_size) {
                Ok(_) => {
                    self.meter_height = bounds.height;
                    self.project();
                }
                Err(err) => warn!(error = %err, "collapse pass failed"),
            }
        } else {
            debug!(?bounds, "meter not laid out yet; measure skipped");
        }

        self.measuring.end();
    }

    fn project(&mut self) {
        if let Some(list) = render::project(&self.timeline, self.config.show_marker) {
            self.render_list = Some(list);
        }
    }

    /// Records a resize; measurement waits for the burst to settle.
    pub fn notify_resize(&mut self, now: Instant) {
        if !self.destroyed {
            self.resize.trigger(now);
        }
    }

    /// Drives the resize debouncer. Returns `true` when a measurement ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.destroyed || !self.resize.poll(now) {
            return false;
        }
        self.measure();
        true
    }

    /// Press or touch start at viewport `client_y`. A tap scrolls as well.
    pub fn pointer_down(&mut self, client_y: f64) {
        if self.destroyed {
            return;
        }
        self.gesture.start();
        self.scroll_to_client(client_y);
    }

    pub fn pointer_move(&mut self, client_y: f64) {
        if !self.destroyed && self.gesture.accepts_move() {
            self.scroll_to_client(client_y);
        }
    }

    pub fn pointer_up(&mut self) {
        self.gesture.end();
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    fn scroll_to_client(&mut self, client_y: f64) {
        let top = self.geometry.bounds().top;
        self.scroll_to(client_y - top);
    }

    fn scroll_to(&mut self, position: f64) {
        let Ok(resolution) = pointer::resolve(position, self.meter_height, &self.rows) else {
            debug!("meter height unknown; pointer ignored");
            return;
        };
        self.scroll_position.emit(resolution.scroll_fraction);
        self.indicator = Some(self.indicator_for(resolution.scroll_fraction, resolution.row));
    }

    /// Reflects a scroll position driven by the content side. Nothing is
    /// emitted to scroll listeners.
    pub fn set_scroll_y(&mut self, scroll_y: f64) {
        if self.destroyed {
            return;
        }
        if let Ok(resolution) = pointer::resolve(scroll_y, self.meter_height, &self.rows) {
            self.indicator = Some(self.indicator_for(resolution.scroll_fraction, resolution.row));
        }
    }

    fn indicator_for(&self, fraction: f64, row: Option<usize>) -> PointerIndicator {
        let caption = row
            .and_then(|index| self.rows.get(index))
            .map(|row| span::label_text(row.date.as_ref(), self.config.mark_span, true));
        PointerIndicator {
            offset_percent: fraction * 100.0,
            row,
            caption,
        }
    }

    /// Releases listeners and pending timers. Later events are ignored.
    pub fn destroy(&mut self) {
        self.scroll_position.clear();
        self.resize.cancel();
        self.gesture.end();
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}
