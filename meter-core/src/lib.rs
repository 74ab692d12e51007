//! Logic lõi dựng thước thời gian (timeline meter): cột nhãn và vạch mốc
//! đặt cạnh danh sách các dòng có ngày.
//!
//! Luồng xử lý: `rows` → [`Timeline::build`] → [`collapse::measure`] →
//! [`render::project`]. [`TimelineMeter`] nối các bước này với sự kiện con
//! trỏ, thay đổi kích thước và dữ liệu; [`layout_str`] chạy một lần, không giao diện.

pub mod collapse;
pub mod config;
pub mod debounce;
pub mod geometry;
pub mod gesture;
pub mod layout;
pub mod meter;
pub mod pointer;
pub mod render;
pub mod rows;
pub mod span;
pub mod subject;
pub mod tree;

pub use collapse::{CollapseSummary, LABEL_MARGIN, MARKER_MARGIN};
pub use config::MeterConfig;
pub use geometry::{FixedGeometry, GeometryProvider, MeterBounds};
pub use layout::{layout_str, layout_value, resolve_pointer_value, MeterInput, MeterLayout};
pub use meter::{PointerIndicator, TimelineMeter};
pub use pointer::PointerResolution;
pub use render::{EntityKind, RenderEntity};
pub use rows::Row;
pub use span::{Span, SpanMatch};
pub use subject::{Subject, SubscriptionHandle};
pub use tree::{Label, Marker, Timeline};

/// Lỗi chung khi cấu hình hoặc dựng bố cục thước.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeterError {
    #[error("unsupported span `{0}`, expected one of year, month, day, hour")]
    UnsupportedSpan(String),
    #[error("`week` is accepted by the host markup but has no calendar semantics here")]
    WeekSpanUnsupported,
    #[error("mark span `{mark}` must be finer than label span `{label}`")]
    SpanOrder { label: Span, mark: Span },
    #[error("invalid row heights: {0}")]
    InvalidHeights(String),
    #[error("UTC offset of {0} minutes is out of range")]
    InvalidOffset(i32),
    #[error("meter has no measurable geometry")]
    InvalidGeometry,
    #[error("input has no rows")]
    MissingData,
    #[error("could not read input: {0}")]
    Parse(String),
}
