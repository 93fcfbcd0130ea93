pub mod calendar;
pub mod columns;
pub mod estimator;
pub mod geometry;
pub mod mapper;
pub mod view;

pub use calendar::CalendarUnit;
pub use columns::{Column, ColumnSchema, ColumnSchemaBuilder, HeaderGroup};
pub use estimator::{estimate, estimate_at};
pub use geometry::{Band, BarRect, DependencyLine, MilestonePosition, TimelineGeometry, TodayMarker};
pub use mapper::CoordinateMapper;
pub use view::TimelineView;
