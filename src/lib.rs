//! Timeline positioning and interactive scheduling for Gantt charts.
//!
//! Maps calendar dates onto a horizontally scrolling pixel axis at day, week,
//! month, quarter or year granularity, builds the two-tier column header, and
//! turns pointer drags on task bars into date change requests.

pub mod config;
pub mod error;
pub mod interaction;
pub mod model;
pub mod timeline;

pub use config::{ColumnWidths, TimelineConfig};
pub use error::{Error, InteractionError, Result};
pub use interaction::{DragGesture, GestureKind, GestureState, InteractionController, TimelineEvent};
pub use model::{DateRange, Dependency, DependencyKind, Holiday, ItemId, Project, ScheduledItem, ZoomLevel};
pub use timeline::{ColumnSchema, CoordinateMapper, TimelineGeometry, TimelineView};
