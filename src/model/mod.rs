pub mod item;
pub mod project;
pub mod range;
pub mod zoom;

pub use item::{iter_tree, Dependency, DependencyKind, Holiday, ItemId, ScheduledItem};
pub use project::Project;
pub use range::DateRange;
pub use zoom::{DragStep, ZoomLevel};
