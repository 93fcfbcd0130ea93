use std::ops::Range;

use chrono::NaiveDate;
use log::{debug, warn};

use crate::config::TimelineConfig;
use crate::error::Result;
use crate::interaction::InteractionController;
use crate::model::{DateRange, Project, ScheduledItem, ZoomLevel};

use super::columns::{ColumnSchema, ColumnSchemaBuilder};
use super::estimator;
use super::geometry::{DependencyLine, TimelineGeometry};
use super::mapper::CoordinateMapper;

/// Manages the visible timeline of one chart.
///
/// Holds the inputs (item snapshot, zoom, container width) and recomputes the
/// derived range, schema and mapper whenever one of them changes.
#[derive(Debug, Clone)]
pub struct TimelineView {
    config: TimelineConfig,
    items: Vec<ScheduledItem>,
    zoom: ZoomLevel,
    container_width: f32,
    /// Overrides the estimated range when set.
    pinned_range: Option<DateRange>,
    schema: ColumnSchema,
    mapper: CoordinateMapper,
    controller: InteractionController,
}

impl TimelineView {
    pub fn new(
        items: &[ScheduledItem],
        zoom: ZoomLevel,
        container_width: f32,
        config: TimelineConfig,
    ) -> Self {
        let range = estimator::estimate(items, zoom);
        let schema = ColumnSchemaBuilder::new(&config)
            .container_width(container_width)
            .build(zoom, range);
        let mapper = schema.mapper();
        let controller = InteractionController::new(mapper.clone(), &config);

        Self {
            config,
            items: items.to_vec(),
            zoom,
            container_width,
            pinned_range: None,
            schema,
            mapper,
            controller,
        }
    }

    pub fn from_project(
        project: &Project,
        zoom: ZoomLevel,
        container_width: f32,
        config: TimelineConfig,
    ) -> Self {
        Self::new(&project.items, zoom, container_width, config)
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    pub fn range(&self) -> DateRange {
        self.schema.range
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn geometry(&self) -> TimelineGeometry<'_> {
        TimelineGeometry::new(&self.mapper)
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut InteractionController {
        &mut self.controller
    }

    /// Replace the item snapshot, e.g. after the store applied a change.
    pub fn refresh(&mut self, items: &[ScheduledItem]) {
        self.items = items.to_vec();
        self.rebuild();
    }

    pub fn set_zoom(&mut self, zoom: ZoomLevel) {
        if zoom != self.zoom {
            self.zoom = zoom;
            self.rebuild();
        }
    }

    /// Switch to the next finer zoom level.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom.zoom_in());
    }

    /// Switch to the next coarser zoom level.
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom.zoom_out());
    }

    /// The hosting layout changed width.
    pub fn resize(&mut self, container_width: f32) {
        if container_width != self.container_width {
            self.container_width = container_width;
            self.rebuild();
        }
    }

    /// Show `range` instead of the estimate; `None` goes back to estimating.
    pub fn pin_range(&mut self, range: Option<DateRange>) {
        self.pinned_range = range;
        self.rebuild();
    }

    /// Pin the window to `start..=end` as given by the host. Reversed bounds
    /// are rejected and leave the current window untouched.
    pub fn pin_dates(&mut self, start: NaiveDate, end: NaiveDate) -> Result<()> {
        let range = DateRange::try_new(start, end)?;
        self.pin_range(Some(range));
        Ok(())
    }

    /// Horizontal scroll offset that centres `date` in a viewport of
    /// `viewport_width`, clamped to the scrollable extent.
    pub fn scroll_offset_for(&self, date: NaiveDate, viewport_width: f32) -> f32 {
        let max_scroll = (self.schema.total_width - viewport_width).max(0.0);
        let centre = self.mapper.date_to_pixel(date) + self.mapper.column_width() / 2.0;
        (centre - viewport_width / 2.0).clamp(0.0, max_scroll)
    }

    /// Leaf columns worth materializing for the viewport, including the
    /// configured overscan.
    pub fn visible_columns(&self, scroll_left: f32, viewport_width: f32) -> Range<usize> {
        self.mapper
            .visible_columns(scroll_left, viewport_width, self.config.overscan_columns)
    }

    /// Connector for every dependency of `project` whose items both exist,
    /// rows taken from the project's parents-first listing.
    pub fn dependency_lines(&self, project: &Project) -> Vec<DependencyLine> {
        let geometry = self.geometry();
        project
            .dependencies
            .iter()
            .filter_map(|dependency| {
                let endpoints = project
                    .find_item(dependency.from_item)
                    .zip(project.find_item(dependency.to_item))
                    .zip(project.row_of(dependency.from_item))
                    .zip(project.row_of(dependency.to_item));
                if endpoints.is_none() {
                    warn!(
                        "Skipping dependency {} -> {}: item not found",
                        dependency.from_item, dependency.to_item
                    );
                }
                let (((from, to), from_row), to_row) = endpoints?;
                Some(geometry.dependency_line_for(
                    dependency,
                    from,
                    to,
                    from_row,
                    to_row,
                    self.config.row_height,
                ))
            })
            .collect()
    }

    fn rebuild(&mut self) {
        let range = self
            .pinned_range
            .unwrap_or_else(|| estimator::estimate(&self.items, self.zoom));
        self.schema = ColumnSchemaBuilder::new(&self.config)
            .container_width(self.container_width)
            .build(self.zoom, range);
        self.mapper = self.schema.mapper();
        self.controller.set_mapper(self.mapper.clone());
        debug!(
            "Timeline rebuilt: {} {} to {}, {:.0}px wide",
            self.zoom.label(),
            range.start,
            range.end,
            self.schema.total_width
        );
    }
}
