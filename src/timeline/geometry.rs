use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Dependency, DependencyKind, Holiday, ScheduledItem};

use super::calendar::{end_of_day, is_weekend};
use super::mapper::CoordinateMapper;

/// Horizontal extent of a task bar.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BarRect {
    pub left: f32,
    pub width: f32,
    pub is_valid: bool,
}

impl BarRect {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MilestonePosition {
    pub left: f32,
    pub is_valid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DependencyLine {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub is_valid: bool,
}

/// A shaded full-height band covering one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub date: NaiveDate,
    pub left: f32,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TodayMarker {
    pub left: f32,
    pub is_visible: bool,
}

/// Read-only render geometry derived from a [`CoordinateMapper`].
#[derive(Debug, Clone, Copy)]
pub struct TimelineGeometry<'a> {
    mapper: &'a CoordinateMapper,
}

impl<'a> TimelineGeometry<'a> {
    pub fn new(mapper: &'a CoordinateMapper) -> Self {
        Self { mapper }
    }

    /// Bar of a scheduled item; unscheduled items yield an invalid rect.
    pub fn task_bar_rect(&self, item: &ScheduledItem) -> BarRect {
        match item.schedule() {
            Some((start, end)) => self.bar_between(start, end),
            None => BarRect::default(),
        }
    }

    /// Bar from the start of `start` to the end of `end`, at least one column wide.
    pub fn bar_between(&self, start: NaiveDate, end: NaiveDate) -> BarRect {
        let left = self.mapper.date_to_pixel(start);
        let right = self.mapper.datetime_to_pixel(end_of_day(end));
        BarRect {
            left,
            width: (right - left).max(self.mapper.column_width()),
            is_valid: true,
        }
    }

    /// Centre of the column holding `date`; invalid outside the range.
    pub fn milestone_position(&self, date: NaiveDate) -> MilestonePosition {
        if !self.mapper.range().contains(date) {
            return MilestonePosition::default();
        }
        MilestonePosition {
            left: self.mapper.date_to_pixel(date) + self.mapper.column_width() / 2.0,
            is_valid: true,
        }
    }

    /// Finish-to-start connector: from the right edge of `from`'s bar to the
    /// left edge of `to`'s bar, each at its row's vertical centre.
    pub fn dependency_line(
        &self,
        from: &ScheduledItem,
        to: &ScheduledItem,
        from_row: usize,
        to_row: usize,
        row_height: f32,
    ) -> DependencyLine {
        self.routed_line(DependencyKind::FinishToStart, from, to, from_row, to_row, row_height)
    }

    /// Connector for `dependency`, anchored per its kind: "finish" ends attach
    /// to a bar's right edge and "start" ends to its left edge.
    pub fn dependency_line_for(
        &self,
        dependency: &Dependency,
        from: &ScheduledItem,
        to: &ScheduledItem,
        from_row: usize,
        to_row: usize,
        row_height: f32,
    ) -> DependencyLine {
        self.routed_line(dependency.kind, from, to, from_row, to_row, row_height)
    }

    fn routed_line(
        &self,
        kind: DependencyKind,
        from: &ScheduledItem,
        to: &ScheduledItem,
        from_row: usize,
        to_row: usize,
        row_height: f32,
    ) -> DependencyLine {
        let from_bar = self.task_bar_rect(from);
        let to_bar = self.task_bar_rect(to);
        if !from_bar.is_valid || !to_bar.is_valid {
            return DependencyLine::default();
        }

        let (x1, x2) = match kind {
            DependencyKind::FinishToStart => (from_bar.right(), to_bar.left),
            DependencyKind::StartToStart => (from_bar.left, to_bar.left),
            DependencyKind::FinishToFinish => (from_bar.right(), to_bar.right()),
            DependencyKind::StartToFinish => (from_bar.left, to_bar.right()),
        };
        let row_centre = |row: usize| row as f32 * row_height + row_height / 2.0;

        DependencyLine {
            x1,
            y1: row_centre(from_row),
            x2,
            y2: row_centre(to_row),
            is_valid: true,
        }
    }

    /// Saturday and Sunday bands across the range. Only meaningful in day
    /// view; coarser views are expected to skip drawing them.
    pub fn weekend_bands(&self) -> Vec<Band> {
        self.day_bands(is_weekend)
    }

    /// Bands for every day of the range that is a holiday.
    pub fn holiday_bands(&self, holidays: &[Holiday]) -> Vec<Band> {
        self.day_bands(|date| holidays.iter().any(|holiday| holiday.falls_on(date)))
    }

    fn day_bands(&self, mut shaded: impl FnMut(NaiveDate) -> bool) -> Vec<Band> {
        self.mapper
            .range()
            .iter_days()
            .filter(|date| shaded(*date))
            .map(|date| Band {
                date,
                left: self.mapper.date_to_pixel(date),
                width: self.mapper.column_width(),
            })
            .collect()
    }

    pub fn today_marker(&self) -> TodayMarker {
        self.today_marker_at(chrono::Local::now().date_naive())
    }

    pub fn today_marker_at(&self, today: NaiveDate) -> TodayMarker {
        TodayMarker {
            left: self.mapper.date_to_pixel(today),
            is_visible: self.mapper.range().contains(today),
        }
    }
}
