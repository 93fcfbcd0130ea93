use std::ops::Range;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::model::{DateRange, ZoomLevel};

use super::calendar::{add_days, start_of_day};
use super::columns::column_count;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Absorbs f32 rounding so a pixel computed for a column or day boundary
/// maps back onto that boundary rather than just before it.
const SNAP_PX: f64 = 0.01;

/// Converts between calendar dates and horizontal pixel offsets.
///
/// Pixel 0 is the start of the first leaf column, i.e. the range start
/// aligned to the zoom unit. Positions past the last materialized column are
/// resolved as virtual columns by stepping the same calendar unit.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateMapper {
    range: DateRange,
    zoom: ZoomLevel,
    column_width: f32,
    column_count: usize,
    origin: NaiveDate,
}

impl CoordinateMapper {
    pub fn new(range: DateRange, column_width: f32, zoom: ZoomLevel) -> Self {
        let column_width = if column_width.is_finite() && column_width > 0.0 {
            column_width
        } else {
            1.0
        };
        Self {
            range,
            zoom,
            column_width,
            column_count: column_count(zoom, range),
            origin: zoom.unit().align(range.start),
        }
    }

    pub fn with_column_count(mut self, column_count: usize) -> Self {
        self.column_count = column_count;
        self
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    pub fn column_width(&self) -> f32 {
        self.column_width
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Date at pixel 0.
    pub fn origin(&self) -> NaiveDate {
        self.origin
    }

    /// Width of all materialized columns.
    pub fn total_width(&self) -> f32 {
        self.column_count as f32 * self.column_width
    }

    /// Pixel offset of the start of `date`.
    pub fn date_to_pixel(&self, date: NaiveDate) -> f32 {
        self.datetime_to_pixel(start_of_day(date))
    }

    /// Pixel offset of `at`: whole columns elapsed since the origin plus the
    /// elapsed fraction of the containing column's true length.
    pub fn datetime_to_pixel(&self, at: NaiveDateTime) -> f32 {
        let unit = self.zoom.unit();
        let index = unit.units_between(self.origin, at.date());
        let unit_start = unit.add(self.origin, index);
        let elapsed = (at - start_of_day(unit_start)).num_milliseconds() as f64;
        let length = f64::from(unit.length_days(unit_start)) * MILLIS_PER_DAY;

        ((index as f64 + elapsed / length) * f64::from(self.column_width)) as f32
    }

    pub fn pixel_to_date(&self, x: f32) -> NaiveDate {
        self.pixel_to_datetime(x).date()
    }

    /// Inverse of [`datetime_to_pixel`](Self::datetime_to_pixel).
    ///
    /// The offset inside a column resolves to the hour of day in day view and
    /// to the day within the week, month, quarter or year otherwise. Results
    /// before the range start clamp to it; positions beyond the last column
    /// extrapolate. Non-finite input and calendar overflow clamp to the range.
    pub fn pixel_to_datetime(&self, x: f32) -> NaiveDateTime {
        let lower = self.range.start_of_day();
        let upper = start_of_day(self.range.end);
        if x.is_nan() || x == f32::NEG_INFINITY {
            return lower;
        }
        if x == f32::INFINITY {
            return upper;
        }

        let position = (f64::from(x) + SNAP_PX) / f64::from(self.column_width);
        let column = position.floor();
        let fraction = position - column;
        let index = column as i64;

        let unit = self.zoom.unit();
        let Some(unit_start) = unit.checked_add(self.origin, index) else {
            return if index < 0 { lower } else { upper };
        };

        let at = match self.zoom {
            ZoomLevel::Day => {
                let hour = ((fraction * 24.0).floor() as i64).clamp(0, 23);
                start_of_day(unit_start)
                    .checked_add_signed(Duration::hours(hour))
                    .unwrap_or_else(|| start_of_day(unit_start))
            }
            _ => {
                let length = i64::from(unit.length_days(unit_start));
                let day = ((fraction * length as f64).floor() as i64).clamp(0, length - 1);
                start_of_day(add_days(unit_start, day))
            }
        };

        at.max(lower)
    }

    /// Column index under `x`; may be negative or past the last column.
    pub fn column_index_at(&self, x: f32) -> i64 {
        if x.is_nan() {
            return 0;
        }
        ((f64::from(x) + SNAP_PX) / f64::from(self.column_width)).floor() as i64
    }

    /// Whether `x` lies beyond the materialized columns.
    pub fn is_virtual(&self, x: f32) -> bool {
        usize::try_from(self.column_index_at(x)).map_or(false, |index| index >= self.column_count)
    }

    /// First and last day of the column at `index`, virtual or not.
    pub fn column_bounds(&self, index: i64) -> (NaiveDate, NaiveDate) {
        let unit = self.zoom.unit();
        let start = unit.add(self.origin, index);
        (start, add_days(unit.add(self.origin, index.saturating_add(1)), -1))
    }

    /// Materialized columns intersecting a viewport scrolled to
    /// `scroll_left`, widened by `overscan` columns on both sides.
    pub fn visible_columns(&self, scroll_left: f32, viewport_width: f32, overscan: usize) -> Range<usize> {
        let width = f64::from(self.column_width);
        let left = f64::from(scroll_left.max(0.0));
        let right = left + f64::from(viewport_width.max(0.0));

        let first = (left / width).floor() as usize;
        let last = (right / width).ceil() as usize;

        let start = first.saturating_sub(overscan).min(self.column_count);
        let end = last.saturating_add(overscan).min(self.column_count);
        start..end.max(start)
    }

    /// Pixel width of one drag quantum at the current zoom.
    pub fn drag_step_width(&self) -> f32 {
        self.column_width / self.zoom.drag_step().per_column
    }
}
