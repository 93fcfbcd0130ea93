//! Column schema: the leaf time buckets of a zoom level plus the coarser
//! header tier drawn above them.

use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::Serialize;

use crate::config::{ColumnWidths, TimelineConfig};
use crate::model::{DateRange, ZoomLevel};

use super::calendar::{add_days, quarter_of, start_of_month, week_number};
use super::mapper::CoordinateMapper;

/// Days from a Sunday week start to the week's Wednesday, the middle of its
/// seven days.
const MID_WEEK_OFFSET: i64 = 3;

/// One leaf time bucket. `span` is always 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub key: String,
    pub label: String,
    pub start: NaiveDate,
    /// Last day of the bucket, inclusive.
    pub end: NaiveDate,
    pub span: usize,
}

/// A top-tier cell spanning `span` consecutive leaf columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderGroup {
    pub key: String,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub span: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSchema {
    pub zoom: ZoomLevel,
    pub range: DateRange,
    pub leaf_columns: Vec<Column>,
    /// Empty for quarter and year views.
    pub header_groups: Vec<HeaderGroup>,
    pub base_column_width: f32,
    pub actual_column_width: f32,
    pub container_width: f32,
    pub total_width: f32,
    pub should_scroll: bool,
}

impl ColumnSchema {
    pub fn column_count(&self) -> usize {
        self.leaf_columns.len()
    }

    /// Start of the first leaf column, which sits at pixel 0.
    pub fn origin(&self) -> NaiveDate {
        self.zoom.unit().align(self.range.start)
    }

    /// Index of the leaf column holding `date`, if it is materialized.
    pub fn column_index_of(&self, date: NaiveDate) -> Option<usize> {
        let index = self.zoom.unit().units_between(self.origin(), date);
        usize::try_from(index)
            .ok()
            .filter(|index| *index < self.leaf_columns.len())
    }

    /// Coordinate mapper matching this schema's origin and column width.
    pub fn mapper(&self) -> CoordinateMapper {
        CoordinateMapper::new(self.range, self.actual_column_width, self.zoom)
            .with_column_count(self.column_count())
    }
}

/// Builds a [`ColumnSchema`] for a zoom level and date range.
#[derive(Debug, Clone)]
pub struct ColumnSchemaBuilder {
    widths: ColumnWidths,
    container_width: f32,
}

impl ColumnSchemaBuilder {
    pub fn new(config: &TimelineConfig) -> Self {
        Self {
            widths: config.column_widths,
            container_width: 0.0,
        }
    }

    /// Width of the viewport the chart is laid out in.
    pub fn container_width(mut self, width: f32) -> Self {
        self.container_width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        self
    }

    pub fn build(&self, zoom: ZoomLevel, range: DateRange) -> ColumnSchema {
        let leaf_columns = leaf_columns(zoom, range);
        let header_groups = header_groups(zoom, &leaf_columns);

        let base_column_width = self.widths.for_zoom(zoom);
        let count = leaf_columns.len() as f32;
        let actual_column_width =
            if zoom.stretches_to_fit() && self.container_width > count * base_column_width {
                self.container_width / count
            } else {
                base_column_width
            };
        let total_width = count * actual_column_width;

        debug!(
            "Built {} {} columns, {} header groups, column width {:.1}px",
            leaf_columns.len(),
            zoom.label(),
            header_groups.len(),
            actual_column_width
        );

        ColumnSchema {
            zoom,
            range,
            leaf_columns,
            header_groups,
            base_column_width,
            actual_column_width,
            container_width: self.container_width,
            total_width,
            should_scroll: total_width > self.container_width,
        }
    }
}

/// Number of leaf columns for `range`, inclusive of both endpoints: every
/// day of the range falls in exactly one column.
pub fn column_count(zoom: ZoomLevel, range: DateRange) -> usize {
    let count = zoom.unit().units_between(range.start, range.end) + 1;
    usize::try_from(count.max(1)).unwrap_or(1)
}

fn leaf_columns(zoom: ZoomLevel, range: DateRange) -> Vec<Column> {
    let unit = zoom.unit();
    let origin = unit.align(range.start);

    (0..column_count(zoom, range) as i64)
        .map(|index| {
            let start = unit.add(origin, index);
            let end = add_days(unit.add(origin, index + 1), -1);
            let (key, label) = leaf_key_label(zoom, start);
            Column {
                key,
                label,
                start,
                end,
                span: 1,
            }
        })
        .collect()
}

fn leaf_key_label(zoom: ZoomLevel, start: NaiveDate) -> (String, String) {
    match zoom {
        ZoomLevel::Day => (
            format!("day-{}", start.format("%Y-%m-%d")),
            start.day().to_string(),
        ),
        ZoomLevel::Week => {
            // A Sunday-aligned week is labelled with the ISO week holding
            // its Monday to Saturday.
            let mid_week = add_days(start, MID_WEEK_OFFSET);
            let week = week_number(mid_week);
            (
                format!("week-{}-{:02}", mid_week.iso_week().year(), week),
                format!("W{week}"),
            )
        }
        ZoomLevel::Month => (
            format!("month-{}", start.format("%Y-%m")),
            start.format("%b").to_string(),
        ),
        ZoomLevel::Quarter => {
            let quarter = quarter_of(start);
            (
                format!("quarter-{}-{}", start.year(), quarter),
                format!("Q{} {}", quarter, start.year()),
            )
        }
        ZoomLevel::Year => (format!("year-{}", start.year()), start.year().to_string()),
    }
}

/// Key and label of the top-tier cell a leaf column belongs to.
fn group_key_label(zoom: ZoomLevel, column: &Column) -> Option<(String, String)> {
    let month_group = |date: NaiveDate| {
        let month = start_of_month(date);
        (
            format!("month-{}", month.format("%Y-%m")),
            month.format("%b %Y").to_string(),
        )
    };

    match zoom {
        ZoomLevel::Day => Some(month_group(column.start)),
        // The mid-week day decides the month, so a week joins the month that
        // holds most of its days.
        ZoomLevel::Week => Some(month_group(add_days(column.start, MID_WEEK_OFFSET))),
        ZoomLevel::Month => {
            let year = column.start.year();
            Some((format!("year-{year}"), year.to_string()))
        }
        ZoomLevel::Quarter | ZoomLevel::Year => None,
    }
}

fn header_groups(zoom: ZoomLevel, columns: &[Column]) -> Vec<HeaderGroup> {
    let mut groups: Vec<HeaderGroup> = Vec::new();

    for column in columns {
        let Some((key, label)) = group_key_label(zoom, column) else {
            continue;
        };
        match groups.last_mut() {
            Some(group) if group.key == key => {
                group.span += 1;
                group.end = column.end;
            }
            _ => groups.push(HeaderGroup {
                key,
                label,
                start: column.start,
                end: column.end,
                span: 1,
            }),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn builder(container: f32) -> ColumnSchemaBuilder {
        ColumnSchemaBuilder::new(&TimelineConfig::default()).container_width(container)
    }

    #[test]
    fn month_view_of_a_year() {
        let range = DateRange::new(ymd(2024, 1, 1), ymd(2024, 12, 31));
        let schema = builder(0.0).build(ZoomLevel::Month, range);

        assert_eq!(schema.column_count(), 12);
        assert_eq!(schema.leaf_columns[0].label, "Jan");
        assert_eq!(schema.leaf_columns[1].end, ymd(2024, 2, 29));
        assert_eq!(schema.leaf_columns[11].key, "month-2024-12");
        assert_eq!(schema.header_groups.len(), 1);
        assert_eq!(schema.header_groups[0].span, 12);
        assert_eq!(schema.header_groups[0].label, "2024");
        assert!(schema.leaf_columns.iter().all(|c| c.span == 1));
    }

    #[test]
    fn month_view_groups_by_year() {
        let range = DateRange::new(ymd(2023, 11, 20), ymd(2024, 2, 3));
        let schema = builder(0.0).build(ZoomLevel::Month, range);

        let spans: Vec<(&str, usize)> = schema
            .header_groups
            .iter()
            .map(|g| (g.label.as_str(), g.span))
            .collect();
        assert_eq!(spans, [("2023", 2), ("2024", 2)]);
        assert_eq!(schema.leaf_columns[0].start, ymd(2023, 11, 1));
    }

    #[test]
    fn four_weeks_of_january() {
        let range = DateRange::new(ymd(2023, 12, 31), ymd(2024, 1, 27));
        let schema = builder(0.0).build(ZoomLevel::Week, range);

        let labels: Vec<&str> = schema.leaf_columns.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["W1", "W2", "W3", "W4"]);
        assert_eq!(schema.leaf_columns[0].start, ymd(2023, 12, 31));
        assert_eq!(schema.leaf_columns[3].end, ymd(2024, 1, 27));
        assert_eq!(schema.header_groups.len(), 1);
        assert_eq!(schema.header_groups[0].label, "Jan 2024");
        assert_eq!(schema.header_groups[0].span, 4);
    }

    #[test]
    fn weeks_cover_a_range_ending_on_sunday() {
        // Sunday 2024-01-28 opens a fifth week, still mostly in January.
        let range = DateRange::new(ymd(2024, 1, 1), ymd(2024, 1, 28));
        let schema = builder(0.0).build(ZoomLevel::Week, range);

        let labels: Vec<&str> = schema.leaf_columns.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["W1", "W2", "W3", "W4", "W5"]);
        assert_eq!(schema.leaf_columns[4].end, ymd(2024, 2, 3));
        assert_eq!(schema.header_groups.len(), 1);
        assert_eq!(schema.header_groups[0].span, 5);
    }

    #[test]
    fn every_day_of_a_mid_week_range_has_a_column() {
        let short = DateRange::new(ymd(2024, 1, 6), ymd(2024, 1, 12));
        let schema = builder(0.0).build(ZoomLevel::Week, short);
        assert_eq!(schema.column_count(), 2);
        assert_eq!(schema.column_index_of(ymd(2024, 1, 6)), Some(0));
        assert_eq!(schema.column_index_of(ymd(2024, 1, 12)), Some(1));

        for zoom in ZoomLevel::ALL {
            let range = DateRange::new(ymd(2024, 3, 2), ymd(2024, 4, 5));
            let schema = builder(0.0).build(zoom, range);
            assert!(schema.leaf_columns.last().unwrap().end >= range.end, "{zoom:?}");
            for day in range.iter_days() {
                assert!(schema.column_index_of(day).is_some(), "{day} uncovered at {zoom:?}");
            }
        }
    }

    #[test]
    fn weeks_join_the_month_holding_most_of_their_days() {
        // Week of Sun 2024-01-28: four of its days are in January.
        // Week of Sun 2024-02-25: five of its days are in February.
        let range = DateRange::new(ymd(2024, 1, 28), ymd(2024, 3, 2));
        let schema = builder(0.0).build(ZoomLevel::Week, range);

        let spans: Vec<(&str, usize)> = schema
            .header_groups
            .iter()
            .map(|g| (g.label.as_str(), g.span))
            .collect();
        assert_eq!(spans, [("Jan 2024", 1), ("Feb 2024", 4)]);
    }

    #[test]
    fn day_view_groups_by_month() {
        let range = DateRange::new(ymd(2024, 2, 27), ymd(2024, 3, 2));
        let schema = builder(0.0).build(ZoomLevel::Day, range);

        assert_eq!(schema.column_count(), 5);
        let labels: Vec<&str> = schema.leaf_columns.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["27", "28", "29", "1", "2"]);
        assert_eq!(schema.leaf_columns[2].key, "day-2024-02-29");
        assert_eq!(schema.header_groups.len(), 2);
        assert_eq!(schema.header_groups[0].span, 3);
        assert_eq!(schema.header_groups[1].label, "Mar 2024");
        assert_eq!(schema.header_groups[1].span, 2);
    }

    #[test]
    fn quarter_and_year_views_are_single_tier() {
        let range = DateRange::new(ymd(2023, 11, 5), ymd(2025, 2, 1));

        let quarters = builder(0.0).build(ZoomLevel::Quarter, range);
        let labels: Vec<&str> = quarters.leaf_columns.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["Q4 2023", "Q1 2024", "Q2 2024", "Q3 2024", "Q4 2024", "Q1 2025"]);
        assert_eq!(quarters.leaf_columns[1].end, ymd(2024, 3, 31));
        assert!(quarters.header_groups.is_empty());

        let years = builder(0.0).build(ZoomLevel::Year, range);
        let labels: Vec<&str> = years.leaf_columns.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["2023", "2024", "2025"]);
        assert!(years.header_groups.is_empty());
    }

    #[test]
    fn coarse_views_stretch_to_fill() {
        let range = DateRange::new(ymd(2024, 1, 1), ymd(2024, 12, 31));
        let schema = builder(1200.0).build(ZoomLevel::Month, range);
        assert_approx_eq!(schema.actual_column_width, 100.0);
        assert_approx_eq!(schema.total_width, 1200.0);
        assert!(!schema.should_scroll);

        let narrow = builder(600.0).build(ZoomLevel::Month, range);
        assert_approx_eq!(narrow.actual_column_width, 80.0);
        assert!(narrow.should_scroll);
    }

    #[test]
    fn day_and_week_views_never_stretch() {
        let range = DateRange::new(ymd(2024, 1, 1), ymd(2024, 1, 7));
        let schema = builder(2000.0).build(ZoomLevel::Day, range);
        assert_approx_eq!(schema.actual_column_width, 40.0);
        assert_approx_eq!(schema.total_width, 280.0);
        assert!(!schema.should_scroll);

        let weeks = builder(2000.0).build(ZoomLevel::Week, range);
        assert_approx_eq!(weeks.actual_column_width, 60.0);
    }

    #[test]
    fn column_lookup() {
        let range = DateRange::new(ymd(2024, 1, 1), ymd(2024, 1, 28));
        let schema = builder(0.0).build(ZoomLevel::Week, range);
        assert_eq!(schema.origin(), ymd(2023, 12, 31));
        assert_eq!(schema.column_index_of(ymd(2024, 1, 1)), Some(0));
        assert_eq!(schema.column_index_of(ymd(2024, 1, 27)), Some(3));
        assert_eq!(schema.column_index_of(ymd(2024, 1, 28)), Some(4));
        assert_eq!(schema.column_index_of(ymd(2024, 2, 4)), None);
        assert_eq!(schema.column_index_of(ymd(2023, 12, 30)), None);
    }
}
