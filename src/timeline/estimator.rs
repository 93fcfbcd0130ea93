use chrono::{Datelike, NaiveDate};
use log::debug;

use crate::model::{iter_tree, DateRange, ScheduledItem, ZoomLevel};

/// Default visible window for `items` at `zoom`, relative to the local date.
pub fn estimate(items: &[ScheduledItem], zoom: ZoomLevel) -> DateRange {
    estimate_at(items, zoom, chrono::Local::now().date_naive())
}

/// Default visible window for `items` at `zoom`.
///
/// Spans the earliest start and latest end of every scheduled item (nested
/// children included), padded on both sides by one zoom-dependent margin.
/// Without any scheduled item the window is the calendar year of `today`.
pub fn estimate_at(items: &[ScheduledItem], zoom: ZoomLevel, today: NaiveDate) -> DateRange {
    let extent = iter_tree(items)
        .filter_map(ScheduledItem::schedule)
        .fold(None, |acc: Option<(NaiveDate, NaiveDate)>, (start, end)| {
            Some(match acc {
                Some((min, max)) => (min.min(start), max.max(end)),
                None => (start, end),
            })
        });

    let Some((min, max)) = extent else {
        debug!("No scheduled items, defaulting to calendar year {}", today.year());
        return DateRange::calendar_year(today.year());
    };

    let (unit, amount) = zoom.padding();
    DateRange::new(unit.add(min, -amount), unit.add(max, amount))
}
