use serde::{Deserialize, Serialize};

use crate::timeline::calendar::CalendarUnit;

/// Average Gregorian month length, used to size week steps inside month columns.
const AVG_DAYS_PER_MONTH: f32 = 365.2425 / 12.0;

/// Calendar granularity of one timeline column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomLevel {
    Day,
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

/// One quantum of drag motion: a calendar unit and how many of them fit in a
/// single column at the owning zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragStep {
    pub unit: CalendarUnit,
    pub per_column: f32,
}

impl ZoomLevel {
    /// All levels ordered from finest to coarsest.
    pub const ALL: [ZoomLevel; 5] = [
        ZoomLevel::Day,
        ZoomLevel::Week,
        ZoomLevel::Month,
        ZoomLevel::Quarter,
        ZoomLevel::Year,
    ];

    /// Calendar unit covered by one leaf column.
    pub fn unit(self) -> CalendarUnit {
        match self {
            ZoomLevel::Day => CalendarUnit::Day,
            ZoomLevel::Week => CalendarUnit::Week,
            ZoomLevel::Month => CalendarUnit::Month,
            ZoomLevel::Quarter => CalendarUnit::Quarter,
            ZoomLevel::Year => CalendarUnit::Year,
        }
    }

    /// Whether columns may widen to fill the viewport. Day and week views
    /// always keep their base width and scroll instead.
    pub fn stretches_to_fit(self) -> bool {
        matches!(self, ZoomLevel::Month | ZoomLevel::Quarter | ZoomLevel::Year)
    }

    /// Symmetric padding applied around the scheduled items' extent.
    pub fn padding(self) -> (CalendarUnit, i64) {
        match self {
            ZoomLevel::Day => (CalendarUnit::Day, 7),
            ZoomLevel::Week => (CalendarUnit::Day, 14),
            ZoomLevel::Month => (CalendarUnit::Month, 1),
            ZoomLevel::Quarter => (CalendarUnit::Quarter, 1),
            ZoomLevel::Year => (CalendarUnit::Year, 1),
        }
    }

    /// Drag quantum: one step finer than the column unit where the column
    /// holds several of them (days in a week, weeks in a month, months in a
    /// quarter or year). Day columns move by whole days.
    pub fn drag_step(self) -> DragStep {
        match self {
            ZoomLevel::Day => DragStep { unit: CalendarUnit::Day, per_column: 1.0 },
            ZoomLevel::Week => DragStep { unit: CalendarUnit::Day, per_column: 7.0 },
            ZoomLevel::Month => DragStep {
                unit: CalendarUnit::Week,
                per_column: AVG_DAYS_PER_MONTH / 7.0,
            },
            ZoomLevel::Quarter => DragStep { unit: CalendarUnit::Month, per_column: 3.0 },
            ZoomLevel::Year => DragStep { unit: CalendarUnit::Month, per_column: 12.0 },
        }
    }

    /// Next finer level, or `self` when already at day granularity.
    pub fn zoom_in(self) -> Self {
        match self {
            ZoomLevel::Day | ZoomLevel::Week => ZoomLevel::Day,
            ZoomLevel::Month => ZoomLevel::Week,
            ZoomLevel::Quarter => ZoomLevel::Month,
            ZoomLevel::Year => ZoomLevel::Quarter,
        }
    }

    /// Next coarser level, or `self` when already at year granularity.
    pub fn zoom_out(self) -> Self {
        match self {
            ZoomLevel::Day => ZoomLevel::Week,
            ZoomLevel::Week => ZoomLevel::Month,
            ZoomLevel::Month => ZoomLevel::Quarter,
            ZoomLevel::Quarter | ZoomLevel::Year => ZoomLevel::Year,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ZoomLevel::Day => "Day",
            ZoomLevel::Week => "Week",
            ZoomLevel::Month => "Month",
            ZoomLevel::Quarter => "Quarter",
            ZoomLevel::Year => "Year",
        }
    }
}
