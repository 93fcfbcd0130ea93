use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::ZoomLevel;

/// Base column width in pixels for each zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnWidths {
    pub day: f32,
    pub week: f32,
    pub month: f32,
    pub quarter: f32,
    pub year: f32,
}

impl Default for ColumnWidths {
    fn default() -> Self {
        Self {
            day: 40.0,
            week: 60.0,
            month: 80.0,
            quarter: 120.0,
            year: 160.0,
        }
    }
}

impl ColumnWidths {
    pub fn for_zoom(&self, zoom: ZoomLevel) -> f32 {
        match zoom {
            ZoomLevel::Day => self.day,
            ZoomLevel::Week => self.week,
            ZoomLevel::Month => self.month,
            ZoomLevel::Quarter => self.quarter,
            ZoomLevel::Year => self.year,
        }
    }
}

/// Tunables of the timeline engine. Every field falls back to its default
/// when missing from the JSON source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub column_widths: ColumnWidths,
    /// Height of one item row, used for dependency line endpoints.
    pub row_height: f32,
    /// Pointer travel below which a press/release counts as a click.
    pub click_threshold_px: f32,
    /// Extra columns materialized on each side of the visible window.
    pub overscan_columns: usize,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            column_widths: ColumnWidths::default(),
            row_height: 36.0,
            click_threshold_px: 3.0,
            overscan_columns: 2,
        }
    }
}

impl TimelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Load from `path`, logging and falling back to defaults on failure.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("Using default timeline config: {e}");
            Self::default()
        })
    }

    pub fn base_column_width(&self, zoom: ZoomLevel) -> f32 {
        self.column_widths.for_zoom(zoom)
    }
}
