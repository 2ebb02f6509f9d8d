//! Editor settings consumed by gestures and layout commands.
//!
//! `AppSettings` is an immutable value; every change goes through
//! [`AppSettings::with_setting`] and yields a new value. Grid row/column counts
//! have an explicit [`GridCount::Unset`] state for a text field that is being
//! edited, and layouts treat it as "no layout yet".

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use serde::{Deserialize, Serialize};

/// Errors from parsing user-entered settings.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid grid count: {0:?} (expected a positive integer)")]
    InvalidGridCount(String),
}

/// Which layers a stitch or grid layout acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutScope {
    /// Only the selected layers.
    Selected,
    /// Every layer.
    #[default]
    All,
}

/// Grid cell traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridDirection {
    /// Row-major: fill left-to-right, then advance to the next row.
    #[default]
    Horizontal,
    /// Column-major: fill top-to-bottom, then advance to the next column.
    Vertical,
}

/// A grid row or column count that may be temporarily unset mid-edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<u32>", into = "Option<u32>")]
pub enum GridCount {
    Unset,
    Count(u32),
}

impl From<Option<u32>> for GridCount {
    fn from(value: Option<u32>) -> Self {
        match value {
            Some(n) if n > 0 => Self::Count(n),
            _ => Self::Unset,
        }
    }
}

impl From<GridCount> for Option<u32> {
    fn from(value: GridCount) -> Self {
        value.get()
    }
}

impl GridCount {
    /// The count, or `None` while unset.
    #[must_use]
    pub fn get(self) -> Option<u32> {
        match self {
            Self::Unset => None,
            Self::Count(n) => Some(n),
        }
    }

    /// Parse text-field input: blank is `Unset`, a positive integer is a count.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidGridCount`] for anything else.
    pub fn parse(raw: &str) -> Result<Self, SettingsError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::Unset);
        }
        match trimmed.parse::<u32>() {
            Ok(n) if n > 0 => Ok(Self::Count(n)),
            _ => Err(SettingsError::InvalidGridCount(raw.to_owned())),
        }
    }

    /// `ceil(total / divisor)`, at least 1.
    #[must_use]
    fn derived(total: usize, divisor: u32) -> Self {
        let total = u32::try_from(total).unwrap_or(u32::MAX);
        Self::Count(total.div_ceil(divisor.max(1)).max(1))
    }
}

/// Settings for snapping, resizing, stitching and grid layout.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Snap dragged and resized edges to nearby edges.
    pub snap_to_grid: bool,
    /// Snap distance in screen pixels at 100% zoom.
    pub snap_threshold: f64,
    /// Resize keeps the layer's aspect ratio.
    pub keep_aspect_ratio: bool,
    /// Gap between stitched layers, in canvas units.
    pub stitch_gap: u32,
    /// Stitch normalizes the cross-axis dimension before concatenating.
    pub smart_stitch: bool,
    /// Scope of stitch and grid layouts.
    pub stitch_scope: LayoutScope,
    pub grid_rows: GridCount,
    pub grid_cols: GridCount,
    /// Editing rows recomputes cols from the scoped layer count (and vice versa).
    pub auto_calc_grid: bool,
    pub grid_direction: GridDirection,
    /// Reverse the layer order before filling the grid.
    pub grid_reverse: bool,
    /// Gap between grid cells, in canvas units.
    pub grid_gap: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            snap_to_grid: true,
            snap_threshold: 10.0,
            keep_aspect_ratio: true,
            stitch_gap: 0,
            smart_stitch: true,
            stitch_scope: LayoutScope::All,
            grid_rows: GridCount::Count(2),
            grid_cols: GridCount::Count(2),
            auto_calc_grid: false,
            grid_direction: GridDirection::Horizontal,
            grid_reverse: false,
            grid_gap: 0,
        }
    }
}

/// A typed change to one setting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingUpdate {
    SnapToGrid(bool),
    SnapThreshold(f64),
    KeepAspectRatio(bool),
    StitchGap(u32),
    SmartStitch(bool),
    StitchScope(LayoutScope),
    GridRows(GridCount),
    GridCols(GridCount),
    AutoCalcGrid(bool),
    GridDirection(GridDirection),
    GridReverse(bool),
    GridGap(u32),
}

impl AppSettings {
    /// A copy of these settings with one field replaced.
    #[must_use]
    pub fn with_setting(&self, update: SettingUpdate) -> Self {
        let mut next = self.clone();
        match update {
            SettingUpdate::SnapToGrid(v) => next.snap_to_grid = v,
            SettingUpdate::SnapThreshold(v) => next.snap_threshold = if v.is_finite() { v.max(0.0) } else { 0.0 },
            SettingUpdate::KeepAspectRatio(v) => next.keep_aspect_ratio = v,
            SettingUpdate::StitchGap(v) => next.stitch_gap = v,
            SettingUpdate::SmartStitch(v) => next.smart_stitch = v,
            SettingUpdate::StitchScope(v) => next.stitch_scope = v,
            SettingUpdate::GridRows(v) => next.grid_rows = v,
            SettingUpdate::GridCols(v) => next.grid_cols = v,
            SettingUpdate::AutoCalcGrid(v) => next.auto_calc_grid = v,
            SettingUpdate::GridDirection(v) => next.grid_direction = v,
            SettingUpdate::GridReverse(v) => next.grid_reverse = v,
            SettingUpdate::GridGap(v) => next.grid_gap = v,
        }
        next
    }

    /// [`Self::with_setting`] plus the auto-calc rule for grid dimensions.
    ///
    /// With `auto_calc_grid` on, setting rows to `r` sets cols to
    /// `ceil(scoped_layers / r)`, and setting cols derives rows the same way.
    /// An unset count derives nothing.
    #[must_use]
    pub fn with_setting_derived(&self, update: SettingUpdate, scoped_layers: usize) -> Self {
        let mut next = self.with_setting(update);
        if !next.auto_calc_grid {
            return next;
        }
        match update {
            SettingUpdate::GridRows(GridCount::Count(rows)) => {
                next.grid_cols = GridCount::derived(scoped_layers, rows);
            }
            SettingUpdate::GridCols(GridCount::Count(cols)) => {
                next.grid_rows = GridCount::derived(scoped_layers, cols);
            }
            _ => {}
        }
        next
    }

    /// Both grid dimensions, when set.
    #[must_use]
    pub fn grid_dims(&self) -> Option<(u32, u32)> {
        Some((self.grid_rows.get()?, self.grid_cols.get()?))
    }
}
