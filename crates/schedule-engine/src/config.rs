//! Typed configuration for layout geometry and gesture timing.
//!
//! Every struct has a `Default` matching a 30-minute grid. Use the validating
//! constructors when values come from outside the program.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::slot::SlotGranularity;

/// How overlapping items are gathered into column groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    /// Walk items in input order; each joins the first group holding any member
    /// it overlaps, or starts a new group. Order-dependent: two groups that a
    /// later item bridges are not merged.
    #[default]
    FirstFit,
    /// Group by the transitive closure of pairwise overlap, so every chain of
    /// overlapping items shares one set of columns.
    Transitive,
}

/// Geometry of the day grid that positioned items are measured against.
///
/// Deserialized documents go through [`LayoutConfig::new`], so they are held to
/// the same bounds as values built in code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLayoutConfig")]
pub struct LayoutConfig {
    /// Minutes covered by one grid row.
    pub slot: SlotGranularity,
    /// Height of one grid row, in render units (pixels, rem, ...).
    pub unit_height: f64,
    /// Floor applied to every item's height so short items stay clickable.
    pub min_height: f64,
    /// Horizontal gap subtracted from each column's width, in percent.
    pub column_gap_percent: f64,
    pub grouping: Grouping,
}

/// Unchecked shape of a [`LayoutConfig`] document.
#[derive(Deserialize)]
struct RawLayoutConfig {
    slot: SlotGranularity,
    unit_height: f64,
    min_height: f64,
    column_gap_percent: f64,
    #[serde(default)]
    grouping: Grouping,
}

impl TryFrom<RawLayoutConfig> for LayoutConfig {
    type Error = ScheduleError;

    fn try_from(raw: RawLayoutConfig) -> Result<Self> {
        Self::new(
            raw.slot,
            raw.unit_height,
            raw.min_height,
            raw.column_gap_percent,
            raw.grouping,
        )
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            slot: SlotGranularity::default(),
            unit_height: 24.0,
            min_height: 20.0,
            column_gap_percent: 1.0,
            grouping: Grouping::FirstFit,
        }
    }
}

impl LayoutConfig {
    /// Build a validated layout configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidConfig`] if `unit_height` is not a
    /// positive finite number, `min_height` is negative, or the gap is negative
    /// or at least 100%.
    pub fn new(
        slot: SlotGranularity,
        unit_height: f64,
        min_height: f64,
        column_gap_percent: f64,
        grouping: Grouping,
    ) -> Result<Self> {
        if !unit_height.is_finite() || unit_height <= 0.0 {
            return Err(ScheduleError::InvalidConfig(format!(
                "unit height must be positive, got {}",
                unit_height
            )));
        }
        if !min_height.is_finite() || min_height < 0.0 {
            return Err(ScheduleError::InvalidConfig(format!(
                "minimum height must not be negative, got {}",
                min_height
            )));
        }
        if !column_gap_percent.is_finite() || !(0.0..100.0).contains(&column_gap_percent) {
            return Err(ScheduleError::InvalidConfig(format!(
                "column gap must be in [0, 100), got {}",
                column_gap_percent
            )));
        }
        Ok(Self {
            slot,
            unit_height,
            min_height,
            column_gap_percent,
            grouping,
        })
    }

    /// Render units per minute of wall-clock time.
    pub fn units_per_minute(&self) -> f64 {
        self.unit_height / f64::from(self.slot.minutes())
    }
}

/// Default hold time before a press turns into a drag.
pub const DEFAULT_HOLD_THRESHOLD_MS: u64 = 200;

/// Timing for click/drag disambiguation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// How long the pointer must stay down before a drag starts.
    pub hold_threshold_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            hold_threshold_ms: DEFAULT_HOLD_THRESHOLD_MS,
        }
    }
}
