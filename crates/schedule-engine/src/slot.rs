//! Slot granularity: the time quantum grid rows and drop targets align to.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// A non-zero number of minutes, at most one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SlotGranularity(u32);

impl SlotGranularity {
    pub const FIFTEEN_MINUTES: SlotGranularity = SlotGranularity(15);
    pub const THIRTY_MINUTES: SlotGranularity = SlotGranularity(30);
    pub const ONE_HOUR: SlotGranularity = SlotGranularity(60);

    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidConfig`] for zero or for more than 1440.
    pub fn new(minutes: u32) -> Result<Self> {
        if minutes == 0 || minutes > MINUTES_PER_DAY {
            return Err(ScheduleError::InvalidConfig(format!(
                "slot granularity must be between 1 and {} minutes, got {}",
                MINUTES_PER_DAY, minutes
            )));
        }
        Ok(Self(minutes))
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    /// Floor `instant` to the start of its slot, counting slots from midnight.
    ///
    /// Seconds and sub-second precision are always dropped.
    pub fn snap(self, instant: DateTime<Utc>) -> DateTime<Utc> {
        let since_midnight = minutes_since_day_start(instant);
        let floored = since_midnight - since_midnight % self.0;
        let midnight = instant.date_naive().and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        match midnight {
            Some(midnight) => midnight + Duration::minutes(i64::from(floored)),
            None => instant,
        }
    }

    /// Zero-based row of the slot containing `instant` within its day.
    pub fn slot_index(self, instant: DateTime<Utc>) -> u32 {
        minutes_since_day_start(instant) / self.0
    }

    /// Number of rows a full day divides into (the last row may be partial).
    pub fn slots_per_day(self) -> u32 {
        MINUTES_PER_DAY.div_ceil(self.0)
    }
}

impl Default for SlotGranularity {
    fn default() -> Self {
        Self::THIRTY_MINUTES
    }
}

impl TryFrom<u32> for SlotGranularity {
    type Error = ScheduleError;

    fn try_from(minutes: u32) -> Result<Self> {
        Self::new(minutes)
    }
}

impl From<SlotGranularity> for u32 {
    fn from(slot: SlotGranularity) -> u32 {
        slot.0
    }
}

/// Whole minutes elapsed since midnight of the instant's own day.
pub fn minutes_since_day_start(instant: DateTime<Utc>) -> u32 {
    instant.hour() * 60 + instant.minute()
}
