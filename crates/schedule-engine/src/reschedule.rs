//! Drag rescheduling: where an item lands when dropped on a new slot.

use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::item::{Schedulable, ScheduleItem};
use crate::slot::SlotGranularity;

/// A proposed new time range. Applying it is the caller's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ProposedRange {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Compute the range `item` would occupy if dropped at `drop`.
///
/// The drop instant is floored to `granularity` and the item's absolute
/// duration is carried over, so multi-day items keep their span. An inverted
/// item keeps its negative duration. A missing `end` is treated as zero
/// duration. Returns `None` when the item has no `start`, or when the carried
/// duration would push `end` past the representable range.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use schedule_engine::item::{Calendar, Event, RecurrencePattern, Schedulable};
/// use schedule_engine::reschedule::reschedule;
/// use schedule_engine::slot::SlotGranularity;
///
/// let item = Schedulable::Event(Event {
///     id: "1:1".into(),
///     title: "One-on-one".into(),
///     description: None,
///     start: Some(Utc.with_ymd_and_hms(2024, 6, 3, 14, 0, 0).unwrap()),
///     end: Some(Utc.with_ymd_and_hms(2024, 6, 3, 14, 30, 0).unwrap()),
///     recurrence: RecurrencePattern::None,
///     calendar: Calendar::default(),
///     category: None,
/// });
///
/// let drop = Utc.with_ymd_and_hms(2024, 6, 3, 16, 7, 0).unwrap();
/// let moved = reschedule(&item, drop, SlotGranularity::THIRTY_MINUTES).unwrap();
/// assert_eq!(moved.start, Utc.with_ymd_and_hms(2024, 6, 3, 16, 0, 0).unwrap());
/// assert_eq!(moved.end, Utc.with_ymd_and_hms(2024, 6, 3, 16, 30, 0).unwrap());
/// ```
pub fn reschedule(
    item: &Schedulable,
    drop: DateTime<Utc>,
    granularity: SlotGranularity,
) -> Option<ProposedRange> {
    if item.start().is_none() {
        debug!("cannot reschedule {}: no start", item.id());
        return None;
    }
    let duration = item.duration().unwrap_or_else(Duration::zero);
    let start = granularity.snap(drop);
    let Some(end) = start.checked_add_signed(duration) else {
        debug!("cannot reschedule {}: end is out of range", item.id());
        return None;
    };

    Some(ProposedRange { start, end })
}
