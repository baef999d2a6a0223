//! Recurrence expansion: turns one recurring item into concrete dated occurrences.
//!
//! Each pattern has a fixed stride and a fixed horizon measured from the anchor
//! `start`. The k-th occurrence starts at `anchor + k * stride`, beginning with
//! the anchor itself, for as long as it stays strictly before the horizon.
//!
//! | Pattern | Stride  | Horizon            |
//! |---------|---------|--------------------|
//! | DAILY   | 1 day   | start + 1 month    |
//! | WEEKLY  | 1 week  | start + 3 months   |
//! | MONTHLY | 1 month | start + 1 year     |
//! | YEARLY  | 1 year  | start + 10 years   |
//!
//! Month and year strides are measured from the anchor and clamp to the last
//! day of the target month, so an anchor on Jan 31 produces Feb 29 (or 28),
//! then Mar 31. A clamped month never shifts the day of later occurrences.

use chrono::{DateTime, Duration, Months, Utc};
use log::{debug, trace};

use crate::item::{Occurrence, RecurrencePattern, Schedulable, ScheduleItem};

/// Upper bound on generated occurrences per item, regardless of pattern.
///
/// The widest table entry (DAILY over one month) yields at most 31.
const MAX_OCCURRENCES: usize = 64;

/// The distance between consecutive occurrences of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stride {
    Days(i64),
    Months(u32),
}

impl Stride {
    /// `anchor` moved forward by `steps` strides. `None` past chrono's range.
    fn nth(self, anchor: DateTime<Utc>, steps: u32) -> Option<DateTime<Utc>> {
        match self {
            Stride::Days(n) => {
                let days = n.checked_mul(i64::from(steps))?;
                anchor.checked_add_signed(Duration::try_days(days)?)
            }
            Stride::Months(n) => anchor.checked_add_months(Months::new(n.checked_mul(steps)?)),
        }
    }
}

/// Stride and horizon (in months) for a recurring pattern.
fn stride_and_horizon(pattern: RecurrencePattern) -> Option<(Stride, u32)> {
    match pattern {
        RecurrencePattern::None => None,
        RecurrencePattern::Daily => Some((Stride::Days(1), 1)),
        RecurrencePattern::Weekly => Some((Stride::Days(7), 3)),
        RecurrencePattern::Monthly => Some((Stride::Months(1), 12)),
        RecurrencePattern::Yearly => Some((Stride::Months(12), 120)),
    }
}

/// The furthest instant (exclusive) up to which `pattern` generates occurrences
/// for an item anchored at `start`. `None` for non-recurring patterns.
pub fn horizon(pattern: RecurrencePattern, start: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let (_, months) = stride_and_horizon(pattern)?;
    start.checked_add_months(Months::new(months))
}

/// Expand a recurring item into its occurrences.
///
/// Returns an empty list when the item does not recur or has no `start`. The
/// first occurrence sits on the anchor itself; callers that already render the
/// anchor item should drop it (see [`crate::window::expand_for_window`]).
///
/// Every occurrence keeps the anchor's duration verbatim. A missing `end`
/// counts as zero duration, and an inverted range keeps its negative duration.
/// Occurrences generated from an occurrence point back at the original item.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use schedule_engine::item::{Calendar, Event, RecurrencePattern, Schedulable};
/// use schedule_engine::recurrence::expand;
///
/// let standup = Schedulable::Event(Event {
///     id: "standup".into(),
///     title: "Standup".into(),
///     description: None,
///     start: Some(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()),
///     end: Some(Utc.with_ymd_and_hms(2024, 1, 1, 9, 15, 0).unwrap()),
///     recurrence: RecurrencePattern::Weekly,
///     calendar: Calendar::default(),
///     category: None,
/// });
///
/// let occurrences = expand(&standup);
/// assert_eq!(occurrences.len(), 13);
/// assert_eq!(occurrences[0].id, "standup-recurring-20240101");
/// ```
pub fn expand(item: &Schedulable) -> Vec<Occurrence> {
    let Some((stride, _)) = stride_and_horizon(item.recurrence()) else {
        return Vec::new();
    };
    let Some(anchor) = item.start() else {
        debug!(
            "recurring item {} has no start; nothing to expand",
            item.id()
        );
        return Vec::new();
    };
    let Some(limit) = horizon(item.recurrence(), anchor) else {
        return Vec::new();
    };

    let duration = item.duration().unwrap_or_else(Duration::zero);
    let origin_kind = match item {
        Schedulable::Occurrence(o) => o.origin_kind,
        other => other.kind(),
    };
    let origin_id = item.origin_id();

    let mut occurrences = Vec::new();

    for step in 0..MAX_OCCURRENCES as u32 {
        let Some(start) = stride.nth(anchor, step) else {
            break;
        };
        if start >= limit {
            break;
        }
        let Some(end) = start.checked_add_signed(duration) else {
            debug!(
                "stopping expansion of {} at {}: end is out of range",
                item.id(),
                start
            );
            break;
        };

        let date = start.date_naive();
        occurrences.push(Occurrence {
            id: Occurrence::make_id(origin_id, date),
            origin_id: origin_id.to_string(),
            origin_kind,
            date,
            title: item.title().to_string(),
            description: item.description().map(str::to_string),
            start,
            end,
            recurrence: item.recurrence(),
            calendar: item.calendar().clone(),
            category: item.category().cloned(),
        });
    }

    trace!(
        "expanded {} ({}) into {} occurrences before {}",
        item.id(),
        item.recurrence(),
        occurrences.len(),
        limit
    );

    occurrences
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn horizon_table() {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();
        assert_eq!(horizon(RecurrencePattern::None, start), None);
        assert_eq!(
            horizon(RecurrencePattern::Daily, start),
            Some(Utc.with_ymd_and_hms(2024, 2, 15, 8, 0, 0).unwrap())
        );
        assert_eq!(
            horizon(RecurrencePattern::Weekly, start),
            Some(Utc.with_ymd_and_hms(2024, 4, 15, 8, 0, 0).unwrap())
        );
        assert_eq!(
            horizon(RecurrencePattern::Monthly, start),
            Some(Utc.with_ymd_and_hms(2025, 1, 15, 8, 0, 0).unwrap())
        );
        assert_eq!(
            horizon(RecurrencePattern::Yearly, start),
            Some(Utc.with_ymd_and_hms(2034, 1, 15, 8, 0, 0).unwrap())
        );
    }

    #[test]
    fn month_stride_clamps_without_drifting() {
        let jan31 = Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap();
        let feb = Stride::Months(1).nth(jan31, 1).unwrap();
        assert_eq!(feb, Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap());
        let mar = Stride::Months(1).nth(jan31, 2).unwrap();
        assert_eq!(mar, Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap());
    }

    #[test]
    fn stride_past_chrono_range_is_none() {
        let late = DateTime::<Utc>::MAX_UTC - Duration::hours(12);
        assert_eq!(Stride::Days(1).nth(late, 0), Some(late));
        assert_eq!(Stride::Days(1).nth(late, 1), None);
        assert_eq!(Stride::Months(1).nth(late, 1), None);
    }
}
