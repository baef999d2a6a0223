//! Visible-window assembly: persisted items plus their generated occurrences.

use chrono::{DateTime, Utc};
use log::debug;

use crate::item::{Schedulable, ScheduleItem};
use crate::recurrence;

/// Whether `[start, end)` touches `[window_start, window_end)`.
///
/// Zero-length and inverted items count when their start lies inside the window.
fn in_window(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> bool {
    if end <= start {
        return start >= window_start && start < window_end;
    }
    start < window_end && window_start < end
}

/// Collect everything to render between `window_start` and `window_end`.
///
/// Each item with a `start` is kept if it overlaps the window. Recurring items
/// are expanded and their occurrences kept under the same rule, except the
/// occurrence on the anchor's own calendar day, which would duplicate the
/// anchor item itself. Items without a `start` are dropped.
///
/// The result is sorted by start; equal starts keep the order in which they
/// were produced (each item followed by its occurrences).
pub fn expand_for_window(
    items: &[Schedulable],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<Schedulable> {
    let mut visible: Vec<Schedulable> = Vec::new();

    for item in items {
        let Some(start) = item.start() else {
            debug!("dropping {} from window: no start", item.id());
            continue;
        };
        let end = item.end().unwrap_or(start);
        if in_window(start, end, window_start, window_end) {
            visible.push(item.clone());
        }

        let anchor_day = start.date_naive();
        visible.extend(
            recurrence::expand(item)
                .into_iter()
                .filter(|occ| occ.date != anchor_day)
                .filter(|occ| in_window(occ.start, occ.end, window_start, window_end))
                .map(Schedulable::Occurrence),
        );
    }

    visible.sort_by_key(|item| item.start());
    visible
}
