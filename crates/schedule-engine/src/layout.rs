//! Overlap layout: positions a day's timed items in side-by-side columns.
//!
//! Items whose half-open ranges overlap are gathered into a group and share the
//! day's width equally; items in different groups each get the full width.
//! Vertical placement is proportional to time of day and duration.
//!
//! Two items overlap when `a.start < b.end && b.start < a.end`. Items that only
//! touch (one ends exactly when the other starts) do not overlap.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use serde::Serialize;

use crate::config::{Grouping, LayoutConfig};
use crate::item::{Schedulable, ScheduleItem};
use crate::slot::minutes_since_day_start;

/// An item with its computed column and vertical geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedItem {
    pub item: Schedulable,
    /// Zero-based column within the item's overlap group.
    pub column_index: usize,
    /// Number of columns in the item's overlap group.
    pub column_count: usize,
    /// Distance from the top of the day, in render units.
    pub top_offset: f64,
    /// Rendered height, never below the configured minimum.
    pub height: f64,
    /// Left edge as a percentage of the day column's width.
    pub left_percent: f64,
    /// Width as a percentage of the day column's width, gap already removed.
    pub width_percent: f64,
}

/// An item that survived the temporal pre-filter.
#[derive(Debug, Clone, Copy)]
struct Timed<'a> {
    item: &'a Schedulable,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Timed<'_> {
    fn overlaps(&self, other: &Timed<'_>) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Lay out one day's items.
///
/// Items missing `start` or `end`, or whose `end` precedes `start`, are left
/// out silently. Output lists groups in the order they were formed, and each
/// group's members in column order (ascending start, ties keep input order).
/// The result depends only on the input, so repeated calls with the same
/// items return identical positions.
pub fn layout(items: &[Schedulable], config: &LayoutConfig) -> Vec<PositionedItem> {
    let refs: Vec<&Schedulable> = items.iter().collect();
    layout_refs(&refs, config)
}

/// Partition items by the calendar date of their `start` and lay out each day.
///
/// Items without a usable time range are skipped.
pub fn layout_by_day(
    items: &[Schedulable],
    config: &LayoutConfig,
) -> BTreeMap<NaiveDate, Vec<PositionedItem>> {
    let mut days: BTreeMap<NaiveDate, Vec<&Schedulable>> = BTreeMap::new();
    for item in items {
        match item.time_range() {
            Some((start, _)) => days.entry(start.date_naive()).or_default().push(item),
            None => debug!("skipping {} in day partition: no usable time range", item.id()),
        }
    }

    days.into_iter()
        .map(|(date, day_items)| (date, layout_refs(&day_items, config)))
        .collect()
}

fn layout_refs(items: &[&Schedulable], config: &LayoutConfig) -> Vec<PositionedItem> {
    let timed: Vec<Timed<'_>> = items
        .iter()
        .copied()
        .filter_map(|item| match item.time_range() {
            Some((start, end)) => Some(Timed { item, start, end }),
            None => {
                debug!(
                    "excluding {} from layout: missing or inverted time range",
                    item.id()
                );
                None
            }
        })
        .collect();

    let groups = match config.grouping {
        Grouping::FirstFit => group_first_fit(&timed),
        Grouping::Transitive => group_transitive(&timed),
    };

    let mut positioned = Vec::with_capacity(timed.len());
    for mut group in groups {
        // Stable: equal starts keep input order.
        group.sort_by_key(|&idx| timed[idx].start);
        let column_count = group.len();
        for (column_index, idx) in group.into_iter().enumerate() {
            positioned.push(position(&timed[idx], column_index, column_count, config));
        }
    }
    positioned
}

/// Each item joins the first group that has a member it overlaps.
fn group_first_fit(timed: &[Timed<'_>]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (idx, entry) in timed.iter().enumerate() {
        let existing = groups
            .iter_mut()
            .find(|group| group.iter().any(|&member| timed[member].overlaps(entry)));
        match existing {
            Some(group) => group.push(idx),
            None => groups.push(vec![idx]),
        }
    }
    groups
}

/// Connected components of the pairwise overlap graph (union-find).
///
/// Groups are ordered by their earliest input position.
fn group_transitive(timed: &[Timed<'_>]) -> Vec<Vec<usize>> {
    let mut parent: Vec<usize> = (0..timed.len()).collect();

    fn find(parent: &mut [usize], mut x: usize) -> usize {
        while parent[x] != x {
            parent[x] = parent[parent[x]];
            x = parent[x];
        }
        x
    }

    for i in 0..timed.len() {
        for j in (i + 1)..timed.len() {
            if timed[i].overlaps(&timed[j]) {
                let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
                if ri != rj {
                    // Keep the smaller index as root so group order follows input order.
                    let (lo, hi) = (ri.min(rj), ri.max(rj));
                    parent[hi] = lo;
                }
            }
        }
    }

    let mut by_root: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for idx in 0..timed.len() {
        let root = find(&mut parent, idx);
        by_root.entry(root).or_default().push(idx);
    }
    by_root.into_values().collect()
}

fn position(
    entry: &Timed<'_>,
    column_index: usize,
    column_count: usize,
    config: &LayoutConfig,
) -> PositionedItem {
    let per_minute = config.units_per_minute();
    let top_offset = f64::from(minutes_since_day_start(entry.start)) * per_minute;
    let duration_minutes = (entry.end - entry.start).num_minutes() as f64;
    let height = (duration_minutes * per_minute).max(config.min_height);

    let share = 100.0 / column_count as f64;

    PositionedItem {
        item: entry.item.clone(),
        column_index,
        column_count,
        top_offset,
        height,
        left_percent: share * column_index as f64,
        width_percent: (share - config.column_gap_percent).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Calendar, Event, RecurrencePattern};
    use chrono::TimeZone;

    fn timed_event(id: &str, start: (u32, u32), end: (u32, u32)) -> Schedulable {
        Schedulable::Event(Event {
            id: id.into(),
            title: id.into(),
            description: None,
            start: Some(Utc.with_ymd_and_hms(2024, 3, 4, start.0, start.1, 0).unwrap()),
            end: Some(Utc.with_ymd_and_hms(2024, 3, 4, end.0, end.1, 0).unwrap()),
            recurrence: RecurrencePattern::None,
            calendar: Calendar::default(),
            category: None,
        })
    }

    #[test]
    fn first_fit_keeps_bridged_groups_apart() {
        // A and C don't overlap; B bridges them but arrives last.
        let items = vec![
            timed_event("a", (9, 0), (10, 0)),
            timed_event("c", (10, 30), (11, 30)),
            timed_event("b", (9, 30), (11, 0)),
        ];
        let timed: Vec<Timed<'_>> = items
            .iter()
            .map(|item| {
                let (start, end) = item.time_range().unwrap();
                Timed { item, start, end }
            })
            .collect();

        assert_eq!(group_first_fit(&timed), vec![vec![0, 2], vec![1]]);
        assert_eq!(group_transitive(&timed), vec![vec![0, 1, 2]]);
    }
}
