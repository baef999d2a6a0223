//! Tests for drop-to-reschedule range computation.

use chrono::{DateTime, Duration, TimeZone, Utc};
use schedule_engine::item::{
    Calendar, Event, ItemKind, Occurrence, RecurrencePattern, Schedulable, Task,
};
use schedule_engine::reschedule::reschedule;
use schedule_engine::slot::SlotGranularity;

fn at(day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, hour, min, 0).unwrap()
}

fn event(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Schedulable {
    Schedulable::Event(Event {
        id: "evt".to_string(),
        title: "Planning".to_string(),
        description: None,
        start,
        end,
        recurrence: RecurrencePattern::None,
        calendar: Calendar::default(),
        category: None,
    })
}

#[test]
fn drop_is_floored_to_slot_and_duration_kept() {
    let item = event(Some(at(3, 14, 0)), Some(at(3, 14, 30)));

    let moved = reschedule(&item, at(3, 16, 7), SlotGranularity::THIRTY_MINUTES).unwrap();

    assert_eq!(moved.start, at(3, 16, 0));
    assert_eq!(moved.end, at(3, 16, 30));
    assert_eq!(moved.duration(), Duration::minutes(30));
}

#[test]
fn seconds_are_zeroed_even_on_a_boundary_minute() {
    let item = event(Some(at(3, 9, 0)), Some(at(3, 10, 0)));
    let drop = Utc.with_ymd_and_hms(2024, 6, 3, 11, 30, 45).unwrap();

    let moved = reschedule(&item, drop, SlotGranularity::THIRTY_MINUTES).unwrap();

    assert_eq!(moved.start, at(3, 11, 30));
    assert_eq!(moved.end, at(3, 12, 30));
}

#[test]
fn finer_granularity_snaps_closer() {
    let item = event(Some(at(3, 9, 0)), Some(at(3, 9, 45)));

    let moved = reschedule(&item, at(3, 16, 7), SlotGranularity::FIFTEEN_MINUTES).unwrap();

    assert_eq!(moved.start, at(3, 16, 0));
    assert_eq!(moved.end, at(3, 16, 45));

    let moved = reschedule(&item, at(3, 16, 22), SlotGranularity::FIFTEEN_MINUTES).unwrap();
    assert_eq!(moved.start, at(3, 16, 15));
}

#[test]
fn multi_day_span_survives_a_move_to_another_day() {
    let item = event(Some(at(3, 22, 0)), Some(at(5, 2, 0)));

    let moved = reschedule(&item, at(10, 8, 50), SlotGranularity::THIRTY_MINUTES).unwrap();

    assert_eq!(moved.start, at(10, 8, 30));
    assert_eq!(moved.end, at(11, 12, 30));
}

#[test]
fn inverted_item_propagates_negative_duration() {
    let item = event(Some(at(3, 10, 0)), Some(at(3, 9, 0)));

    let moved = reschedule(&item, at(3, 15, 0), SlotGranularity::THIRTY_MINUTES).unwrap();

    assert_eq!(moved.start, at(3, 15, 0));
    assert_eq!(moved.end, at(3, 14, 0));
    assert_eq!(moved.duration(), Duration::hours(-1));
}

#[test]
fn missing_end_means_zero_duration() {
    let item = event(Some(at(3, 10, 0)), None);
    let moved = reschedule(&item, at(3, 13, 10), SlotGranularity::ONE_HOUR).unwrap();
    assert_eq!(moved.start, at(3, 13, 0));
    assert_eq!(moved.end, moved.start);
}

#[test]
fn missing_start_gives_no_proposal() {
    let item = Schedulable::Task(Task {
        id: "todo".to_string(),
        title: "Unscheduled".to_string(),
        description: None,
        start: None,
        end: Some(at(3, 10, 0)),
        recurrence: RecurrencePattern::None,
        calendar: Calendar::default(),
        category: None,
        completed: false,
    });
    assert_eq!(reschedule(&item, at(3, 13, 0), SlotGranularity::THIRTY_MINUTES), None);
}

#[test]
fn occurrences_reschedule_like_their_origin() {
    let occ = Schedulable::Occurrence(Occurrence {
        id: "evt-recurring-20240604".to_string(),
        origin_id: "evt".to_string(),
        origin_kind: ItemKind::Event,
        date: at(4, 0, 0).date_naive(),
        title: "Planning".to_string(),
        description: None,
        start: at(4, 9, 0),
        end: at(4, 10, 15),
        recurrence: RecurrencePattern::Daily,
        calendar: Calendar::default(),
        category: None,
    });

    let moved = reschedule(&occ, at(4, 13, 59), SlotGranularity::THIRTY_MINUTES).unwrap();

    assert_eq!(moved.start, at(4, 13, 30));
    assert_eq!(moved.end, at(4, 14, 45));
}

#[test]
fn input_item_is_left_unchanged() {
    let item = event(Some(at(3, 14, 0)), Some(at(3, 14, 30)));
    let before = item.clone();
    let _ = reschedule(&item, at(3, 16, 7), SlotGranularity::THIRTY_MINUTES);
    assert_eq!(item, before);
}

#[test]
fn span_past_the_end_of_time_yields_no_proposal() {
    let item = event(
        Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        Some(DateTime::<Utc>::MAX_UTC),
    );

    assert_eq!(
        reschedule(&item, at(1, 0, 0), SlotGranularity::THIRTY_MINUTES),
        None
    );
}
