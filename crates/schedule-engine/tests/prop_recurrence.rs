//! Property-based tests for recurrence expansion using proptest.
//!
//! These tests verify invariants that hold for *any* anchor, duration and
//! pattern, not just the specific dates in `recurrence_tests.rs`.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use schedule_engine::item::{Calendar, Event, RecurrencePattern, Schedulable, ScheduleItem};
use schedule_engine::recurrence::{expand, horizon};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_pattern() -> impl Strategy<Value = RecurrencePattern> {
    prop_oneof![
        Just(RecurrencePattern::Daily),
        Just(RecurrencePattern::Weekly),
        Just(RecurrencePattern::Monthly),
        Just(RecurrencePattern::Yearly),
    ]
}

/// An anchored item in 2023–2027 with a -60..=600 minute duration.
/// Day runs to 31 so month-end clamping gets exercised; invalid dates are
/// filtered out.
fn arb_item() -> impl Strategy<Value = Schedulable> {
    (
        2023i32..=2027,
        1u32..=12,
        1u32..=31,
        0u32..=23,
        0u32..=59,
        -60i64..=600,
        arb_pattern(),
    )
        .prop_filter_map("invalid calendar date", |(y, m, d, h, min, dur, pattern)| {
            let start = Utc.with_ymd_and_hms(y, m, d, h, min, 0).single()?;
            Some(Schedulable::Event(Event {
                id: "p".to_string(),
                title: "Prop".to_string(),
                description: None,
                start: Some(start),
                end: Some(start + Duration::minutes(dur)),
                recurrence: pattern,
                calendar: Calendar::default(),
                category: None,
            }))
        })
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: Strictly increasing starts, first on the anchor
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn starts_strictly_increase_from_anchor(item in arb_item()) {
        let occurrences = expand(&item);
        prop_assert!(!occurrences.is_empty());
        prop_assert_eq!(Some(occurrences[0].start), item.start());
        for pair in occurrences.windows(2) {
            prop_assert!(pair[0].start < pair[1].start);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: Every occurrence is before the horizon
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn occurrences_stay_before_horizon(item in arb_item()) {
        let limit = horizon(item.recurrence(), item.start().unwrap()).unwrap();
        for occ in expand(&item) {
            prop_assert!(occ.start < limit, "{} is not before {}", occ.start, limit);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: Duration preserved verbatim
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn duration_preserved(item in arb_item()) {
        let expected = item.duration().unwrap();
        for occ in expand(&item) {
            prop_assert_eq!(occ.end - occ.start, expected);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: Ids are unique and derived from origin and date
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn ids_unique_and_derived(item in arb_item()) {
        let occurrences = expand(&item);
        let mut seen = std::collections::HashSet::new();
        for occ in &occurrences {
            prop_assert!(seen.insert(occ.id.clone()), "duplicate id {}", occ.id);
            prop_assert_eq!(&occ.id, &format!("p-recurring-{}", occ.date.format("%Y%m%d")));
            prop_assert_eq!(occ.date, occ.start.date_naive());
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: Counts match the stride/horizon table
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn counts_match_pattern(item in arb_item()) {
        let n = expand(&item).len();
        match item.recurrence() {
            RecurrencePattern::Daily => prop_assert!((28..=31).contains(&n)),
            RecurrencePattern::Weekly => prop_assert!((13..=14).contains(&n)),
            RecurrencePattern::Monthly => prop_assert_eq!(n, 12),
            RecurrencePattern::Yearly => prop_assert_eq!(n, 10),
            RecurrencePattern::None => prop_assert_eq!(n, 0),
        }
    }
}
