//! Layout and expansion throughput on a busy week.

use std::hint::black_box;

use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use schedule_engine::config::{Grouping, LayoutConfig};
use schedule_engine::item::{Calendar, Event, RecurrencePattern, Schedulable};
use schedule_engine::layout::layout_by_day;
use schedule_engine::window::expand_for_window;

fn busy_week() -> Vec<Schedulable> {
    let monday = Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap();
    (0..200)
        .map(|i| {
            let start = monday + Duration::minutes((i * 37) % (7 * 24 * 60));
            let pattern = match i % 10 {
                0 => RecurrencePattern::Daily,
                1 => RecurrencePattern::Weekly,
                _ => RecurrencePattern::None,
            };
            Schedulable::Event(Event {
                id: format!("evt-{}", i),
                title: format!("Event {}", i),
                description: None,
                start: Some(start),
                end: Some(start + Duration::minutes(15 + (i % 8) * 15)),
                recurrence: pattern,
                calendar: Calendar::default(),
                category: None,
            })
        })
        .collect()
}

fn bench_layout(c: &mut Criterion) {
    let items = busy_week();
    let week_start = Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap();
    let week_end = week_start + Duration::days(7);
    let visible = expand_for_window(&items, week_start, week_end);

    c.bench_function("expand_for_window/week", |b| {
        b.iter(|| expand_for_window(black_box(&items), week_start, week_end))
    });

    let first_fit = LayoutConfig::default();
    c.bench_function("layout_by_day/first_fit", |b| {
        b.iter(|| layout_by_day(black_box(&visible), &first_fit))
    });

    let transitive = LayoutConfig {
        grouping: Grouping::Transitive,
        ..LayoutConfig::default()
    };
    c.bench_function("layout_by_day/transitive", |b| {
        b.iter(|| layout_by_day(black_box(&visible), &transitive))
    });
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
