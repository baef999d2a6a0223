//! Schedulable items: events, tasks and generated occurrences.
//!
//! All three variants share the [`ScheduleItem`] accessor trait. Code that needs
//! variant-specific behavior matches on [`Schedulable`] directly.
//!
//! Instants are `DateTime<Utc>` treated as wall-clock time. The engine performs
//! no timezone conversion; "minutes since day start" is taken on the UTC clock.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// How an item repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurrencePattern {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurrencePattern {
    /// Parse a pattern name, treating anything unknown or absent as `None`.
    pub fn from_lenient(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }

    pub fn is_recurring(self) -> bool {
        self != RecurrencePattern::None
    }
}

impl FromStr for RecurrencePattern {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "" | "NONE" => Ok(RecurrencePattern::None),
            "DAILY" => Ok(RecurrencePattern::Daily),
            "WEEKLY" => Ok(RecurrencePattern::Weekly),
            "MONTHLY" => Ok(RecurrencePattern::Monthly),
            "YEARLY" => Ok(RecurrencePattern::Yearly),
            _ => Err(ScheduleError::InvalidPattern(s.to_string())),
        }
    }
}

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecurrencePattern::None => "NONE",
            RecurrencePattern::Daily => "DAILY",
            RecurrencePattern::Weekly => "WEEKLY",
            RecurrencePattern::Monthly => "MONTHLY",
            RecurrencePattern::Yearly => "YEARLY",
        };
        f.write_str(name)
    }
}

/// A calendar an item belongs to. Display-only; layout never looks at it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Calendar {
    pub id: String,
    pub label: String,
    /// Short icon or emoji shown next to the label.
    pub glyph: String,
}

/// An optional category tag. Display-only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub label: String,
    pub color: String,
}

/// Which concrete kind of item something is, or was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Event,
    Task,
    Occurrence,
}

/// A calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub recurrence: RecurrencePattern,
    pub calendar: Calendar,
    pub category: Option<Category>,
}

/// A to-do item with an optional time block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub recurrence: RecurrencePattern,
    pub calendar: Calendar,
    pub category: Option<Category>,
    #[serde(default)]
    pub completed: bool,
}

/// One generated instance of a recurring event or task.
///
/// Occurrences are produced fresh on every expansion and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    /// `"{origin_id}-recurring-{YYYYMMDD}"`.
    pub id: String,
    pub origin_id: String,
    pub origin_kind: ItemKind,
    pub date: NaiveDate,
    pub title: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub recurrence: RecurrencePattern,
    pub calendar: Calendar,
    pub category: Option<Category>,
}

impl Occurrence {
    /// Build the stable id for the occurrence of `origin_id` on `date`.
    pub fn make_id(origin_id: &str, date: NaiveDate) -> String {
        format!("{}-recurring-{}", origin_id, date.format("%Y%m%d"))
    }
}

/// Read access shared by every kind of schedulable item.
pub trait ScheduleItem {
    fn id(&self) -> &str;
    fn title(&self) -> &str;
    fn description(&self) -> Option<&str>;
    fn start(&self) -> Option<DateTime<Utc>>;
    fn end(&self) -> Option<DateTime<Utc>>;
    fn recurrence(&self) -> RecurrencePattern;
    fn calendar(&self) -> &Calendar;
    fn category(&self) -> Option<&Category>;

    /// `end - start`, or `None` if either bound is missing. May be negative.
    fn duration(&self) -> Option<Duration> {
        Some(self.end()? - self.start()?)
    }

    /// Both bounds, if present and not inverted.
    fn time_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let (start, end) = (self.start()?, self.end()?);
        (end >= start).then_some((start, end))
    }
}

macro_rules! impl_schedule_item {
    ($ty:ty) => {
        impl ScheduleItem for $ty {
            fn id(&self) -> &str {
                &self.id
            }
            fn title(&self) -> &str {
                &self.title
            }
            fn description(&self) -> Option<&str> {
                self.description.as_deref()
            }
            fn start(&self) -> Option<DateTime<Utc>> {
                self.start
            }
            fn end(&self) -> Option<DateTime<Utc>> {
                self.end
            }
            fn recurrence(&self) -> RecurrencePattern {
                self.recurrence
            }
            fn calendar(&self) -> &Calendar {
                &self.calendar
            }
            fn category(&self) -> Option<&Category> {
                self.category.as_ref()
            }
        }
    };
}

impl_schedule_item!(Event);
impl_schedule_item!(Task);

impl ScheduleItem for Occurrence {
    fn id(&self) -> &str {
        &self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
    fn start(&self) -> Option<DateTime<Utc>> {
        Some(self.start)
    }
    fn end(&self) -> Option<DateTime<Utc>> {
        Some(self.end)
    }
    fn recurrence(&self) -> RecurrencePattern {
        self.recurrence
    }
    fn calendar(&self) -> &Calendar {
        &self.calendar
    }
    fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }
}

/// Any item that can be placed on a calendar surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Schedulable {
    Event(Event),
    Task(Task),
    Occurrence(Occurrence),
}

impl Schedulable {
    pub fn kind(&self) -> ItemKind {
        match self {
            Schedulable::Event(_) => ItemKind::Event,
            Schedulable::Task(_) => ItemKind::Task,
            Schedulable::Occurrence(_) => ItemKind::Occurrence,
        }
    }

    fn as_item(&self) -> &dyn ScheduleItem {
        match self {
            Schedulable::Event(e) => e,
            Schedulable::Task(t) => t,
            Schedulable::Occurrence(o) => o,
        }
    }

    /// The id of the persisted item this one stands for.
    ///
    /// For events and tasks this is their own id; occurrences point back at
    /// the recurring item that generated them.
    pub fn origin_id(&self) -> &str {
        match self {
            Schedulable::Occurrence(o) => &o.origin_id,
            other => other.id(),
        }
    }

    /// Return a copy carrying a different id.
    pub fn with_id(&self, id: impl Into<String>) -> Schedulable {
        let mut renamed = self.clone();
        let slot = match &mut renamed {
            Schedulable::Event(e) => &mut e.id,
            Schedulable::Task(t) => &mut t.id,
            Schedulable::Occurrence(o) => &mut o.id,
        };
        *slot = id.into();
        renamed
    }

    /// Replace the time range, returning the updated copy.
    ///
    /// Occurrences keep their generated date; only their instants move.
    pub fn with_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Schedulable {
        let mut moved = self.clone();
        match &mut moved {
            Schedulable::Event(e) => {
                e.start = Some(start);
                e.end = Some(end);
            }
            Schedulable::Task(t) => {
                t.start = Some(start);
                t.end = Some(end);
            }
            Schedulable::Occurrence(o) => {
                o.start = start;
                o.end = end;
            }
        }
        moved
    }
}

impl ScheduleItem for Schedulable {
    fn id(&self) -> &str {
        self.as_item().id()
    }
    fn title(&self) -> &str {
        self.as_item().title()
    }
    fn description(&self) -> Option<&str> {
        self.as_item().description()
    }
    fn start(&self) -> Option<DateTime<Utc>> {
        self.as_item().start()
    }
    fn end(&self) -> Option<DateTime<Utc>> {
        self.as_item().end()
    }
    fn recurrence(&self) -> RecurrencePattern {
        self.as_item().recurrence()
    }
    fn calendar(&self) -> &Calendar {
        self.as_item().calendar()
    }
    fn category(&self) -> Option<&Category> {
        self.as_item().category()
    }
}

impl From<Event> for Schedulable {
    fn from(e: Event) -> Self {
        Schedulable::Event(e)
    }
}

impl From<Task> for Schedulable {
    fn from(t: Task) -> Self {
        Schedulable::Task(t)
    }
}

impl From<Occurrence> for Schedulable {
    fn from(o: Occurrence) -> Self {
        Schedulable::Occurrence(o)
    }
}
