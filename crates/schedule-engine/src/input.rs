//! Lenient conversion from loosely typed input records into [`Schedulable`] items.
//!
//! Records come from outside the engine (a repository layer, a JSON file) and
//! may carry empty or malformed datetimes. Conversion never fails on a single
//! bad field: an unparseable datetime becomes `None`, an unknown recurrence
//! pattern becomes `NONE`, and the layout stage drops what it cannot place.

use chrono::{DateTime, NaiveDateTime, Utc};
use log::debug;
use serde::Deserialize;

use crate::error::{Result, ScheduleError};
use crate::item::{Calendar, Category, Event, RecurrencePattern, Schedulable, Task};

/// One item record as received from the persistence collaborator.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemInput {
    pub id: String,
    /// `"event"` (default) or `"task"`.
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default, alias = "recurrence")]
    pub recurrence_pattern: Option<String>,
    #[serde(default)]
    pub calendar_id: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

/// Items together with the calendars and categories they refer to.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleInput {
    #[serde(default)]
    pub items: Vec<ItemInput>,
    #[serde(default)]
    pub calendars: Vec<Calendar>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Bundle(ScheduleInput),
    Items(Vec<ItemInput>),
}

/// Parse an ISO 8601 datetime into `DateTime<Utc>`.
///
/// Accepts RFC 3339 (with offset) and naive `YYYY-MM-DDTHH:MM[:SS]`, which is
/// read as UTC wall-clock time.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidDatetime`] if neither form matches.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map(|ndt| ndt.and_utc())
        .map_err(|e| ScheduleError::InvalidDatetime(format!("'{}': {}", s, e)))
}

fn parse_datetime_lenient(field: &str, id: &str, raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw.filter(|s| !s.trim().is_empty())?;
    match parse_datetime(raw) {
        Ok(dt) => Some(dt),
        Err(err) => {
            debug!("item {}: ignoring {}: {}", id, field, err);
            None
        }
    }
}

fn lookup_calendar(calendars: &[Calendar], id: Option<&str>) -> Calendar {
    let Some(id) = id else {
        return Calendar::default();
    };
    calendars
        .iter()
        .find(|c| c.id == id)
        .cloned()
        .unwrap_or_else(|| Calendar {
            id: id.to_string(),
            label: id.to_string(),
            glyph: String::new(),
        })
}

fn lookup_category(categories: &[Category], id: Option<&str>) -> Option<Category> {
    let id = id?;
    let found = categories.iter().find(|c| c.id == id).cloned();
    if found.is_none() {
        debug!("unknown category {}; leaving item uncategorized", id);
    }
    found
}

impl ItemInput {
    /// Convert into a [`Schedulable`], resolving calendar and category ids
    /// against the supplied lists.
    ///
    /// A recurring record without a usable `start` is downgraded to `NONE`.
    pub fn resolve(&self, calendars: &[Calendar], categories: &[Category]) -> Schedulable {
        let start = parse_datetime_lenient("start", &self.id, self.start.as_deref());
        let end = parse_datetime_lenient("end", &self.id, self.end.as_deref());

        let mut recurrence = RecurrencePattern::from_lenient(self.recurrence_pattern.as_deref());
        if recurrence.is_recurring() && start.is_none() {
            debug!("item {}: {} recurrence without start; treating as NONE", self.id, recurrence);
            recurrence = RecurrencePattern::None;
        }

        let calendar = lookup_calendar(calendars, self.calendar_id.as_deref());
        let category = lookup_category(categories, self.category_id.as_deref());

        let is_task = self
            .kind
            .as_deref()
            .is_some_and(|k| k.eq_ignore_ascii_case("task"));

        if is_task {
            Schedulable::Task(Task {
                id: self.id.clone(),
                title: self.title.clone(),
                description: self.description.clone(),
                start,
                end,
                recurrence,
                calendar,
                category,
                completed: self.completed,
            })
        } else {
            Schedulable::Event(Event {
                id: self.id.clone(),
                title: self.title.clone(),
                description: self.description.clone(),
                start,
                end,
                recurrence,
                calendar,
                category,
            })
        }
    }
}

impl ScheduleInput {
    pub fn resolve(&self) -> Vec<Schedulable> {
        resolve_items(&self.items, &self.calendars, &self.categories)
    }
}

/// Convert a batch of records, resolving references against explicit lists.
pub fn resolve_items(
    inputs: &[ItemInput],
    calendars: &[Calendar],
    categories: &[Category],
) -> Vec<Schedulable> {
    inputs
        .iter()
        .map(|input| input.resolve(calendars, categories))
        .collect()
}

/// Parse a JSON document of items.
///
/// The document is either a bare array of item records or an object with
/// `items`, `calendars` and `categories` arrays.
///
/// # Errors
///
/// Returns [`ScheduleError::JsonParse`] if the document matches neither shape.
pub fn items_from_json(json: &str) -> Result<Vec<Schedulable>> {
    let document: Document = serde_json::from_str(json)?;
    Ok(match document {
        Document::Bundle(bundle) => bundle.resolve(),
        Document::Items(items) => resolve_items(&items, &[], &[]),
    })
}
