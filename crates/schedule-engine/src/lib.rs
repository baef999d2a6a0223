//! # schedule-engine
//!
//! Deterministic scheduling layout for calendar views.
//!
//! The engine is a set of pure transforms re-run on every render or interaction:
//! it expands recurring items into dated occurrences, lays a day's timed items
//! out in non-overlapping columns, computes where a dragged item lands, and
//! tells a click from a drag on the same press. It never caches, persists or
//! mutates its inputs, and it performs no timezone conversion.
//!
//! ## Modules
//!
//! - [`item`] — Events, tasks, occurrences and the shared accessor trait
//! - [`recurrence`] — Recurring item → bounded list of occurrences
//! - [`window`] — Items plus occurrences visible in a date window
//! - [`layout`] — Overlap grouping and column/offset geometry per day
//! - [`slot`] — Slot granularity and snapping
//! - [`reschedule`] — Drop instant → proposed new time range
//! - [`gesture`] — Click vs. drag state machine
//! - [`optimistic`] — Pending/committed/rolled-back edits on an item list
//! - [`input`] — Lenient conversion from loosely typed records
//! - [`config`] — Layout and gesture configuration
//! - [`error`] — Error types

pub mod config;
pub mod error;
pub mod gesture;
pub mod input;
pub mod item;
pub mod layout;
pub mod optimistic;
pub mod recurrence;
pub mod reschedule;
pub mod slot;
pub mod window;

pub use config::{GestureConfig, Grouping, LayoutConfig};
pub use error::ScheduleError;
pub use gesture::{GestureDisambiguator, GestureEvent, GestureState};
pub use input::{items_from_json, ItemInput, ScheduleInput};
pub use item::{
    Calendar, Category, Event, ItemKind, Occurrence, RecurrencePattern, Schedulable, ScheduleItem,
    Task,
};
pub use layout::{layout, layout_by_day, PositionedItem};
pub use optimistic::{OptimisticUpdate, UpdateOutcome, UpdateState};
pub use recurrence::expand;
pub use reschedule::{reschedule, ProposedRange};
pub use slot::SlotGranularity;
pub use window::expand_for_window;
