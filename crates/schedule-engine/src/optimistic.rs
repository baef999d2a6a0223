//! Optimistic edits against an in-memory item list.
//!
//! A change is applied to the list immediately and stays `Pending` until the
//! persistence layer answers. Success replaces the optimistic value with the
//! persisted one; failure restores the list to how it was before the change.
//!
//! The list is always passed in explicitly; nothing here holds on to it.

use std::fmt::Display;

use log::{debug, warn};

use crate::item::{Schedulable, ScheduleItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateState {
    Pending,
    Committed,
    RolledBack,
}

/// How a settled change ended.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The change stuck. `id` is the id the item carries from now on (the
    /// persisted id for creates), or the removed id for deletes.
    Committed { id: String },
    /// The change was reverted; `reason` is the persistence layer's error.
    RolledBack { reason: String },
}

#[derive(Debug, Clone)]
enum Change {
    Create { temp_id: String },
    Update { previous: Schedulable },
    Delete { previous: Schedulable, index: usize },
}

/// One in-flight optimistic change.
#[derive(Debug, Clone)]
pub struct OptimisticUpdate {
    change: Change,
    state: UpdateState,
    outcome: Option<UpdateOutcome>,
}

impl OptimisticUpdate {
    fn pending(change: Change) -> Self {
        Self {
            change,
            state: UpdateState::Pending,
            outcome: None,
        }
    }

    /// Append `item` under a temporary id until the real one is known.
    pub fn begin_create(
        items: &mut Vec<Schedulable>,
        item: &Schedulable,
        temp_id: impl Into<String>,
    ) -> Self {
        let temp_id = temp_id.into();
        items.push(item.with_id(temp_id.clone()));
        Self::pending(Change::Create { temp_id })
    }

    /// Replace the item sharing `updated`'s id. `None` if no such item exists.
    pub fn begin_update(items: &mut [Schedulable], updated: Schedulable) -> Option<Self> {
        let slot = items.iter_mut().find(|item| item.id() == updated.id())?;
        let previous = std::mem::replace(slot, updated);
        Some(Self::pending(Change::Update { previous }))
    }

    /// Remove the item with `id`. `None` if no such item exists.
    pub fn begin_delete(items: &mut Vec<Schedulable>, id: &str) -> Option<Self> {
        let index = items.iter().position(|item| item.id() == id)?;
        let previous = items.remove(index);
        Some(Self::pending(Change::Delete { previous, index }))
    }

    pub fn state(&self) -> UpdateState {
        self.state
    }

    /// Id of the item this change is tracking in the list right now.
    pub fn tracked_id(&self) -> &str {
        match &self.change {
            Change::Create { temp_id } => temp_id,
            Change::Update { previous } | Change::Delete { previous, .. } => previous.id(),
        }
    }

    /// Resolve the change with the persistence layer's answer.
    ///
    /// `Ok(Some(item))` replaces the optimistic entry with the persisted item;
    /// `Ok(None)` keeps the optimistic entry as it is. `Err` reverts the list.
    /// Settling an already settled change returns the recorded outcome and
    /// leaves the list alone.
    pub fn settle<E: Display>(
        &mut self,
        items: &mut Vec<Schedulable>,
        result: Result<Option<Schedulable>, E>,
    ) -> UpdateOutcome {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }

        let outcome = match result {
            Ok(persisted) => self.commit(items, persisted),
            Err(err) => {
                warn!("rolling back change to {}: {}", self.tracked_id(), err);
                self.rollback(items);
                UpdateOutcome::RolledBack {
                    reason: err.to_string(),
                }
            }
        };

        self.state = match outcome {
            UpdateOutcome::Committed { .. } => UpdateState::Committed,
            UpdateOutcome::RolledBack { .. } => UpdateState::RolledBack,
        };
        self.outcome = Some(outcome.clone());
        outcome
    }

    fn commit(&self, items: &mut [Schedulable], persisted: Option<Schedulable>) -> UpdateOutcome {
        let tracked = self.tracked_id().to_string();
        if let Change::Delete { .. } = self.change {
            return UpdateOutcome::Committed { id: tracked };
        }

        let slot = items.iter_mut().find(|item| item.id() == tracked);
        match (slot, persisted) {
            (Some(slot), Some(persisted)) => {
                let id = persisted.id().to_string();
                *slot = persisted;
                UpdateOutcome::Committed { id }
            }
            (Some(_), None) => UpdateOutcome::Committed { id: tracked },
            (None, persisted) => {
                debug!("{} left the list before its change settled", tracked);
                let id = persisted.map_or(tracked, |p| p.id().to_string());
                UpdateOutcome::Committed { id }
            }
        }
    }

    fn rollback(&self, items: &mut Vec<Schedulable>) {
        match &self.change {
            Change::Create { temp_id } => items.retain(|item| item.id() != temp_id),
            Change::Update { previous } => {
                if let Some(slot) = items.iter_mut().find(|item| item.id() == previous.id()) {
                    *slot = previous.clone();
                }
            }
            Change::Delete { previous, index } => {
                let at = (*index).min(items.len());
                items.insert(at, previous.clone());
            }
        }
    }
}
