use chrono::{NaiveTime, Weekday};

use crate::models::{AvailabilityError, Slot};
use super::schedule::WeeklyAvailability;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// No slot being composed or edited.
    Idle,
    /// A candidate for a new slot on `day` is being entered.
    Composing { day: Weekday },
    /// The slot at `index` on `day` is loaded into the draft for revision.
    Editing { day: Weekday, index: usize },
}

/// Candidate fields the edit screen binds its start/end/capacity inputs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotDraft {
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub capacity: Option<i32>,
}

/// The controller an edit screen drives: append-new and edit-in-place both
/// funnel through the schedule's single validation path. On a validation
/// failure the editor keeps its state and draft so the user can correct the
/// candidate and retry; the schedule itself is never partially mutated.
#[derive(Debug, Clone)]
pub struct AvailabilityEditor {
    availability: WeeklyAvailability,
    state: EditorState,
    draft: SlotDraft,
}

impl AvailabilityEditor {
    pub fn new(availability: WeeklyAvailability) -> Self {
        Self {
            availability,
            state: EditorState::Idle,
            draft: SlotDraft::default(),
        }
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn draft(&self) -> &SlotDraft {
        &self.draft
    }

    pub fn availability(&self) -> &WeeklyAvailability {
        &self.availability
    }

    pub fn into_availability(self) -> WeeklyAvailability {
        self.availability
    }

    /// Start entering a new slot for `day`. Any in-progress session is
    /// discarded, matching the edit screens where clicking into another day
    /// abandons the current candidate.
    pub fn begin_compose(&mut self, day: Weekday) {
        self.draft = SlotDraft::default();
        self.state = EditorState::Composing { day };
    }

    /// Load an existing slot's fields into the draft for in-place revision.
    pub fn begin_edit(&mut self, day: Weekday, index: usize) -> Result<(), AvailabilityError> {
        let slot = self
            .availability
            .slots_for(day)
            .get(index)
            .ok_or(AvailabilityError::IndexOutOfRange { day, index })?;

        self.draft = SlotDraft {
            start_time: Some(slot.start_time),
            end_time: Some(slot.end_time),
            capacity: slot.capacity,
        };
        self.state = EditorState::Editing { day, index };
        Ok(())
    }

    pub fn set_start_time(&mut self, start: NaiveTime) {
        self.draft.start_time = Some(start);
    }

    pub fn set_end_time(&mut self, end: NaiveTime) {
        self.draft.end_time = Some(end);
    }

    pub fn set_capacity(&mut self, capacity: Option<i32>) {
        self.draft.capacity = capacity;
    }

    /// Discard the candidate; the original slot (if editing) is unchanged.
    pub fn cancel(&mut self) {
        self.draft = SlotDraft::default();
        self.state = EditorState::Idle;
    }

    /// Commit the draft through `add` or `update`. Succeeding returns the
    /// editor to `Idle` with a cleared draft; failing leaves everything in
    /// place for correction. Committing with no active session or with
    /// missing times fails with `MissingField`.
    pub fn commit(&mut self) -> Result<(), AvailabilityError> {
        let (start, end) = match (self.draft.start_time, self.draft.end_time) {
            (Some(start), Some(end)) => (start, end),
            _ => return Err(AvailabilityError::MissingField),
        };

        match self.state {
            EditorState::Idle => return Err(AvailabilityError::MissingField),
            EditorState::Composing { day } => {
                self.availability.add(day, Slot::new(start, end, self.draft.capacity))?;
            }
            EditorState::Editing { day, index } => {
                // A previously persisted slot keeps its backend identity
                // through an edit.
                let id = self.availability.slots_for(day).get(index).and_then(|s| s.id);
                let slot = Slot {
                    start_time: start,
                    end_time: end,
                    capacity: self.draft.capacity,
                    id,
                };
                self.availability.update(day, index, slot)?;
            }
        }

        self.draft = SlotDraft::default();
        self.state = EditorState::Idle;
        Ok(())
    }
}
