use chrono::Weekday;

use crate::models::{day_index, AvailabilityError, Slot};

/// The authoritative in-memory schedule for one doctor or hospital: one
/// ordered slot sequence per weekday. Every mutation validates before it
/// commits, so a held schedule never contains overlapping slots and no
/// partial mutation is ever visible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeeklyAvailability {
    days: [Vec<Slot>; 7],
}

impl WeeklyAvailability {
    /// An empty schedule: all seven days present, no slots.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots_for(&self, day: Weekday) -> &[Slot] {
        &self.days[day_index(day)]
    }

    /// Whether `candidate` fits into `day` without overlapping an existing
    /// slot. `excluding` skips the comparison at that index so a slot being
    /// edited is not checked against itself. Pure; no side effects.
    pub fn can_place(&self, day: Weekday, candidate: &Slot, excluding: Option<usize>) -> bool {
        self.days[day_index(day)]
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != excluding)
            .all(|(_, existing)| !candidate.overlaps(existing))
    }

    /// Append `slot` to `day`. Slots keep insertion order; no implicit
    /// sorting by time.
    pub fn add(&mut self, day: Weekday, slot: Slot) -> Result<(), AvailabilityError> {
        slot.validate()?;
        if !self.can_place(day, &slot, None) {
            return Err(AvailabilityError::SlotConflict);
        }
        self.days[day_index(day)].push(slot);
        Ok(())
    }

    /// Replace the slot at `index`, validating against every other slot on
    /// the same day first.
    pub fn update(&mut self, day: Weekday, index: usize, slot: Slot) -> Result<(), AvailabilityError> {
        if index >= self.days[day_index(day)].len() {
            return Err(AvailabilityError::IndexOutOfRange { day, index });
        }
        slot.validate()?;
        if !self.can_place(day, &slot, Some(index)) {
            return Err(AvailabilityError::SlotConflict);
        }
        self.days[day_index(day)][index] = slot;
        Ok(())
    }

    pub fn remove(&mut self, day: Weekday, index: usize) -> Result<(), AvailabilityError> {
        let slots = &mut self.days[day_index(day)];
        if index >= slots.len() {
            return Err(AvailabilityError::IndexOutOfRange { day, index });
        }
        slots.remove(index);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().all(|slots| slots.is_empty())
    }

    pub fn slot_count(&self) -> usize {
        self.days.iter().map(Vec::len).sum()
    }
}
