use tracing::warn;

use crate::models::{
    parse_weekday, weekday_name, DayIdentityMap, DaySlotRecord, Slot, UnresolvedDay, ALL_WEEKDAYS,
};
use super::schedule::WeeklyAvailability;

/// Flatten a weekly schedule into the backend's day-tagged record list.
/// Days with no entry in `day_map` are skipped and reported, never fatal:
/// saving a partial schedule beats losing the whole conversion.
pub fn to_records(
    availability: &WeeklyAvailability,
    day_map: &DayIdentityMap,
) -> (Vec<DaySlotRecord>, Vec<UnresolvedDay>) {
    let mut records = Vec::new();
    let mut unresolved = Vec::new();

    for &day in ALL_WEEKDAYS.iter() {
        let slots = availability.slots_for(day);
        if slots.is_empty() {
            continue;
        }

        let Some(day_id) = day_map.day_id(day) else {
            warn!(
                "No day identity for {}, dropping {} slot(s)",
                weekday_name(day),
                slots.len()
            );
            unresolved.push(UnresolvedDay {
                day: Some(day),
                day_id: None,
                dropped_slots: slots.len(),
            });
            continue;
        };

        for slot in slots {
            records.push(DaySlotRecord {
                day_id,
                day_name: Some(weekday_name(day).to_string()),
                start_time: slot.start_time,
                end_time: slot.end_time,
                capacity: slot.capacity,
                // Only previously persisted slots carry an id; new slots
                // omit it so the backend assigns one.
                id: slot.id,
            });
        }
    }

    (records, unresolved)
}

/// Group a flat record list back into a weekly schedule. The backend
/// sometimes supplies both the weekday name and the day id and they are not
/// guaranteed consistent; the explicit name wins when present. Records that
/// resolve to no weekday, or that would violate the no-overlap invariant,
/// are dropped with a diagnostic.
pub fn from_records(
    records: &[DaySlotRecord],
    day_map: &DayIdentityMap,
) -> (WeeklyAvailability, Vec<UnresolvedDay>) {
    let mut availability = WeeklyAvailability::new();
    let mut unresolved = Vec::new();

    for record in records {
        let day = record
            .day_name
            .as_deref()
            .and_then(parse_weekday)
            .or_else(|| day_map.weekday(record.day_id));

        let Some(day) = day else {
            warn!("Unresolvable day id {} in slot record, dropping", record.day_id);
            unresolved.push(UnresolvedDay {
                day: None,
                day_id: Some(record.day_id),
                dropped_slots: 1,
            });
            continue;
        };

        let mut slot = Slot::new(record.start_time, record.end_time, record.capacity);
        slot.id = record.id;

        if let Err(err) = availability.add(day, slot) {
            // Bad backend data must not poison the in-memory invariant.
            warn!("Dropping invalid slot record for {}: {}", weekday_name(day), err);
        }
    }

    (availability, unresolved)
}
