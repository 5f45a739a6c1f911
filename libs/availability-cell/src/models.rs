use std::collections::HashMap;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// All seven weekdays in backend enumeration order (0 = Sunday).
pub const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

pub(crate) fn day_index(day: Weekday) -> usize {
    day.num_days_from_sunday() as usize
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// Parse a weekday name as the backend supplies it. Accepts full names and
/// three-letter abbreviations, case-insensitive.
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    match name.trim().to_ascii_lowercase().as_str() {
        "sunday" | "sun" => Some(Weekday::Sun),
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        _ => None,
    }
}

/// One bounded interval on a weekday. `capacity` is the maximum number of
/// simultaneous bookings; hospital operating hours carry no capacity, so it
/// is optional. `id` stays `None` until the backend assigns one on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub capacity: Option<i32>,
    pub id: Option<Uuid>,
}

impl Slot {
    pub fn new(start_time: NaiveTime, end_time: NaiveTime, capacity: Option<i32>) -> Self {
        Self {
            start_time,
            end_time,
            capacity,
            id: None,
        }
    }

    /// Half-open interval overlap: touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Slot) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }

    pub(crate) fn validate(&self) -> Result<(), AvailabilityError> {
        if self.start_time >= self.end_time {
            return Err(AvailabilityError::InvalidRange);
        }
        if matches!(self.capacity, Some(c) if c < 1) {
            return Err(AvailabilityError::InvalidCapacity);
        }
        Ok(())
    }
}

/// The backend's flat representation of one slot, tagged with the weekday
/// lookup-row id. `day_name` is sometimes embedded as well and wins over
/// `day_id` when the two disagree. `id` is omitted from the payload for
/// slots the backend has not persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySlotRecord {
    pub day_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_name: Option<String>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
}

/// One row of the backend's weekday enumeration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayEnumRow {
    pub id: i32,
    pub name: String,
}

/// Bidirectional weekday <-> backend day-id mapping, built from the day
/// enumeration. The backend treats weekdays as lookup-table rows; keeping
/// the translation here keeps backend identifiers out of the schedule types.
#[derive(Debug, Clone, Default)]
pub struct DayIdentityMap {
    to_id: HashMap<Weekday, i32>,
    to_day: HashMap<i32, Weekday>,
}

impl DayIdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows with unrecognized names are skipped with a warning rather than
    /// failing the whole lookup.
    pub fn from_rows(rows: &[DayEnumRow]) -> Self {
        let mut map = Self::new();
        for row in rows {
            match parse_weekday(&row.name) {
                Some(day) => map.insert(day, row.id),
                None => warn!("Unrecognized weekday name in day enumeration: {}", row.name),
            }
        }
        map
    }

    pub fn insert(&mut self, day: Weekday, id: i32) {
        self.to_id.insert(day, id);
        self.to_day.insert(id, day);
    }

    pub fn day_id(&self, day: Weekday) -> Option<i32> {
        self.to_id.get(&day).copied()
    }

    pub fn weekday(&self, id: i32) -> Option<Weekday> {
        self.to_day.get(&id).copied()
    }

    pub fn is_complete(&self) -> bool {
        ALL_WEEKDAYS.iter().all(|day| self.to_id.contains_key(day))
    }
}

/// Codec diagnostic: a day or record that could not be mapped through the
/// day identity map and was dropped. Non-fatal; partial schedule data beats
/// failing the whole conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedDay {
    pub day: Option<Weekday>,
    pub day_id: Option<i32>,
    pub dropped_slots: usize,
}

// Error types for schedule mutations. All user-facing kinds are returned as
// values from the mutation path so the UI can branch without exception
// machinery; IndexOutOfRange signals a caller defect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("Start time must be before end time")]
    InvalidRange,

    #[error("Capacity must be at least 1")]
    InvalidCapacity,

    #[error("Time slot overlaps with existing slot")]
    SlotConflict,

    #[error("No slot at index {index} for {day}")]
    IndexOutOfRange { day: Weekday, index: usize },

    #[error("Start and end time are required")]
    MissingField,
}
