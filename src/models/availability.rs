use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Morning => "morning",
            Period::Afternoon => "afternoon",
            Period::Evening => "evening",
            Period::Night => "night",
        }
    }

    pub fn display_time(&self) -> &'static str {
        match self {
            Period::Morning => "08:00 - 12:00",
            Period::Afternoon => "13:00 - 17:00",
            Period::Evening => "18:00 - 21:00",
            Period::Night => "22:00 - 02:00",
        }
    }

    pub fn capacity(&self) -> u32 {
        match self {
            Period::Morning | Period::Afternoon => 6,
            Period::Evening | Period::Night => 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: String,
    pub time: String,
    pub period: Period,
    pub capacity: u32,
    pub booked: u32,
    pub available: bool,
}

impl TimeSlot {
    pub fn slot_id(service_id: &str, date: NaiveDate, period: Period) -> String {
        format!("{service_id}-{}-{}", date.format("%Y-%m-%d"), period.as_str())
    }

    /// The single bookability rule: open for sale and not full.
    pub fn is_bookable(&self) -> bool {
        self.available && self.booked < self.capacity
    }

    pub fn remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.booked)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAvailability {
    pub date: NaiveDate,
    pub time_slots: Vec<TimeSlot>,
    pub total_capacity: u32,
    pub booked: u32,
}

impl ServiceAvailability {
    pub fn new(date: NaiveDate, time_slots: Vec<TimeSlot>) -> Self {
        let mut day = Self {
            date,
            time_slots,
            total_capacity: 0,
            booked: 0,
        };
        day.recompute();
        day
    }

    /// Refresh the cached day totals from the slots.
    pub fn recompute(&mut self) {
        self.total_capacity = self.time_slots.iter().map(|s| s.capacity).sum();
        self.booked = self.time_slots.iter().map(|s| s.booked).sum();
    }

    pub fn has_bookable_slot(&self) -> bool {
        self.time_slots.iter().any(TimeSlot::is_bookable)
    }

    pub fn slot(&self, slot_id: &str) -> Option<&TimeSlot> {
        self.time_slots.iter().find(|s| s.id == slot_id)
    }

    /// Commit `guests` to a slot. Returns false when the slot is unknown or
    /// not bookable; a bookable slot accepts up to its remaining capacity.
    pub fn record_booking(&mut self, slot_id: &str, guests: u32) -> bool {
        let Some(slot) = self.time_slots.iter_mut().find(|s| s.id == slot_id) else {
            return false;
        };
        if !slot.is_bookable() || guests > slot.remaining() {
            return false;
        }
        slot.booked += guests;
        self.recompute();
        true
    }

    pub fn release_booking(&mut self, slot_id: &str, guests: u32) -> bool {
        let Some(slot) = self.time_slots.iter_mut().find(|s| s.id == slot_id) else {
            return false;
        };
        slot.booked = slot.booked.saturating_sub(guests);
        self.recompute();
        true
    }
}
