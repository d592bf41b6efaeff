use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{CartItem, DateRange, Service, TimeSlot};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SelectionError {
    #[error("{0} has no bookable time slots")]
    DateUnavailable(NaiveDate),

    #[error("time slot {0} cannot be booked")]
    SlotUnavailable(String),

    #[error("choose a date first")]
    NoDate,

    #[error("choose a time slot")]
    NoSlot,
}

/// One date and one time slot for a service. Bookability is always
/// [`TimeSlot::is_bookable`].
#[derive(Debug, Clone)]
pub struct SlotSelection<'a> {
    service: &'a Service,
    date: Option<NaiveDate>,
    slot_id: Option<String>,
}

impl<'a> SlotSelection<'a> {
    pub fn new(service: &'a Service) -> Self {
        Self {
            service,
            date: None,
            slot_id: None,
        }
    }

    pub fn selectable_dates(&self) -> Vec<NaiveDate> {
        self.service
            .availability
            .iter()
            .filter(|d| d.has_bookable_slot())
            .map(|d| d.date)
            .collect()
    }

    pub fn is_date_selectable(&self, date: NaiveDate) -> bool {
        self.service
            .availability_on(date)
            .map(|d| d.has_bookable_slot())
            .unwrap_or(false)
    }

    /// Choose a date. Any previously chosen slot is dropped.
    pub fn select_date(&mut self, date: NaiveDate) -> Result<(), SelectionError> {
        if !self.is_date_selectable(date) {
            return Err(SelectionError::DateUnavailable(date));
        }
        self.date = Some(date);
        self.slot_id = None;
        Ok(())
    }

    pub fn bookable_slots(&self) -> Vec<&'a TimeSlot> {
        let Some(date) = self.date else {
            return Vec::new();
        };
        self.service
            .availability_on(date)
            .map(|d| d.time_slots.iter().filter(|s| s.is_bookable()).collect())
            .unwrap_or_default()
    }

    pub fn select_slot(&mut self, slot_id: &str) -> Result<(), SelectionError> {
        let date = self.date.ok_or(SelectionError::NoDate)?;
        let bookable = self
            .service
            .availability_on(date)
            .and_then(|d| d.slot(slot_id))
            .map(TimeSlot::is_bookable)
            .unwrap_or(false);
        if !bookable {
            return Err(SelectionError::SlotUnavailable(slot_id.to_string()));
        }
        self.slot_id = Some(slot_id.to_string());
        Ok(())
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn selected_slot(&self) -> Option<&str> {
        self.slot_id.as_deref()
    }

    /// Build the cart item for the current selection. Guest count is not
    /// checked against the slot's remaining capacity.
    pub fn to_cart_item(&self, guests: u32, now: DateTime<Utc>) -> Result<CartItem, SelectionError> {
        let date = self.date.ok_or(SelectionError::NoDate)?;
        let slot_id = self.slot_id.clone().ok_or(SelectionError::NoSlot)?;
        let service = self.service;

        let item = CartItem {
            id: String::new(),
            service_id: service.id.clone(),
            title: service.title.clone(),
            supplier: service.supplier.clone(),
            image: service.image.clone(),
            location: service.location.clone(),
            duration: service.duration.clone(),
            dates: DateRange::for_duration(date, service.duration_days),
            time_slot: Some(slot_id),
            guests: 1,
            price: service.price,
            total_price: service.price,
            added_at: now,
        };
        Ok(item.with_guests(guests))
    }
}
