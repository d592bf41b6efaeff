use chrono::{Duration, NaiveDate};
use rand::Rng;

use crate::models::{Period, ServiceAvailability, TimeSlot};

/// Services that also run a night session.
pub const NIGHT_SLOT_SERVICES: &[&str] = &["bear-hunt", "night-fishing-volga", "northern-lights-tour"];

const BASE_PERIODS: [Period; 3] = [Period::Morning, Period::Afternoon, Period::Evening];

const AVAILABLE_PROBABILITY: f64 = 0.85;

/// Demo calendar for `days` consecutive dates starting at `start`.
pub fn generate_availability<R: Rng + ?Sized>(
    service_id: &str,
    start: NaiveDate,
    days: u32,
    rng: &mut R,
) -> Vec<ServiceAvailability> {
    let with_night = NIGHT_SLOT_SERVICES.contains(&service_id);

    (0..days)
        .map(|offset| {
            let date = start + Duration::days(offset as i64);
            let night = with_night.then_some(Period::Night);
            let slots = BASE_PERIODS
                .iter()
                .copied()
                .chain(night)
                .map(|period| random_slot(service_id, date, period, rng))
                .collect();
            ServiceAvailability::new(date, slots)
        })
        .collect()
}

fn random_slot<R: Rng + ?Sized>(
    service_id: &str,
    date: NaiveDate,
    period: Period,
    rng: &mut R,
) -> TimeSlot {
    let capacity = period.capacity();
    TimeSlot {
        id: TimeSlot::slot_id(service_id, date, period),
        time: period.display_time().to_string(),
        period,
        capacity,
        booked: rng.gen_range(0..capacity),
        available: rng.gen_bool(AVAILABLE_PROBABILITY),
    }
}
