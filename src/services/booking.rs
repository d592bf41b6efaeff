use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::db::kv;
use crate::errors::{AppError, AppResult};
use crate::models::{Booking, BookingPatch, NewBooking};

pub fn booking_key(booking_id: &str) -> String {
    format!("booking:{booking_id}")
}

pub fn user_index_key(user_id: &str) -> String {
    format!("user_bookings:{user_id}")
}

/// Persist a booking and append its id to the owner's index.
///
/// Line totals and the booking total are recomputed from `price × guests`
/// rather than trusted from the request.
pub fn create_booking(conn: &Connection, new: NewBooking, now: DateTime<Utc>) -> AppResult<Booking> {
    if new.user_id.trim().is_empty() {
        return Err(AppError::Validation("userId is required".to_string()));
    }
    if new.items.is_empty() {
        return Err(AppError::Validation("booking has no items".to_string()));
    }
    if new.items.iter().any(|line| line.guests == 0) {
        return Err(AppError::Validation("every item needs at least one guest".to_string()));
    }

    let mut items = new.items;
    for line in &mut items {
        line.total_price = line.price * line.guests as f64;
    }
    let total_amount: f64 = items.iter().map(|l| l.total_price).sum();
    if (total_amount - new.total_amount).abs() > 0.005 {
        tracing::warn!(
            user_id = %new.user_id,
            submitted = new.total_amount,
            computed = total_amount,
            "booking total did not match its items, using computed total"
        );
    }

    let booking = Booking {
        id: format!("booking_{}", uuid::Uuid::new_v4().simple()),
        user_id: new.user_id,
        items,
        total_amount,
        payment_method: new.payment_method,
        customer_info: new.customer_info,
        status: new.status,
        created_at: now,
        updated_at: now,
    };

    kv::set_json(conn, &booking_key(&booking.id), &booking)?;

    let index_key = user_index_key(&booking.user_id);
    let mut ids: Vec<String> = kv::get_json(conn, &index_key)?
        .map(|(ids, _)| ids)
        .unwrap_or_default();
    ids.push(booking.id.clone());
    kv::set_json(conn, &index_key, &ids)?;

    tracing::info!(
        booking_id = %booking.id,
        user_id = %booking.user_id,
        status = booking.status.as_str(),
        total = booking.total_amount,
        "booking created"
    );
    Ok(booking)
}

pub fn get_booking(conn: &Connection, booking_id: &str) -> AppResult<Booking> {
    kv::get_json::<Booking>(conn, &booking_key(booking_id))?
        .map(|(booking, _)| booking)
        .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))
}

/// All bookings in the user's index, oldest first. Ids whose record has gone
/// missing are skipped.
pub fn list_for_user(conn: &Connection, user_id: &str) -> AppResult<Vec<Booking>> {
    let ids: Vec<String> = kv::get_json(conn, &user_index_key(user_id))?
        .map(|(ids, _)| ids)
        .unwrap_or_default();

    let mut bookings = Vec::with_capacity(ids.len());
    for id in ids {
        match kv::get_json::<Booking>(conn, &booking_key(&id))? {
            Some((booking, _)) => bookings.push(booking),
            None => tracing::warn!(user_id, booking_id = %id, "indexed booking is missing"),
        }
    }
    Ok(bookings)
}

pub fn update_booking(
    conn: &Connection,
    booking_id: &str,
    patch: &BookingPatch,
    now: DateTime<Utc>,
) -> AppResult<Booking> {
    let mut booking = get_booking(conn, booking_id)?;
    let previous = booking.status;
    booking.apply_patch(patch, now);
    kv::set_json(conn, &booking_key(booking_id), &booking)?;

    tracing::info!(
        booking_id,
        from = previous.as_str(),
        to = booking.status.as_str(),
        "booking updated"
    );
    Ok(booking)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::db;
    use crate::models::{BookingLine, BookingStatus, CustomerInfo, DateRange, PaymentMethod};

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn line(price: f64, guests: u32) -> BookingLine {
        BookingLine {
            service_id: "bear-hunt".to_string(),
            title: "Brown bear hunt".to_string(),
            supplier: "Taiga Outfitters".to_string(),
            dates: DateRange::for_duration(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(), 3),
            time_slot: None,
            guests,
            price,
            total_price: price * guests as f64,
        }
    }

    fn new_booking(user_id: &str, items: Vec<BookingLine>) -> NewBooking {
        let total_amount = items.iter().map(|l| l.total_price).sum();
        NewBooking {
            user_id: user_id.to_string(),
            items,
            total_amount,
            payment_method: PaymentMethod::Card,
            customer_info: CustomerInfo {
                name: "Anna".to_string(),
                email: "anna@example.com".to_string(),
                phone: "+79990000000".to_string(),
                address: String::new(),
            },
            status: BookingStatus::Pending,
        }
    }

    #[test]
    fn test_create_and_get() {
        let conn = setup_db();
        let booking = create_booking(&conn, new_booking("u1", vec![line(500.0, 2)]), Utc::now()).unwrap();

        assert!(booking.id.starts_with("booking_"));
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.total_amount, 1000.0);
        assert_eq!(booking.created_at, booking.updated_at);

        let fetched = get_booking(&conn, &booking.id).unwrap();
        assert_eq!(fetched, booking);
    }

    #[test]
    fn test_empty_items_rejected() {
        let conn = setup_db();
        let result = create_booking(&conn, new_booking("u1", vec![]), Utc::now());
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(list_for_user(&conn, "u1").unwrap().is_empty());
    }

    #[test]
    fn test_totals_recomputed() {
        let conn = setup_db();
        let mut request = new_booking("u1", vec![line(100.0, 3), line(50.0, 1)]);
        request.items[0].total_price = 1.0;
        request.total_amount = 2.0;

        let booking = create_booking(&conn, request, Utc::now()).unwrap();
        assert_eq!(booking.items[0].total_price, 300.0);
        assert_eq!(booking.total_amount, 350.0);
    }

    #[test]
    fn test_list_for_user_in_creation_order() {
        let conn = setup_db();
        let first = create_booking(&conn, new_booking("u1", vec![line(10.0, 1)]), Utc::now()).unwrap();
        let second = create_booking(&conn, new_booking("u1", vec![line(20.0, 1)]), Utc::now()).unwrap();
        create_booking(&conn, new_booking("u2", vec![line(30.0, 1)]), Utc::now()).unwrap();

        let ids: Vec<String> = list_for_user(&conn, "u1")
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert!(list_for_user(&conn, "nobody").unwrap().is_empty());
    }

    #[test]
    fn test_list_skips_dangling_ids() {
        let conn = setup_db();
        let booking = create_booking(&conn, new_booking("u1", vec![line(10.0, 1)]), Utc::now()).unwrap();
        kv::delete(&conn, &booking_key(&booking.id)).unwrap();
        assert!(list_for_user(&conn, "u1").unwrap().is_empty());
    }

    #[test]
    fn test_get_missing() {
        let conn = setup_db();
        assert!(matches!(get_booking(&conn, "booking_nope"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_update_status() {
        let conn = setup_db();
        let booking = create_booking(&conn, new_booking("u1", vec![line(10.0, 1)]), Utc::now()).unwrap();

        let later = booking.created_at + chrono::Duration::minutes(5);
        let updated = update_booking(
            &conn,
            &booking.id,
            &BookingPatch {
                status: Some(BookingStatus::Confirmed),
                ..Default::default()
            },
            later,
        )
        .unwrap();
        assert_eq!(updated.status, BookingStatus::Confirmed);
        assert_eq!(updated.updated_at, later);
        assert_eq!(get_booking(&conn, &booking.id).unwrap().status, BookingStatus::Confirmed);
    }

    #[test]
    fn test_update_missing() {
        let conn = setup_db();
        let result = update_booking(&conn, "booking_nope", &BookingPatch::default(), Utc::now());
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
