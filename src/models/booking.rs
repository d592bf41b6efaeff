use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cart::{CartItem, DateRange};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub items: Vec<BookingLine>,
    pub total_amount: f64,
    pub payment_method: PaymentMethod,
    pub customer_info: CustomerInfo,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    Rejected,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            "rejected" => Some(BookingStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Sbp,
    Crypto,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Sbp => "sbp",
            PaymentMethod::Crypto => "crypto",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

/// A cart item frozen into a booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingLine {
    pub service_id: String,
    pub title: String,
    pub supplier: String,
    pub dates: DateRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<String>,
    pub guests: u32,
    pub price: f64,
    pub total_price: f64,
}

impl From<&CartItem> for BookingLine {
    fn from(item: &CartItem) -> Self {
        Self {
            service_id: item.service_id.clone(),
            title: item.title.clone(),
            supplier: item.supplier.clone(),
            dates: item.dates.clone(),
            time_slot: item.time_slot.clone(),
            guests: item.guests,
            price: item.price,
            total_price: item.total_price,
        }
    }
}

/// Request body for `POST /bookings`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub user_id: String,
    pub items: Vec<BookingLine>,
    pub total_amount: f64,
    pub payment_method: PaymentMethod,
    pub customer_info: CustomerInfo,
    #[serde(default = "default_status")]
    pub status: BookingStatus,
}

fn default_status() -> BookingStatus {
    BookingStatus::Pending
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_info: Option<CustomerInfo>,
}

impl Booking {
    pub fn apply_patch(&mut self, patch: &BookingPatch, now: DateTime<Utc>) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(method) = patch.payment_method {
            self.payment_method = method;
        }
        if let Some(info) = &patch.customer_info {
            self.customer_info = info.clone();
        }
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_names() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
            BookingStatus::Rejected,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("shipped"), None);
    }

    #[test]
    fn test_new_booking_defaults_to_pending() {
        let json = serde_json::json!({
            "userId": "u1",
            "items": [],
            "totalAmount": 0.0,
            "paymentMethod": "sbp",
            "customerInfo": {"name": "Anna", "email": "anna@example.com"}
        });
        let booking: NewBooking = serde_json::from_value(json).unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.payment_method, PaymentMethod::Sbp);
        assert_eq!(booking.customer_info.phone, "");
    }

    #[test]
    fn test_patch_stamps_updated_at() {
        let created = Utc::now() - chrono::Duration::hours(1);
        let mut booking = Booking {
            id: "booking_1".to_string(),
            user_id: "u1".to_string(),
            items: vec![],
            total_amount: 0.0,
            payment_method: PaymentMethod::Card,
            customer_info: CustomerInfo::default(),
            status: BookingStatus::Pending,
            created_at: created,
            updated_at: created,
        };
        let now = Utc::now();
        booking.apply_patch(
            &BookingPatch {
                status: Some(BookingStatus::Confirmed),
                ..Default::default()
            },
            now,
        );
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.payment_method, PaymentMethod::Card);
        assert_eq!(booking.updated_at, now);
        assert_eq!(booking.created_at, created);
    }
}
