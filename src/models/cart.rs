use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateRange {
    /// A stay of `duration_days` starting on `start`, end date inclusive.
    pub fn for_duration(start: NaiveDate, duration_days: u32) -> Self {
        let extra = duration_days.saturating_sub(1) as i64;
        Self {
            start_date: start,
            end_date: start + chrono::Duration::days(extra),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(default)]
    pub id: String,
    pub service_id: String,
    pub title: String,
    pub supplier: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub duration: String,
    pub dates: DateRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<String>,
    pub guests: u32,
    pub price: f64,
    pub total_price: f64,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Set the guest count (never below one) and reprice.
    pub fn with_guests(mut self, guests: u32) -> Self {
        self.guests = guests.max(1);
        self.reprice();
        self
    }

    pub fn reprice(&mut self) {
        self.total_price = self.price * self.guests as f64;
    }

    pub fn apply_patch(&mut self, patch: &CartItemPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(supplier) = &patch.supplier {
            self.supplier = supplier.clone();
        }
        if let Some(image) = &patch.image {
            self.image = image.clone();
        }
        if let Some(location) = &patch.location {
            self.location = location.clone();
        }
        if let Some(duration) = &patch.duration {
            self.duration = duration.clone();
        }
        if let Some(dates) = &patch.dates {
            self.dates = dates.clone();
        }
        if let Some(slot) = &patch.time_slot {
            self.time_slot = Some(slot.clone());
        }
        if let Some(guests) = patch.guests {
            self.guests = guests.max(1);
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        // totalPrice in the patch is advisory; the stored value always follows price × guests
        self.reprice();
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<DateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
}

/// The per-user cart blob together with the version of the row it came from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredCart {
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub version: i64,
}

impl StoredCart {
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn total_amount(&self) -> f64 {
        self.items.iter().map(|i| i.total_price).sum()
    }
}
