//! In-process backend for client tests: the real cart and booking services
//! over an in-memory database, without HTTP.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rusqlite::Connection;

use crate::db;
use crate::errors::AppError;
use crate::models::{
    Booking, BookingPatch, CartItem, CartItemPatch, Category, DateRange, NewBooking, PaymentMethod,
    Service, SignupRequest, StoredCart, User,
};
use crate::services::payment::{PaymentProcessor, PaymentReceipt};
use crate::services::{auth, booking, cart};

use super::api::StorefrontApi;
use super::session::SessionUser;
use super::ClientError;

pub struct LocalApi {
    conn: Mutex<Connection>,
    calls: AtomicUsize,
    pub fail_bookings: AtomicBool,
}

impl LocalApi {
    pub fn new() -> Self {
        Self {
            conn: Mutex::new(db::init_db(":memory:").unwrap()),
            calls: AtomicUsize::new(0),
            fail_bookings: AtomicBool::new(false),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Write to the cart as another device would, bumping its version.
    pub fn add_elsewhere(&self, user_id: &str, item: CartItem) {
        let conn = self.conn.lock().unwrap();
        cart::add_item(&conn, user_id, item, None).unwrap();
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn to_client(err: AppError) -> ClientError {
    let status = match &err {
        AppError::Validation(_) => 400,
        AppError::NotFound(_) => 404,
        AppError::Unauthorized => 401,
        AppError::Conflict(_) => 409,
        _ => 500,
    };
    ClientError::Api {
        status,
        message: err.to_string(),
    }
}

#[async_trait]
impl StorefrontApi for LocalApi {
    async fn sign_up(&self, req: &SignupRequest) -> Result<User, ClientError> {
        self.hit();
        let conn = self.conn.lock().unwrap();
        auth::signup(&conn, req).map_err(to_client)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, ClientError> {
        self.hit();
        let conn = self.conn.lock().unwrap();
        auth::verify_credentials(&conn, email, password).map_err(to_client)
    }

    async fn fetch_cart(&self, user_id: &str) -> Result<StoredCart, ClientError> {
        self.hit();
        let conn = self.conn.lock().unwrap();
        cart::get_cart(&conn, user_id).map_err(to_client)
    }

    async fn add_cart_item(
        &self,
        user_id: &str,
        item: &CartItem,
        version: Option<i64>,
    ) -> Result<CartItem, ClientError> {
        self.hit();
        let conn = self.conn.lock().unwrap();
        cart::add_item(&conn, user_id, item.clone(), version)
            .map(|(item, _)| item)
            .map_err(to_client)
    }

    async fn update_cart_item(
        &self,
        user_id: &str,
        item_id: &str,
        patch: &CartItemPatch,
        version: Option<i64>,
    ) -> Result<(), ClientError> {
        self.hit();
        let conn = self.conn.lock().unwrap();
        cart::update_item(&conn, user_id, item_id, patch, version)
            .map(|_| ())
            .map_err(to_client)
    }

    async fn remove_cart_item(
        &self,
        user_id: &str,
        item_id: &str,
        version: Option<i64>,
    ) -> Result<(), ClientError> {
        self.hit();
        let conn = self.conn.lock().unwrap();
        cart::remove_item(&conn, user_id, item_id, version)
            .map(|_| ())
            .map_err(to_client)
    }

    async fn clear_cart(&self, user_id: &str) -> Result<i64, ClientError> {
        self.hit();
        let conn = self.conn.lock().unwrap();
        cart::clear(&conn, user_id).map_err(to_client)
    }

    async fn create_booking(&self, new: &NewBooking) -> Result<Booking, ClientError> {
        self.hit();
        if self.fail_bookings.load(Ordering::SeqCst) {
            return Err(ClientError::Api {
                status: 500,
                message: "database unavailable".to_string(),
            });
        }
        let conn = self.conn.lock().unwrap();
        booking::create_booking(&conn, new.clone(), Utc::now()).map_err(to_client)
    }

    async fn list_bookings(&self, user_id: &str) -> Result<Vec<Booking>, ClientError> {
        self.hit();
        let conn = self.conn.lock().unwrap();
        booking::list_for_user(&conn, user_id).map_err(to_client)
    }

    async fn update_booking(
        &self,
        booking_id: &str,
        patch: &BookingPatch,
    ) -> Result<Booking, ClientError> {
        self.hit();
        let conn = self.conn.lock().unwrap();
        booking::update_booking(&conn, booking_id, patch, Utc::now()).map_err(to_client)
    }

    async fn list_services(&self, _category: Option<Category>) -> Result<Vec<Service>, ClientError> {
        self.hit();
        Ok(Vec::new())
    }

    async fn get_service(&self, id: &str) -> Result<Service, ClientError> {
        self.hit();
        Err(ClientError::Api {
            status: 404,
            message: format!("not found: service {id}"),
        })
    }
}

/// Card processor that counts charges and can be told to decline.
pub struct CountingProcessor {
    charges: AtomicUsize,
    decline: bool,
}

impl CountingProcessor {
    pub fn new(decline: bool) -> Self {
        Self {
            charges: AtomicUsize::new(0),
            decline,
        }
    }

    pub fn charges(&self) -> usize {
        self.charges.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentProcessor for CountingProcessor {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Card
    }

    async fn charge(&self, amount: f64, _reference: &str) -> anyhow::Result<PaymentReceipt> {
        self.charges.fetch_add(1, Ordering::SeqCst);
        anyhow::ensure!(!self.decline, "card declined");
        Ok(PaymentReceipt {
            method: PaymentMethod::Card,
            amount,
            transaction_id: "card-test".to_string(),
            simulated: true,
        })
    }
}

pub fn anna() -> SessionUser {
    SessionUser {
        id: "user-anna".to_string(),
        email: "anna@example.com".to_string(),
        name: "Anna".to_string(),
        phone: Some("+79990000000".to_string()),
        address: Some("Petropavlovsk-Kamchatsky".to_string()),
    }
}

/// A bear hunt line at $500 per guest.
pub fn bear_hunt(guests: u32) -> CartItem {
    let start = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
    CartItem {
        id: String::new(),
        service_id: "bear-hunt".to_string(),
        title: "Brown bear hunt".to_string(),
        supplier: "Taiga Outfitters".to_string(),
        image: String::new(),
        location: "Kamchatka".to_string(),
        duration: "3 days".to_string(),
        dates: DateRange::for_duration(start, 3),
        time_slot: Some("bear-hunt-2025-07-01-morning".to_string()),
        guests,
        price: 500.0,
        total_price: 0.0,
        added_at: Utc::now(),
    }
}
