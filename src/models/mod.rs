pub mod availability;
pub mod booking;
pub mod cart;
pub mod service;
pub mod user;

pub use availability::{Period, ServiceAvailability, TimeSlot};
pub use booking::{
    Booking, BookingLine, BookingPatch, BookingStatus, CustomerInfo, NewBooking, PaymentMethod,
};
pub use cart::{CartItem, CartItemPatch, DateRange, StoredCart};
pub use service::{Category, Service};
pub use user::{SignupRequest, User};
