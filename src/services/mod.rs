pub mod auth;
pub mod availability;
pub mod booking;
pub mod cart;
pub mod catalog;
pub mod payment;
