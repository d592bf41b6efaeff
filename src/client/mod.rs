//! Storefront-side state holders.
//!
//! Each context is an explicit object built around an injected
//! [`api::StorefrontApi`] and [`session::AuthSession`], so tests can swap in
//! an in-memory backend.

pub mod api;
pub mod cart;
pub mod checkout;
pub mod favorites;
pub mod selection;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{HttpStorefrontApi, StorefrontApi};
pub use cart::CartContext;
pub use checkout::{Checkout, CheckoutOutcome, CustomerForm};
pub use favorites::Favorites;
pub use selection::{SelectionError, SlotSelection};
pub use session::{AuthSession, SessionUser};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("please sign in to continue")]
    AuthRequired,

    #[error("your cart is empty")]
    EmptyCart,

    #[error("email is locked to the signed-in account")]
    EmailLocked,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Selection(#[from] SelectionError),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("payment failed: {0}")]
    Payment(String),

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// The server rejected a write because the cart changed since it was read.
    pub fn is_conflict(&self) -> bool {
        matches!(self, ClientError::Api { status: 409, .. })
    }

    pub fn is_auth_required(&self) -> bool {
        matches!(self, ClientError::AuthRequired)
    }
}
