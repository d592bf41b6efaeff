use std::sync::Arc;

use crate::models::{
    Booking, BookingLine, BookingPatch, BookingStatus, CartItem, CustomerInfo, NewBooking,
    PaymentMethod,
};
use crate::services::payment::{PaymentProcessor, PaymentReceipt};

use super::api::StorefrontApi;
use super::cart::CartContext;
use super::session::{AuthSession, SessionUser};
use super::ClientError;

/// Contact details collected at checkout. The email always belongs to the
/// signed-in account.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerForm {
    pub name: String,
    email: String,
    pub phone: String,
    pub address: String,
}

impl CustomerForm {
    pub fn prefill(user: &SessionUser) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone().unwrap_or_default(),
            address: user.address.clone().unwrap_or_default(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: &str) -> Result<(), ClientError> {
        if !email.trim().eq_ignore_ascii_case(&self.email) {
            return Err(ClientError::EmailLocked);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.name.trim().is_empty() {
            return Err(ClientError::Validation("name is required".to_string()));
        }
        if self.phone.trim().is_empty() {
            return Err(ClientError::Validation("phone is required".to_string()));
        }
        Ok(())
    }

    pub fn to_customer_info(&self) -> CustomerInfo {
        CustomerInfo {
            name: self.name.trim().to_string(),
            email: self.email.clone(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub booking: Booking,
    pub receipt: PaymentReceipt,
}

pub struct Checkout {
    api: Arc<dyn StorefrontApi>,
    session: AuthSession,
}

impl Checkout {
    pub fn new(api: Arc<dyn StorefrontApi>, session: AuthSession) -> Self {
        Self { api, session }
    }

    /// Freeze a cart snapshot into a booking request.
    pub fn build_booking(
        user_id: &str,
        items: &[CartItem],
        payment_method: PaymentMethod,
        form: &CustomerForm,
    ) -> NewBooking {
        let items: Vec<BookingLine> = items.iter().map(BookingLine::from).collect();
        NewBooking {
            user_id: user_id.to_string(),
            total_amount: items.iter().map(|l| l.total_price).sum(),
            items,
            payment_method,
            customer_info: form.to_customer_info(),
            status: BookingStatus::Pending,
        }
    }

    /// Persist a `pending` booking, charge it, then empty the cart.
    ///
    /// The booking is the first write and the charge only happens once it
    /// exists. A declined charge cancels that booking and leaves the cart as
    /// it was. Submitting twice creates two bookings.
    pub async fn submit(
        &self,
        cart: &mut CartContext,
        form: &CustomerForm,
        processor: &dyn PaymentProcessor,
    ) -> Result<CheckoutOutcome, ClientError> {
        let user_id = self.session.user_id().ok_or(ClientError::AuthRequired)?;
        if cart.item_count() == 0 {
            return Err(ClientError::EmptyCart);
        }
        form.validate()?;

        let request = Self::build_booking(&user_id, cart.items(), processor.method(), form);
        let booking = self.api.create_booking(&request).await?;

        let receipt = match processor.charge(booking.total_amount, &booking.id).await {
            Ok(receipt) => receipt,
            Err(e) => {
                self.cancel_unpaid(&booking.id).await;
                return Err(ClientError::Payment(e.to_string()));
            }
        };
        tracing::info!(booking_id = %booking.id, transaction_id = %receipt.transaction_id, "checkout completed");

        if let Err(e) = cart.clear_cart().await {
            tracing::warn!(error = %e, booking_id = %booking.id, "booking saved but cart could not be cleared");
        }

        Ok(CheckoutOutcome { booking, receipt })
    }

    async fn cancel_unpaid(&self, booking_id: &str) {
        let patch = BookingPatch {
            status: Some(BookingStatus::Cancelled),
            ..Default::default()
        };
        if let Err(e) = self.api.update_booking(booking_id, &patch).await {
            tracing::error!(error = %e, booking_id, "payment failed and booking could not be cancelled");
        }
    }
}
