pub mod simulated;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::PaymentMethod;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub method: PaymentMethod,
    pub amount: f64,
    pub transaction_id: String,
    pub simulated: bool,
}

/// Settles the amount due at checkout. Booking creation only sees this
/// trait, so a real gateway can replace the simulated one.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    fn method(&self) -> PaymentMethod;

    async fn charge(&self, amount: f64, reference: &str) -> anyhow::Result<PaymentReceipt>;
}

pub fn processor_for(method: PaymentMethod) -> Box<dyn PaymentProcessor> {
    Box::new(simulated::SimulatedProcessor::new(method))
}
