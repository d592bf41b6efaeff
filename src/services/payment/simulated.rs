use async_trait::async_trait;

use super::{PaymentProcessor, PaymentReceipt};
use crate::models::PaymentMethod;

/// Accepts every charge without contacting a gateway.
pub struct SimulatedProcessor {
    method: PaymentMethod,
}

impl SimulatedProcessor {
    pub fn new(method: PaymentMethod) -> Self {
        Self { method }
    }
}

#[async_trait]
impl PaymentProcessor for SimulatedProcessor {
    fn method(&self) -> PaymentMethod {
        self.method
    }

    async fn charge(&self, amount: f64, reference: &str) -> anyhow::Result<PaymentReceipt> {
        anyhow::ensure!(amount >= 0.0, "cannot charge a negative amount");

        let transaction_id = format!(
            "{}-{}",
            self.method.as_str(),
            uuid::Uuid::new_v4().simple()
        );
        tracing::info!(
            method = self.method.as_str(),
            amount,
            reference,
            transaction_id = %transaction_id,
            "simulated payment accepted"
        );

        Ok(PaymentReceipt {
            method: self.method,
            amount,
            transaction_id,
            simulated: true,
        })
    }
}
