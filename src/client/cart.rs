use std::sync::Arc;

use crate::models::{CartItem, CartItemPatch};

use super::api::StorefrontApi;
use super::session::AuthSession;
use super::ClientError;

/// The signed-in user's cart as last fetched from the backend.
///
/// Every mutation goes to the server first and then re-fetches the whole
/// list; local state is never merged optimistically. Writes carry the
/// version of the last fetch, so a write racing another tab fails with a
/// conflict instead of silently overwriting it. Before the first fetch no
/// version is known and writes go out unguarded.
pub struct CartContext {
    api: Arc<dyn StorefrontApi>,
    session: AuthSession,
    items: Vec<CartItem>,
    version: Option<i64>,
}

impl CartContext {
    pub fn new(api: Arc<dyn StorefrontApi>, session: AuthSession) -> Self {
        Self {
            api,
            session,
            items: Vec::new(),
            version: None,
        }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn total_amount(&self) -> f64 {
        self.items.iter().map(|i| i.total_price).sum()
    }

    pub fn version(&self) -> Option<i64> {
        self.version
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    /// Reload from the backend. Signed out means an empty cart.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let Some(user_id) = self.session.user_id() else {
            self.items.clear();
            self.version = None;
            return Ok(());
        };

        let cart = self.api.fetch_cart(&user_id).await?;
        self.items = cart.items;
        self.version = Some(cart.version);
        Ok(())
    }

    pub async fn add_to_cart(&mut self, item: CartItem) -> Result<(), ClientError> {
        let user_id = self.require_user()?;
        let guests = item.guests;
        let item = item.with_guests(guests);

        self.api
            .add_cart_item(&user_id, &item, self.version)
            .await?;
        self.refresh().await
    }

    /// Apply `patch` to a cart item. Unknown ids are ignored without a request.
    /// A guest change is clamped to at least one and reprices the item.
    pub async fn update_cart_item(
        &mut self,
        item_id: &str,
        patch: CartItemPatch,
    ) -> Result<(), ClientError> {
        let user_id = self.require_user()?;
        let Some(current) = self.items.iter().find(|i| i.id == item_id) else {
            return Ok(());
        };

        let mut patch = patch;
        if patch.guests.is_some() || patch.price.is_some() {
            let guests = patch.guests.unwrap_or(current.guests).max(1);
            let price = patch.price.unwrap_or(current.price);
            patch.guests = Some(guests);
            patch.total_price = Some(price * guests as f64);
        }

        self.api
            .update_cart_item(&user_id, item_id, &patch, self.version)
            .await?;
        self.refresh().await
    }

    pub async fn set_guests(&mut self, item_id: &str, guests: u32) -> Result<(), ClientError> {
        self.update_cart_item(
            item_id,
            CartItemPatch {
                guests: Some(guests),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn remove_from_cart(&mut self, item_id: &str) -> Result<(), ClientError> {
        let user_id = self.require_user()?;
        self.api
            .remove_cart_item(&user_id, item_id, self.version)
            .await?;
        self.refresh().await
    }

    pub async fn clear_cart(&mut self) -> Result<(), ClientError> {
        let user_id = self.require_user()?;
        self.version = Some(self.api.clear_cart(&user_id).await?);
        self.items.clear();
        Ok(())
    }

    fn require_user(&self) -> Result<String, ClientError> {
        self.session.user_id().ok_or(ClientError::AuthRequired)
    }
}
