use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::IF_MATCH;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::models::{
    Booking, BookingPatch, CartItem, CartItemPatch, Category, NewBooking, Service, SignupRequest,
    StoredCart, User,
};

use super::ClientError;

/// The backend as seen by the storefront.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    async fn sign_up(&self, req: &SignupRequest) -> Result<User, ClientError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<User, ClientError>;

    async fn fetch_cart(&self, user_id: &str) -> Result<StoredCart, ClientError>;
    async fn add_cart_item(
        &self,
        user_id: &str,
        item: &CartItem,
        version: Option<i64>,
    ) -> Result<CartItem, ClientError>;
    async fn update_cart_item(
        &self,
        user_id: &str,
        item_id: &str,
        patch: &CartItemPatch,
        version: Option<i64>,
    ) -> Result<(), ClientError>;
    async fn remove_cart_item(
        &self,
        user_id: &str,
        item_id: &str,
        version: Option<i64>,
    ) -> Result<(), ClientError>;
    /// Returns the cart version after clearing.
    async fn clear_cart(&self, user_id: &str) -> Result<i64, ClientError>;

    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, ClientError>;
    async fn list_bookings(&self, user_id: &str) -> Result<Vec<Booking>, ClientError>;
    async fn update_booking(
        &self,
        booking_id: &str,
        patch: &BookingPatch,
    ) -> Result<Booking, ClientError>;

    async fn list_services(&self, category: Option<Category>) -> Result<Vec<Service>, ClientError>;
    async fn get_service(&self, id: &str) -> Result<Service, ClientError>;
}

pub struct HttpStorefrontApi {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpStorefrontApi {
    /// `base_url` includes the route prefix, e.g. `http://localhost:3000/make-server`.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Same as [`new`](Self::new) but every request gives up after `timeout`.
    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            ..Self::new(base_url, api_key)
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authed(&self, builder: RequestBuilder, version: Option<i64>) -> RequestBuilder {
        let builder = builder.bearer_auth(&self.api_key);
        match version {
            Some(v) => builder.header(IF_MATCH, v.to_string()),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        read_body(response).await
    }
}

/// Decode a `{success, ...}` envelope, turning `{success:false, error}` or
/// a non-2xx status into [`ClientError::Api`].
async fn read_body<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let text = response.text().await?;
    let body: serde_json::Value = serde_json::from_str(&text).unwrap_or(serde_json::Value::Null);

    let failed = body.get("success").and_then(|v| v.as_bool()) == Some(false);
    if !status.is_success() || failed {
        let message = body
            .get("error")
            .and_then(|e| e.as_str())
            .map(str::to_string)
            .filter(|m| !m.is_empty())
            .or_else(|| (!text.is_empty()).then(|| text.clone()))
            .unwrap_or_else(|| format!("request failed with status {status}"));
        tracing::warn!(status = status.as_u16(), error = %message, "storefront request failed");
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_value(body)?)
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: User,
}

#[derive(Deserialize)]
struct ItemEnvelope {
    item: CartItem,
}

#[derive(Deserialize)]
struct BookingEnvelope {
    booking: Booking,
}

#[derive(Deserialize)]
struct BookingsEnvelope {
    bookings: Vec<Booking>,
}

#[derive(Deserialize)]
struct ServicesEnvelope {
    services: Vec<Service>,
}

#[derive(Deserialize)]
struct ServiceEnvelope {
    service: Service,
}

#[derive(Deserialize)]
struct VersionEnvelope {
    version: i64,
}

#[derive(Deserialize)]
struct Ack {}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    async fn sign_up(&self, req: &SignupRequest) -> Result<User, ClientError> {
        let builder = self.authed(self.client.post(self.url("/signup")), None).json(req);
        let envelope: UserEnvelope = self.send(builder).await?;
        Ok(envelope.user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, ClientError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let builder = self.authed(self.client.post(self.url("/signin")), None).json(&body);
        let envelope: UserEnvelope = self.send(builder).await?;
        Ok(envelope.user)
    }

    async fn fetch_cart(&self, user_id: &str) -> Result<StoredCart, ClientError> {
        let builder = self.authed(self.client.get(self.url(&format!("/cart/{user_id}"))), None);
        self.send(builder).await
    }

    async fn add_cart_item(
        &self,
        user_id: &str,
        item: &CartItem,
        version: Option<i64>,
    ) -> Result<CartItem, ClientError> {
        let builder = self
            .authed(self.client.post(self.url(&format!("/cart/{user_id}"))), version)
            .json(item);
        let envelope: ItemEnvelope = self.send(builder).await?;
        Ok(envelope.item)
    }

    async fn update_cart_item(
        &self,
        user_id: &str,
        item_id: &str,
        patch: &CartItemPatch,
        version: Option<i64>,
    ) -> Result<(), ClientError> {
        let builder = self
            .authed(
                self.client.put(self.url(&format!("/cart/{user_id}/{item_id}"))),
                version,
            )
            .json(patch);
        let _: Ack = self.send(builder).await?;
        Ok(())
    }

    async fn remove_cart_item(
        &self,
        user_id: &str,
        item_id: &str,
        version: Option<i64>,
    ) -> Result<(), ClientError> {
        let builder = self.authed(
            self.client.delete(self.url(&format!("/cart/{user_id}/{item_id}"))),
            version,
        );
        let _: Ack = self.send(builder).await?;
        Ok(())
    }

    async fn clear_cart(&self, user_id: &str) -> Result<i64, ClientError> {
        let builder = self.authed(
            self.client.delete(self.url(&format!("/cart/{user_id}/clear"))),
            None,
        );
        let envelope: VersionEnvelope = self.send(builder).await?;
        Ok(envelope.version)
    }

    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, ClientError> {
        let builder = self
            .authed(self.client.post(self.url("/bookings")), None)
            .json(booking);
        let envelope: BookingEnvelope = self.send(builder).await?;
        Ok(envelope.booking)
    }

    async fn list_bookings(&self, user_id: &str) -> Result<Vec<Booking>, ClientError> {
        let builder = self.authed(self.client.get(self.url(&format!("/bookings/{user_id}"))), None);
        let envelope: BookingsEnvelope = self.send(builder).await?;
        Ok(envelope.bookings)
    }

    async fn update_booking(
        &self,
        booking_id: &str,
        patch: &BookingPatch,
    ) -> Result<Booking, ClientError> {
        let builder = self
            .authed(self.client.put(self.url(&format!("/booking/{booking_id}"))), None)
            .json(patch);
        let envelope: BookingEnvelope = self.send(builder).await?;
        Ok(envelope.booking)
    }

    async fn list_services(&self, category: Option<Category>) -> Result<Vec<Service>, ClientError> {
        let mut builder = self.client.get(self.url("/services"));
        if let Some(category) = category {
            builder = builder.query(&[("category", category.as_str())]);
        }
        let envelope: ServicesEnvelope = self.send(self.authed(builder, None)).await?;
        Ok(envelope.services)
    }

    async fn get_service(&self, id: &str) -> Result<Service, ClientError> {
        let builder = self.authed(self.client.get(self.url(&format!("/services/{id}"))), None);
        let envelope: ServiceEnvelope = self.send(builder).await?;
        Ok(envelope.service)
    }
}
