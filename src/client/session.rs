use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::models::User;

use super::api::StorefrontApi;
use super::ClientError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            phone: None,
            address: None,
        }
    }
}

/// Shared handle to the signed-in user. Clones see the same session.
#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    user: Arc<RwLock<Option<SessionUser>>>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(user: SessionUser) -> Self {
        let session = Self::new();
        session.sign_in(user);
        session
    }

    pub fn sign_in(&self, user: SessionUser) {
        tracing::debug!(user_id = %user.id, "session started");
        *self.user.write().unwrap() = Some(user);
    }

    pub fn sign_out(&self) {
        *self.user.write().unwrap() = None;
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.user.read().unwrap().clone()
    }

    pub fn user_id(&self) -> Option<String> {
        self.user.read().unwrap().as_ref().map(|u| u.id.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.read().unwrap().is_some()
    }

    /// Check credentials against the backend and start a session on success.
    pub async fn sign_in_with_password(
        &self,
        api: &dyn StorefrontApi,
        email: &str,
        password: &str,
    ) -> Result<SessionUser, ClientError> {
        let user: SessionUser = api.sign_in(email, password).await?.into();
        self.sign_in(user.clone());
        Ok(user)
    }
}
