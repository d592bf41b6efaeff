use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::{SignupRequest, User};

const MIN_PASSWORD_LEN: usize = 6;

/// Create an account. Email confirmation is skipped: new accounts are
/// confirmed immediately.
pub fn signup(conn: &Connection, req: &SignupRequest) -> AppResult<User> {
    let email = req.email.trim().to_lowercase();
    let name = req.name.trim();

    if !is_plausible_email(&email) {
        return Err(AppError::Validation(format!("invalid email address: {}", req.email)));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if name.is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    if queries::email_exists(conn, &email)? {
        return Err(AppError::Validation(
            "a user with this email address has already been registered".to_string(),
        ));
    }

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        email,
        name: name.to_string(),
        email_confirmed: true,
        created_at: Utc::now(),
    };
    queries::create_user(conn, &user, &hash_password(&req.password)?)?;

    tracing::info!(user_id = %user.id, "user signed up");
    Ok(user)
}

pub fn verify_credentials(conn: &Connection, email: &str, password: &str) -> AppResult<User> {
    let email = email.trim().to_lowercase();
    let (user, hash) = queries::get_user_by_email(conn, &email)?.ok_or(AppError::Unauthorized)?;

    let parsed = PasswordHash::new(&hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid password hash: {e}")))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AppError::Unauthorized)?;

    Ok(user)
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to hash password: {e}")))?;
    Ok(hash.to_string())
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}
