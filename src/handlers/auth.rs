use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppResult;
use crate::models::SignupRequest;
use crate::services::auth;
use crate::state::AppState;

use super::check_auth;

// POST /signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    check_auth(&headers, &state.config.api_key)?;
    let Json(req) = payload?;

    let user = {
        let db = state.db.lock().unwrap();
        auth::signup(&db, &req)?
    };

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "success": true, "user": user })),
    ))
}

#[derive(Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

// POST /signin
pub async fn signin(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<SigninRequest>, JsonRejection>,
) -> AppResult<Json<serde_json::Value>> {
    check_auth(&headers, &state.config.api_key)?;
    let Json(req) = payload?;

    let user = {
        let db = state.db.lock().unwrap();
        auth::verify_credentials(&db, &req.email, &req.password)?
    };
    tracing::info!(user_id = %user.id, "user signed in");

    Ok(Json(serde_json::json!({ "success": true, "user": user })))
}
