use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;

use crate::errors::AppResult;
use crate::models::{CartItem, CartItemPatch, StoredCart};
use crate::services::cart;
use crate::state::AppState;

use super::{check_auth, expected_version};

// GET /cart/:user_id
pub async fn get_cart(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> AppResult<Json<StoredCart>> {
    check_auth(&headers, &state.config.api_key)?;

    let db = state.db.lock().unwrap();
    Ok(Json(cart::get_cart(&db, &user_id)?))
}

// POST /cart/:user_id
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
    payload: Result<Json<CartItem>, JsonRejection>,
) -> AppResult<Json<serde_json::Value>> {
    check_auth(&headers, &state.config.api_key)?;
    let expected = expected_version(&headers)?;
    let Json(item) = payload?;

    let (item, version) = {
        let db = state.db.lock().unwrap();
        cart::add_item(&db, &user_id, item, expected)?
    };

    Ok(Json(serde_json::json!({ "success": true, "item": item, "version": version })))
}

// PUT /cart/:user_id/:item_id
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((user_id, item_id)): Path<(String, String)>,
    payload: Result<Json<CartItemPatch>, JsonRejection>,
) -> AppResult<Json<serde_json::Value>> {
    check_auth(&headers, &state.config.api_key)?;
    let expected = expected_version(&headers)?;
    let Json(patch) = payload?;

    let version = {
        let db = state.db.lock().unwrap();
        cart::update_item(&db, &user_id, &item_id, &patch, expected)?
    };

    Ok(Json(serde_json::json!({ "success": true, "version": version })))
}

// DELETE /cart/:user_id/:item_id
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((user_id, item_id)): Path<(String, String)>,
) -> AppResult<Json<serde_json::Value>> {
    check_auth(&headers, &state.config.api_key)?;
    let expected = expected_version(&headers)?;

    let version = {
        let db = state.db.lock().unwrap();
        cart::remove_item(&db, &user_id, &item_id, expected)?
    };

    Ok(Json(serde_json::json!({ "success": true, "version": version })))
}

// DELETE /cart/:user_id/clear
pub async fn clear(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    check_auth(&headers, &state.config.api_key)?;

    let version = {
        let db = state.db.lock().unwrap();
        cart::clear(&db, &user_id)?
    };

    Ok(Json(serde_json::json!({ "success": true, "version": version })))
}
