use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::errors::{AppError, AppResult};
use crate::models::{Category, Service};
use crate::state::AppState;

use super::check_auth;

#[derive(Deserialize)]
pub struct ServicesQuery {
    pub category: Option<String>,
}

// GET /services
pub async fn list_services(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ServicesQuery>,
) -> AppResult<Json<serde_json::Value>> {
    check_auth(&headers, &state.config.api_key)?;

    let services: Vec<&Service> = match query.category.as_deref() {
        Some(raw) => {
            let category = Category::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("unknown category: {raw}")))?;
            state.catalog.by_category(category)
        }
        None => state.catalog.all().iter().collect(),
    };

    Ok(Json(serde_json::json!({ "success": true, "services": services })))
}

// GET /services/:id
pub async fn get_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    check_auth(&headers, &state.config.api_key)?;

    let service = state
        .catalog
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("service {id}")))?;

    Ok(Json(serde_json::json!({ "success": true, "service": service })))
}
