pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::state::AppState;

/// All API routes, nested under the configured prefix.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/signup", post(handlers::auth::signup))
        .route("/signin", post(handlers::auth::signin))
        .route(
            "/cart/:user_id",
            get(handlers::cart::get_cart).post(handlers::cart::add_item),
        )
        .route("/cart/:user_id/clear", delete(handlers::cart::clear))
        .route(
            "/cart/:user_id/:item_id",
            put(handlers::cart::update_item).delete(handlers::cart::remove_item),
        )
        .route("/bookings", post(handlers::bookings::create_booking))
        .route("/bookings/:user_id", get(handlers::bookings::list_for_user))
        .route(
            "/booking/:booking_id",
            get(handlers::bookings::get_booking).put(handlers::bookings::update_booking),
        )
        .route("/services", get(handlers::catalog::list_services))
        .route("/services/:id", get(handlers::catalog::get_service));

    let prefix = state.config.api_prefix.clone();
    let api = api.with_state(state);

    if prefix.is_empty() {
        api
    } else {
        Router::new().nest(&prefix, api)
    }
}
