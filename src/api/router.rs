use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, comment_eligibility_handler, create_booking, decide_booking, get_booking,
    item_availability_handler, list_booker_bookings_handler, list_item_bookings_handler,
    list_owner_bookings_handler,
};

/// Creates the API router with all booking endpoints
///
/// Command endpoints (Write operations):
/// - POST /bookings - Request a booking
/// - PATCH /bookings/:id?approved= - Approve or reject a booking
///
/// Query endpoints (Read operations):
/// - GET /bookings - Bookings made by the caller
/// - GET /bookings/owner - Bookings of the caller's items
/// - GET /bookings/:id - Booking details
/// - GET /items/:id/bookings - Bookings of one item
/// - GET /items/:id/availability - Last and next approved booking
/// - GET /items/:id/bookers/:user_id/eligible - Comment eligibility
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Booking endpoints
        .route(
            "/bookings",
            post(create_booking).get(list_booker_bookings_handler),
        )
        .route("/bookings/owner", get(list_owner_bookings_handler))
        .route("/bookings/:id", get(get_booking).patch(decide_booking))
        // Item-scoped booking views
        .route("/items/:id/bookings", get(list_item_bookings_handler))
        .route("/items/:id/availability", get(item_availability_handler))
        .route(
            "/items/:id/bookers/:user_id/eligible",
            get(comment_eligibility_handler),
        )
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
