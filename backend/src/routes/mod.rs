//! Route definitions for the travel marketplace platform

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (mixed public and protected)
        .nest("/auth", auth_routes())
        // Provider onboarding (public)
        .nest("/applications", application_routes())
        // Public inventory browsing
        .nest("/accommodations", accommodation_routes())
        .nest("/transportations", transportation_routes())
        .nest("/sport-adventures", sport_adventure_routes())
        // Public booking creation and lookup
        .nest("/bookings", booking_routes())
        // File uploads (public, used by the application form)
        .route("/uploads/:category", post(handlers::upload_file))
        // Provider portal (protected)
        .nest("/provider", provider_portal_routes())
        // Admin console (protected)
        .nest("/admin", admin_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/provider/login", post(handlers::provider_login))
        .route("/admin/login", post(handlers::admin_login))
        .route("/refresh", post(handlers::refresh))
        .route("/forgot-password", post(handlers::forgot_password))
        .route("/reset-password", post(handlers::reset_password))
        .merge(
            Router::new()
                .route("/change-password", post(handlers::change_password))
                .route_layer(middleware::from_fn(auth_middleware)),
        )
}

/// Provider application routes (public)
fn application_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::submit_application))
        .route("/:application_id", get(handlers::get_application_status))
}

/// Public accommodation browsing
fn accommodation_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::browse_accommodations))
        .route("/:accommodation_id", get(handlers::get_accommodation))
}

/// Public transportation browsing
fn transportation_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::browse_transportations))
        .route("/:transport_id", get(handlers::get_transportation))
}

/// Public sport-adventure browsing
fn sport_adventure_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::browse_sport_adventures))
        .route("/:activity_id", get(handlers::get_sport_adventure))
}

/// Public booking creation and customer lookup
fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_customer_bookings))
        .route(
            "/accommodations",
            post(handlers::create_accommodation_booking),
        )
        .route(
            "/transportations",
            post(handlers::create_transportation_booking),
        )
        .route(
            "/sport-adventures",
            post(handlers::create_sport_adventure_booking),
        )
        .route("/:booking_id", get(handlers::get_booking))
}

/// Provider portal (protected)
fn provider_portal_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(handlers::get_my_profile))
        // Accommodation listings and their rooms
        .route(
            "/accommodations",
            get(handlers::list_my_accommodations).post(handlers::create_accommodation),
        )
        .route(
            "/accommodations/:accommodation_id",
            put(handlers::update_accommodation).delete(handlers::delete_accommodation),
        )
        .route(
            "/accommodations/:accommodation_id/rooms",
            post(handlers::add_room),
        )
        .route(
            "/accommodations/:accommodation_id/rooms/:room_number",
            put(handlers::update_room).delete(handlers::remove_room),
        )
        // Transportation units
        .route(
            "/transportations",
            get(handlers::list_my_transportations).post(handlers::create_transportation),
        )
        .route(
            "/transportations/:transport_id",
            put(handlers::update_transportation).delete(handlers::delete_transportation),
        )
        // Sport-adventure activities
        .route(
            "/sport-adventures",
            get(handlers::list_my_sport_adventures).post(handlers::create_sport_adventure),
        )
        .route(
            "/sport-adventures/:activity_id",
            put(handlers::update_sport_adventure).delete(handlers::delete_sport_adventure),
        )
        // Incoming bookings
        .route("/bookings", get(handlers::list_provider_bookings))
        .route("/bookings/:booking_id/decision", post(handlers::decide_booking))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Admin console (protected)
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/applications", get(handlers::list_applications))
        .route("/applications/:application_id", get(handlers::get_application))
        .route(
            "/applications/:application_id/approve",
            post(handlers::approve_application),
        )
        .route(
            "/applications/:application_id/reject",
            post(handlers::reject_application),
        )
        .route(
            "/applications/:application_id/payment",
            post(handlers::record_payment),
        )
        .route("/metrics", get(handlers::platform_metrics))
        .route("/reports/bookings.csv", get(handlers::export_bookings_csv))
        .route_layer(middleware::from_fn(auth_middleware))
}
