//! Route definitions for the Stone Inventory Visual server

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes. Everything except the health check requires a bearer
/// token signed with the configured secret.
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - grouped inventory and drill-down
        .nest("/inventory", inventory_routes(state.clone()))
        // Protected routes - lot history, photos and notes
        .nest("/units", unit_routes(state.clone()))
        // Protected routes - holds and price authorizations
        .nest("/holds", hold_routes(state.clone()))
        .nest("/authorizations", authorization_routes(state.clone()))
        // Protected routes - partner lookups
        .nest("/partners", partner_routes(state))
}

/// Inventory view routes (protected)
fn inventory_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/grouped",
            get(handlers::search_grouped_inventory).post(handlers::get_grouped_inventory),
        )
        .route("/units", post(handlers::get_unit_details))
        .route("/filter-options", get(handlers::get_filter_options))
        .route("/sale-orders", post(handlers::get_sale_order_info))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Lot routes addressed by the unit that carries the lot (protected)
fn unit_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/:unit_id/history", get(handlers::get_lot_history))
        .route(
            "/:unit_id/photos",
            get(handlers::get_lot_photos).post(handlers::save_lot_photo),
        )
        .route(
            "/:unit_id/notes",
            get(handlers::get_lot_notes).put(handlers::save_lot_notes),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Hold routes (protected)
fn hold_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_hold))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Price authorization routes (protected)
fn authorization_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_price_authorization))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Customer, architect and project routes (protected)
fn partner_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/customers",
            get(handlers::search_customers).post(handlers::create_customer),
        )
        .route(
            "/architects",
            get(handlers::search_architects).post(handlers::create_architect),
        )
        .route(
            "/projects",
            get(handlers::search_projects).post(handlers::create_project),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
