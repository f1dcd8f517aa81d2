//! # Routes
//!
//! Axum router configuration for the store API.

use crate::auth;
use crate::handlers;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Public:
///   - POST /api/v1/accounts - Provision an account and issue its token
///   - GET  /api/v1/products - List products
///   - GET  /api/v1/products/search?q= - Search products by name
///   - GET  /api/v1/products/{product_id} - Get product by ID
///
/// - Token required:
///   - GET    /api/v1/cart - Cart contents and total
///   - POST   /api/v1/cart/items - Add a product snapshot
///   - DELETE /api/v1/cart/items/{product_id} - Remove every copy of a product
///   - POST   /api/v1/cart/checkout - Turn the cart into an order
///   - POST   /api/v1/cart/checkout/resume - Finish a stalled checkout
///   - POST   /api/v1/orders/instant - Buy one product directly
///   - GET    /api/v1/orders - Order history
///   - GET    /api/v1/addresses - Address book
///   - POST   /api/v1/addresses - Add an address
///   - PUT    /api/v1/addresses/{slot} - Edit the home or work address
///   - DELETE /api/v1/addresses - Clear the address book
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public_routes = Router::new()
        .route("/accounts", post(handlers::create_account))
        .route("/products", get(handlers::list_products))
        .route("/products/search", get(handlers::search_products))
        .route("/products/{product_id}", get(handlers::get_product));

    let account_routes = Router::new()
        // Cart
        .route("/cart", get(handlers::get_cart))
        .route("/cart/items", post(handlers::add_to_cart))
        .route("/cart/items/{product_id}", delete(handlers::remove_from_cart))
        // Orders
        .route("/cart/checkout", post(handlers::checkout_cart))
        .route("/cart/checkout/resume", post(handlers::resume_checkout))
        .route("/orders", get(handlers::list_orders))
        .route("/orders/instant", post(handlers::instant_buy))
        // Addresses
        .route(
            "/addresses",
            get(handlers::list_addresses)
                .post(handlers::add_address)
                .delete(handlers::delete_addresses),
        )
        .route("/addresses/{slot}", put(handlers::edit_address))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_identity,
        ));

    let api_routes = Router::new().merge(public_routes).merge(account_routes);

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
