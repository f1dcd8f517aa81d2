//! # basket-api
//!
//! HTTP API layer for basket-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for cart, checkout, orders and addresses
//! - Identity token verification middleware
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/v1/accounts` | Provision account |
//! | GET | `/api/v1/products` | List products |
//! | GET | `/api/v1/cart` | Cart and total |
//! | POST | `/api/v1/cart/items` | Add to cart |
//! | POST | `/api/v1/cart/checkout` | Checkout cart |
//! | POST | `/api/v1/orders/instant` | Instant buy |
//! | PUT | `/api/v1/addresses/{slot}` | Edit address |

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use auth::{AuthenticatedUser, TokenSigner, TOKEN_HEADER};
pub use error::{ApiError, ApiJson, ErrorResponse};
pub use routes::create_router;
pub use state::{AppConfig, AppState};
