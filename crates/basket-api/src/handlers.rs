//! # Request Handlers
//!
//! Axum request handlers for the store API. Identifiers arrive as strings
//! and are parsed here, so malformed ids are rejected before any store
//! access.

use crate::auth::AuthenticatedUser;
use crate::error::{ApiError, ApiJson, ApiResult};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use basket_core::{
    AccountId, AddressBook, AddressFields, AddressSlot, CartItem, CartView, OrderId, ProductId,
    ShopError, StoredAddress, UserAccount,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Body naming a single product
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub product_id: String,
}

/// Catalog search parameters
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Newly provisioned account
#[derive(Debug, Serialize)]
pub struct AccountCreatedResponse {
    pub account_id: AccountId,
    /// Identity token for the `token` header
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct OrderPlacedResponse {
    pub order_id: OrderId,
}

#[derive(Debug, Serialize)]
pub struct ResumeResponse {
    /// Finished order, absent when nothing was pending
    pub order_id: Option<OrderId>,
}

#[derive(Debug, Serialize)]
pub struct RemovedResponse {
    pub removed: usize,
}

fn parse_product_id(raw: &str) -> Result<ProductId, ApiError> {
    raw.parse().map_err(ApiError::from)
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "basket",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Provision an empty account and hand back its token
#[instrument(skip(state))]
pub async fn create_account(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<AccountCreatedResponse>)> {
    let account = UserAccount::new(AccountId::new());
    let account_id = account.id;

    state
        .config
        .deadlines
        .mutate("insert_account", state.accounts.insert(account))
        .await?;
    let token = state.tokens.issue(account_id)?;

    info!(account_id = %account_id, "Provisioned account");
    Ok((
        StatusCode::CREATED,
        Json(AccountCreatedResponse { account_id, token }),
    ))
}

/// Get products list
pub async fn list_products(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let products = state
        .config
        .deadlines
        .read("list_products", state.catalog.list())
        .await?;
    Ok(Json(serde_json::json!({
        "products": products,
        "count": products.len()
    })))
}

/// Search products by name
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<impl IntoResponse> {
    let products = state
        .config
        .deadlines
        .read("search_products", state.catalog.search(&query.q))
        .await?;
    Ok(Json(serde_json::json!({
        "query": query.q,
        "products": products,
        "count": products.len()
    })))
}

/// Get single product
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let product_id = parse_product_id(&product_id)?;
    let product = state
        .config
        .deadlines
        .read("lookup_product", state.catalog.lookup(product_id))
        .await?
        .ok_or_else(|| ShopError::product_not_found(product_id))?;
    Ok(Json(product))
}

#[instrument(skip(state, user), fields(account_id = %user.account_id))]
pub async fn get_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<CartView>> {
    Ok(Json(state.cart.get_cart_total(user.account_id).await?))
}

#[instrument(skip(state, user, request), fields(account_id = %user.account_id))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<ProductRequest>,
) -> ApiResult<(StatusCode, Json<CartItem>)> {
    let product_id = parse_product_id(&request.product_id)?;
    let item = state.cart.add_to_cart(user.account_id, product_id).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[instrument(skip(state, user), fields(account_id = %user.account_id))]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(product_id): Path<String>,
) -> ApiResult<Json<RemovedResponse>> {
    let product_id = parse_product_id(&product_id)?;
    let removed = state
        .cart
        .remove_from_cart(user.account_id, product_id)
        .await?;
    Ok(Json(RemovedResponse { removed }))
}

#[instrument(skip(state, user), fields(account_id = %user.account_id))]
pub async fn checkout_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<(StatusCode, Json<OrderPlacedResponse>)> {
    let order_id = state.ledger.checkout_cart(user.account_id).await?;
    Ok((StatusCode::CREATED, Json(OrderPlacedResponse { order_id })))
}

#[instrument(skip(state, user), fields(account_id = %user.account_id))]
pub async fn resume_checkout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<ResumeResponse>> {
    let order_id = state.ledger.resume_checkout(user.account_id).await?;
    Ok(Json(ResumeResponse { order_id }))
}

#[instrument(skip(state, user, request), fields(account_id = %user.account_id))]
pub async fn instant_buy(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<ProductRequest>,
) -> ApiResult<(StatusCode, Json<OrderPlacedResponse>)> {
    let product_id = parse_product_id(&request.product_id)?;
    let order_id = state.ledger.instant_buy(user.account_id, product_id).await?;
    Ok((StatusCode::CREATED, Json(OrderPlacedResponse { order_id })))
}

#[instrument(skip(state, user), fields(account_id = %user.account_id))]
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<impl IntoResponse> {
    let orders = state.ledger.list_orders(user.account_id).await?;
    Ok(Json(serde_json::json!({
        "orders": orders,
        "count": orders.len()
    })))
}

#[instrument(skip(state, user), fields(account_id = %user.account_id))]
pub async fn list_addresses(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<AddressBook>> {
    Ok(Json(state.addresses.list_addresses(user.account_id).await?))
}

#[instrument(skip(state, user, request), fields(account_id = %user.account_id))]
pub async fn add_address(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<AddressFields>,
) -> ApiResult<(StatusCode, Json<StoredAddress>)> {
    let stored = state
        .addresses
        .add_address(user.account_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

#[instrument(skip(state, user, request), fields(account_id = %user.account_id, slot = %slot))]
pub async fn edit_address(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(slot): Path<String>,
    ApiJson(request): ApiJson<AddressFields>,
) -> ApiResult<StatusCode> {
    let slot: AddressSlot = slot.parse()?;
    state
        .addresses
        .edit_address(user.account_id, slot, request)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, user), fields(account_id = %user.account_id))]
pub async fn delete_addresses(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<StatusCode> {
    state.addresses.delete_addresses(user.account_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
