use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use basket_api::{create_router, AppConfig, AppState, TOKEN_HEADER};
use basket_core::{Product, ProductId};
use basket_store::{MemoryAccountStore, MemoryCatalog};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    kettle: ProductId,
    toaster: ProductId,
}

async fn app() -> TestApp {
    let config = AppConfig::from_lookup(|key: &str| match key {
        "TOKEN_SECRET" => Some("integration-secret".to_string()),
        _ => None,
    })
    .unwrap();

    let catalog = MemoryCatalog::default();
    let kettle = Product::new(ProductId::new(), "Electric Kettle", 500).with_rating(4);
    let toaster = Product::new(ProductId::new(), "Toaster", 1250);
    let (kettle_id, toaster_id) = (kettle.id, toaster.id);
    catalog.upsert(kettle).await.unwrap();
    catalog.upsert(toaster).await.unwrap();

    let state = AppState::with_repositories(
        config,
        Arc::new(catalog),
        Arc::new(MemoryAccountStore::new()),
    );

    TestApp {
        router: create_router(state),
        kettle: kettle_id,
        toaster: toaster_id,
    }
}

impl TestApp {
    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(TOKEN_HEADER, token);
        }
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    /// Provision an account and return its token
    async fn signup(&self) -> String {
        let (status, body) = self.send(Method::POST, "/api/v1/accounts", None, None).await;
        assert_eq!(status, StatusCode::CREATED);
        body["token"].as_str().unwrap().to_string()
    }
}

fn address(house: &str) -> Value {
    json!({
        "house": house,
        "street": "Brigade Road",
        "city": "Bengaluru",
        "postal_code": "560001"
    })
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = app.send(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_catalog_is_public() {
    let app = app().await;

    let (status, body) = app.send(Method::GET, "/api/v1/products", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let (status, body) = app
        .send(Method::GET, "/api/v1/products/search?q=toast", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"][0]["name"], "Toaster");

    let uri = format!("/api/v1/products/{}", app.kettle);
    let (status, body) = app.send(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], 500);

    let (status, body) = app
        .send(Method::GET, "/api/v1/products/not-an-id", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "invalid_product_id");
}

#[tokio::test]
async fn test_token_required() {
    let app = app().await;

    let (status, body) = app.send(Method::GET, "/api/v1/cart", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "unauthorized");

    let (status, _) = app
        .send(Method::GET, "/api/v1/cart", Some("t=1,uid=x,v1=00"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cart_checkout_flow() {
    let app = app().await;
    let token = app.signup().await;
    let add = json!({ "product_id": app.kettle.to_string() });

    for _ in 0..2 {
        let (status, body) = app
            .send(Method::POST, "/api/v1/cart/items", Some(&token), Some(add.clone()))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["price"], 500);
    }

    let (status, cart) = app.send(Method::GET, "/api/v1/cart", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["total"], 1000);
    assert_eq!(cart["items"].as_array().unwrap().len(), 2);

    let (status, placed) = app
        .send(Method::POST, "/api/v1/cart/checkout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = placed["order_id"].as_str().unwrap().to_string();

    let (_, cart) = app.send(Method::GET, "/api/v1/cart", Some(&token), None).await;
    assert_eq!(cart["total"], 0);
    assert!(cart["items"].as_array().unwrap().is_empty());

    let (status, orders) = app.send(Method::GET, "/api/v1/orders", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders["count"], 1);
    assert_eq!(orders["orders"][0]["id"], order_id);
    assert_eq!(orders["orders"][0]["total_price"], 1000);
    assert_eq!(orders["orders"][0]["payment_method"], "cash_on_delivery");
    assert_eq!(orders["orders"][0]["status"], "complete");

    let (status, resumed) = app
        .send(Method::POST, "/api/v1/cart/checkout/resume", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(resumed["order_id"].is_null());
}

#[tokio::test]
async fn test_empty_cart_checkout() {
    let app = app().await;
    let token = app.signup().await;

    let (status, body) = app
        .send(Method::POST, "/api/v1/cart/checkout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_code"], "empty_cart");
}

#[tokio::test]
async fn test_remove_and_unknown_product() {
    let app = app().await;
    let token = app.signup().await;
    let add = json!({ "product_id": app.toaster.to_string() });
    for _ in 0..2 {
        app.send(Method::POST, "/api/v1/cart/items", Some(&token), Some(add.clone()))
            .await;
    }

    let uri = format!("/api/v1/cart/items/{}", app.toaster);
    let (status, body) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], 2);

    let (_, body) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(body["removed"], 0);

    let unknown = json!({ "product_id": ProductId::new().to_string() });
    let (status, body) = app
        .send(Method::POST, "/api/v1/cart/items", Some(&token), Some(unknown))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "product_not_found");
}

#[tokio::test]
async fn test_instant_buy_keeps_cart() {
    let app = app().await;
    let token = app.signup().await;
    app.send(
        Method::POST,
        "/api/v1/cart/items",
        Some(&token),
        Some(json!({ "product_id": app.kettle.to_string() })),
    )
    .await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/orders/instant",
            Some(&token),
            Some(json!({ "product_id": app.toaster.to_string() })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, cart) = app.send(Method::GET, "/api/v1/cart", Some(&token), None).await;
    assert_eq!(cart["total"], 500);

    let (_, orders) = app.send(Method::GET, "/api/v1/orders", Some(&token), None).await;
    assert_eq!(orders["orders"][0]["total_price"], 1250);
}

#[tokio::test]
async fn test_address_book() {
    let app = app().await;
    let token = app.signup().await;

    let (status, home) = app
        .send(Method::POST, "/api/v1/addresses", Some(&token), Some(address("1")))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(home["slot"], "home");

    let (_, work) = app
        .send(Method::POST, "/api/v1/addresses", Some(&token), Some(address("2")))
        .await;
    assert_eq!(work["slot"], "work");

    let (status, body) = app
        .send(Method::POST, "/api/v1/addresses", Some(&token), Some(address("3")))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_code"], "slot_limit_exceeded");

    let (status, _) = app
        .send(Method::PUT, "/api/v1/addresses/work", Some(&token), Some(address("22")))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, book) = app.send(Method::GET, "/api/v1/addresses", Some(&token), None).await;
    assert_eq!(book["work"]["house"], "22");
    assert_eq!(book["work"]["id"], work["id"]);
    assert_eq!(book["home"]["house"], "1");

    let (status, body) = app
        .send(Method::PUT, "/api/v1/addresses/office", Some(&token), Some(address("9")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "invalid_request");

    let (status, _) = app.send(Method::DELETE, "/api/v1/addresses", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, book) = app.send(Method::GET, "/api/v1/addresses", Some(&token), None).await;
    assert_eq!(book, json!({}));

    let (status, body) = app
        .send(Method::PUT, "/api/v1/addresses/home", Some(&token), Some(address("5")))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "address_slot_not_found");
}

#[tokio::test]
async fn test_accounts_are_isolated() {
    let app = app().await;
    let alice = app.signup().await;
    let bob = app.signup().await;

    app.send(
        Method::POST,
        "/api/v1/cart/items",
        Some(&alice),
        Some(json!({ "product_id": app.kettle.to_string() })),
    )
    .await;

    let (_, cart) = app.send(Method::GET, "/api/v1/cart", Some(&bob), None).await;
    assert_eq!(cart["total"], 0);
}

#[tokio::test]
async fn test_incomplete_bodies_are_invalid_requests() {
    let app = app().await;
    let token = app.signup().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/addresses",
            Some(&token),
            Some(json!({ "house": "1" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "invalid_request");
    assert_eq!(body["code"], 400);

    let (status, body) = app
        .send(Method::POST, "/api/v1/cart/items", Some(&token), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "invalid_request");

    let (status, body) = app
        .send(Method::PUT, "/api/v1/addresses/home", Some(&token), Some(json!([])))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "invalid_request");
}

#[tokio::test]
async fn test_body_without_json_content_type() {
    let app = app().await;
    let token = app.signup().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/orders/instant")
        .header(TOKEN_HEADER, &token)
        .body(Body::from(json!({ "product_id": app.kettle.to_string() }).to_string()))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error_code"], "invalid_request");

    let (_, orders) = app.send(Method::GET, "/api/v1/orders", Some(&token), None).await;
    assert_eq!(orders["count"], 0);
}
