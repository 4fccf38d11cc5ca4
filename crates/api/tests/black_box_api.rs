use reqwest::StatusCode;
use serde_json::json;

use solestore_api::config::AppConfig;
use solestore_catalog::Product;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = solestore_api::app::build_app(&AppConfig::default(), catalog());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn catalog() -> Vec<Product> {
    vec![
        Product::new("air-1", 150.0)
            .with_name("Air One")
            .with_sku("AO1000 001")
            .with_date_added("2024-01-01T00:00:00Z".parse().unwrap())
            .with_gender("MEN")
            .with_color("Black")
            .with_sizes([9.0, 10.0])
            .with_height("LOW")
            .with_year(2022)
            .with_ratings(4.5)
            .with_stock(3)
            .with_shipping_cost(5.0),
        Product::new("run-2", 90.0)
            .with_name("Runner")
            .with_gender("MEN")
            .with_color("White")
            .with_sizes([10.0])
            .with_height("MID")
            .with_year(2021)
            .with_ratings(3.0)
            .with_discount(10.0)
            .with_stock(10),
        Product::new("court-3", 120.0)
            .with_name("Court")
            .with_gender("MEN")
            .with_color("Black")
            .with_sizes([11.0])
            .with_height("LOW")
            .with_year(2023)
            .with_stock(1),
        Product::new("trail-4", 200.0)
            .with_name("Trail Air")
            .with_date_added("2024-06-01T00:00:00Z".parse().unwrap())
            .with_reviews([5.0, 4.0])
            .with_gender("WOMEN")
            .with_color("Black")
            .with_sizes([7.0])
            .with_height("MID")
            .with_year(2022)
            .with_stock(4),
    ]
}

fn ids(body: &serde_json::Value) -> Vec<String> {
    body["data"]["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect()
}

const GUEST: &str = "0192f0c1-6a1b-7d2e-9f00-1234567890ab";

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn unregistered_method_is_405_with_allow() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client.put(srv.url("/api/cart")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        res.headers()["allow"].to_str().unwrap(),
        "GET, POST, DELETE"
    );
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({"success": false, "error": true, "message": "Method Not Allowed"})
    );
}

#[tokio::test]
async fn patch_head_and_options_are_405_with_allow() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for method in [
        reqwest::Method::PATCH,
        reqwest::Method::HEAD,
        reqwest::Method::OPTIONS,
    ] {
        let res = client
            .request(method.clone(), srv.url("/api/products"))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(res.headers()["allow"].to_str().unwrap(), "GET");
    }
}

#[tokio::test]
async fn products_are_filtered_sorted_and_located() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(srv.url("/api/products?gender=Men&color=Black&sort=asc_price"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();

    assert_eq!(ids(&body), ["court-3", "air-1"]);
    assert_eq!(body["message"], "Found 2 products");
    assert_eq!(
        body["data"]["location"],
        "/category/men?color=Black&min_price=0&max_price=10000"
    );
    assert_eq!(body["data"]["filters"]["gender"], "Men");
}

#[tokio::test]
async fn products_price_range_and_rating_sort() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(srv.url(
        "/api/products?gender=MEN&min_price=100&max_price=99999&sort=ratings",
    ))
    .await
    .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();

    // Unrated products sort as 0.
    assert_eq!(ids(&body), ["air-1", "court-3"]);
}

#[tokio::test]
async fn cart_add_get_remove() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/cart"))
        .header("x-guest-id", GUEST)
        .json(&json!({"productId": "run-2", "qty": 2, "size": 10}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-guest-id"].to_str().unwrap(), GUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Product Successfully Added To Cart");
    assert_eq!(body["data"]["quantity"], 2);
    assert_eq!(body["data"]["total"], 160.0);

    // Quantity is clamped to stock.
    client
        .post(srv.url("/api/cart"))
        .header("x-guest-id", GUEST)
        .json(&json!({"productId": "court-3", "qty": 5, "size": 11}))
        .send()
        .await
        .unwrap();

    let res = client
        .get(srv.url("/api/cart"))
        .header("x-guest-id", GUEST)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Cart Items: 2");
    assert_eq!(body["data"]["count"], 2);
    assert_eq!(body["data"]["items"]["court-3"]["quantity"], 1);
    assert_eq!(body["data"]["total"], 280.0);

    let res = client
        .delete(srv.url("/api/cart"))
        .header("x-guest-id", GUEST)
        .json(&json!({"productId": "run-2"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = client
        .get(srv.url("/api/cart"))
        .header("x-guest-id", GUEST)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["productIds"], json!(["court-3"]));
}

#[tokio::test]
async fn carts_are_per_guest() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    client
        .post(srv.url("/api/cart"))
        .header("x-guest-id", GUEST)
        .json(&json!({"productId": "air-1", "qty": 1, "size": 9}))
        .send()
        .await
        .unwrap();

    let res = client.get(srv.url("/api/cart")).send().await.unwrap();
    assert!(res.headers().contains_key("x-guest-id"));
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["count"], 0);
}

#[tokio::test]
async fn malformed_cart_request_is_400() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for payload in [
        json!({"productId": "air-1"}),
        json!({"productId": "nope", "qty": 1, "size": 9}),
    ] {
        let res = client
            .post(srv.url("/api/cart"))
            .header("x-guest-id", GUEST)
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(
            body,
            json!({"success": false, "error": true, "message": "Malformed Request"})
        );
    }

    let res = client
        .post(srv.url("/api/cart"))
        .header("x-guest-id", GUEST)
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_wishlist_entry_is_409() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let add = || {
        client
            .post(srv.url("/api/wishlist"))
            .header("x-guest-id", GUEST)
            .json(&json!({"productId": "trail-4"}))
            .send()
    };

    assert_eq!(add().await.unwrap().status(), StatusCode::OK);

    let res = add().await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "productId already exists in database");

    let body: serde_json::Value = client
        .get(srv.url("/api/wishlist"))
        .header("x-guest-id", GUEST)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["count"], 1);
}

#[tokio::test]
async fn unknown_wishlist_product_is_404() {
    let srv = TestServer::spawn().await;

    let res = reqwest::Client::new()
        .post(srv.url("/api/wishlist"))
        .header("x-guest-id", GUEST)
        .json(&json!({"productId": "ghost"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_matches_titles_newest_first() {
    let srv = TestServer::spawn().await;

    let body: serde_json::Value = reqwest::get(srv.url("/api/search?q=AIR"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(ids(&body), ["trail-4", "air-1"]);
    assert_eq!(body["message"], "Found 2 products");
    assert_eq!(body["data"]["count"], 2);
    assert_eq!(body["data"]["query"], "AIR");
    // Ratings come from the reviews.
    assert_eq!(body["data"]["products"][0]["ratings"], 4.5);

    let body: serde_json::Value = reqwest::get(srv.url("/api/search?search=runner&q=air"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ids(&body), ["run-2"]);
}

#[tokio::test]
async fn product_by_slug_with_related() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(srv.url("/api/products/air-one-ao1000-001"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();

    assert_eq!(body["data"]["product"]["id"], "air-1");
    let related: Vec<&str> = body["data"]["relatedProducts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(related, ["court-3"]);

    let res = reqwest::get(srv.url("/api/products/no-such-shoe-xx0000-000"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
