//! Account endpoints against a running storefront.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (cargo run -p hayat-cli -- migrate)
//! - The storefront server running (cargo run -p hayat-storefront)

use hayat_integration_tests::{StorefrontClient, account_details};
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_account_requires_identity() {
    let client = StorefrontClient::anonymous();

    for path in ["/account/details", "/account/addresses", "/account/orders"] {
        let resp = client.get(path).send().await.expect("request failed");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{path}");

        let body: Value = resp.json().await.expect("invalid json");
        assert_eq!(body["errorType"], "401");
        assert!(body["errorCauses"][0]["errorMessage"].as_str().is_some());
    }
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_unknown_identity_is_not_found() {
    let client = StorefrontClient::with_new_identity();

    let resp = client.get("/account/details").send().await.expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_register_then_read_details() {
    let client = StorefrontClient::with_new_identity();

    let resp = client
        .post("/account/register")
        .json(&account_details("Ayse", "ayse@shop.test"))
        .send()
        .await
        .expect("register failed");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client.get("/account/details").send().await.expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("invalid json");
    assert_eq!(body["firstName"], "Ayse");
    assert_eq!(body["email"], "ayse@shop.test");

    // A fresh customer has no addresses and no orders
    let addresses: Value = client
        .get("/account/addresses")
        .send()
        .await
        .expect("request failed")
        .json()
        .await
        .expect("invalid json");
    assert_eq!(addresses["shippingAddress"], serde_json::json!([]));
    assert_eq!(addresses["billingAddress"], serde_json::json!([]));

    let orders: Value = client
        .get("/account/orders")
        .send()
        .await
        .expect("request failed")
        .json()
        .await
        .expect("invalid json");
    assert_eq!(orders, serde_json::json!([]));
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_register_twice_conflicts() {
    let client = StorefrontClient::with_new_identity();
    let body = account_details("Deniz", "deniz@shop.test");

    let first = client.post("/account/register").json(&body).send().await.expect("request failed");
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = client.post("/account/register").json(&body).send().await.expect("request failed");
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_update_details_validates_email() {
    let client = StorefrontClient::with_new_identity();
    client
        .post("/account/register")
        .json(&account_details("Can", "can@shop.test"))
        .send()
        .await
        .expect("register failed");

    let resp = client
        .post("/account/details")
        .json(&account_details("Can", "not-an-email"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client
        .post("/account/details")
        .json(&account_details("Cem", "cem@shop.test"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("invalid json");
    assert_eq!(body["firstName"], "Cem");
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_foreign_order_is_hidden() {
    let client = StorefrontClient::with_new_identity();
    client
        .post("/account/register")
        .json(&account_details("Ece", "ece@shop.test"))
        .send()
        .await
        .expect("register failed");

    // Either no such order or one owned by someone else
    let resp = client.get("/account/orders/1").send().await.expect("request failed");
    assert!(
        matches!(resp.status(), StatusCode::NOT_FOUND | StatusCode::FORBIDDEN),
        "unexpected status {}",
        resp.status()
    );
}
