//! API integration tests
//!
//! Require a running server configured with the default admin password
//! and rate limiting off (`TAXIQR_RATE_LIMIT__ENABLED=false`).
//! Run with: cargo test -- --ignored

use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

const SERVER_URL: &str = "http://localhost:8080";
const BASE_URL: &str = "http://localhost:8080/api/v1";
const ADMIN_PASSWORD: &str = "admin123";

fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

/// Helper to get a client holding an admin session cookie
async fn admin_client() -> Client {
    let client = client();
    let response = client
        .post(format!("{}/auth", BASE_URL))
        .json(&json!({ "password": ADMIN_PASSWORD }))
        .send()
        .await
        .expect("Failed to send login request");
    assert_eq!(response.status(), StatusCode::OK);
    client
}

fn unique_code(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &suffix[..8])
}

async fn create_taxi(client: &Client, code: &str) -> Value {
    let response = client
        .post(format!("{}/taxis", BASE_URL))
        .json(&json!({ "taxi_code": code, "plate_number": "TX-1234" }))
        .send()
        .await
        .expect("Failed to create taxi");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["taxi"].clone()
}

/// Hit the QR target without following the redirect
async fn scan(client: &Client, code: &str) -> reqwest::Response {
    client
        .get(format!("{}/t/{}", SERVER_URL, code))
        .header("User-Agent", "integration-test")
        .send()
        .await
        .expect("Failed to scan")
}

fn scan_token(location: &str) -> String {
    let url = url::Url::parse(location).expect("Invalid redirect location");
    url.query_pairs()
        .find(|(k, _)| k == "scan")
        .map(|(_, v)| v.to_string())
        .expect("No scan token in redirect")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let response = client()
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login_and_session_check() {
    let client = admin_client().await;

    let response = client
        .get(format!("{}/auth", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["authenticated"], true);

    let response = client
        .delete(format!("{}/auth", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{}/auth", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_password() {
    let response = client()
        .post(format!("{}/auth", BASE_URL))
        .json(&json!({ "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get("set-cookie").is_none());
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_admin_access() {
    let client = client();
    for path in ["/taxis", "/customers", "/stats"] {
        let response = client
            .get(format!("{}{}", BASE_URL, path))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", path);
    }
}

#[tokio::test]
#[ignore]
async fn test_create_taxi_normalizes_code() {
    let client = admin_client().await;
    let code = unique_code("tx");

    let taxi = create_taxi(&client, &code).await;
    assert_eq!(taxi["taxi_code"], code.to_uppercase());
    assert_eq!(taxi["is_active"], true);

    let response = client
        .post(format!("{}/taxis", BASE_URL))
        .json(&json!({ "taxi_code": code.to_uppercase() }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client
        .post(format!("{}/taxis", BASE_URL))
        .json(&json!({ "taxi_code": "bad code!" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_scan_redirects_to_mini_app() {
    let client = admin_client().await;
    let code = unique_code("scan");
    let taxi = create_taxi(&client, &code).await;

    let response = scan(&client, &code.to_lowercase()).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("No Location header")
        .to_string();
    assert!(location.contains(&format!("taxi={}", code.to_uppercase())));
    Uuid::parse_str(&scan_token(&location)).expect("Scan token is not a UUID");

    let response = client
        .get(format!("{}/taxis/{}/scans", BASE_URL, taxi["id"].as_str().unwrap()))
        .send()
        .await
        .expect("Failed to send request");
    let scans: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(scans.as_array().map(Vec::len), Some(1));
    assert!(scans[0]["line_user_id"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_scan_unknown_and_inactive_taxi() {
    let client = admin_client().await;

    let response = scan(&client, "NO-SUCH-TAXI-0").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let code = unique_code("off");
    let taxi = create_taxi(&client, &code).await;
    let response = client
        .put(format!("{}/taxis/{}", BASE_URL, taxi["id"].as_str().unwrap()))
        .json(&json!({ "is_active": false }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = scan(&client, &code).await;
    assert_eq!(response.status(), StatusCode::GONE);
}

#[tokio::test]
#[ignore]
async fn test_registration_attributes_first_taxi() {
    let client = admin_client().await;
    let code = unique_code("reg");
    let taxi = create_taxi(&client, &code).await;
    let visitor = format!("U{}", Uuid::new_v4().simple());

    let location = scan(&client, &code)
        .await
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("No Location header")
        .to_string();
    let token = scan_token(&location);

    let response = client
        .post(format!("{}/liff/register", BASE_URL))
        .json(&json!({
            "visitorId": visitor,
            "displayName": "Rider",
            "taxiCode": code,
            "scanToken": token
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    assert_eq!(body["isNewCustomer"], true);

    let response = client
        .post(format!("{}/liff/register", BASE_URL))
        .json(&json!({ "visitorId": visitor, "taxiCode": code }))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["isNewCustomer"], false);

    let response = client
        .get(format!("{}/customers", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let customer = body["customers"]
        .as_array()
        .and_then(|list| list.iter().find(|c| c["line_user_id"] == visitor.as_str()))
        .cloned()
        .expect("Registered customer not listed");
    assert_eq!(customer["total_scans"], 2);
    assert_eq!(customer["display_name"], "Rider");
    assert_eq!(customer["first_taxi_id"], taxi["id"]);
    assert_eq!(customer["first_taxi"]["taxi_code"], code.to_uppercase());

    let response = client
        .get(format!("{}/taxis/{}/scans", BASE_URL, taxi["id"].as_str().unwrap()))
        .send()
        .await
        .expect("Failed to send request");
    let scans: Value = response.json().await.expect("Failed to parse response");
    let scans = scans.as_array().expect("Scans is not a list");
    assert_eq!(scans.len(), 2);
    assert!(scans.iter().all(|s| s["line_user_id"] == visitor.as_str()));
}

#[tokio::test]
#[ignore]
async fn test_registration_without_token_backfills_latest_scan() {
    let client = admin_client().await;
    let code = unique_code("recent");
    let taxi = create_taxi(&client, &code).await;
    let visitor = format!("U{}", Uuid::new_v4().simple());

    assert_eq!(scan(&client, &code).await.status(), StatusCode::FOUND);
    assert_eq!(scan(&client, &code).await.status(), StatusCode::FOUND);

    // The mini-app sends an empty token when the query parameter is missing
    let response = client
        .post(format!("{}/liff/register", BASE_URL))
        .json(&json!({ "lineUserId": visitor, "taxiCode": code, "scanToken": "" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["isNewCustomer"], true);

    let response = client
        .get(format!("{}/taxis/{}/scans", BASE_URL, taxi["id"].as_str().unwrap()))
        .send()
        .await
        .expect("Failed to send request");
    let scans: Value = response.json().await.expect("Failed to parse response");
    let scans = scans.as_array().expect("Scans is not a list");

    // Newest first: only the latest anonymous scan is claimed
    assert_eq!(scans.len(), 2);
    assert_eq!(scans[0]["line_user_id"], visitor.as_str());
    assert!(scans[1]["line_user_id"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_registration_requires_visitor_id() {
    let response = client()
        .post(format!("{}/liff/register", BASE_URL))
        .json(&json!({ "displayName": "Nobody" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_purchase_tagging() {
    let client = admin_client().await;
    let visitor = format!("U{}", Uuid::new_v4().simple());

    client
        .post(format!("{}/liff/register", BASE_URL))
        .json(&json!({ "visitorId": visitor }))
        .send()
        .await
        .expect("Failed to send request");

    let response = client
        .put(format!("{}/customers/{}", BASE_URL, visitor))
        .json(&json!({ "has_purchased": true, "purchase_note": "Tour package" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .put(format!("{}/customers/{}", BASE_URL, visitor))
        .json(&json!({ "has_purchased": true }))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["customer"]["has_purchased"], true);
    assert_eq!(body["customer"]["purchase_note"], "Tour package");

    let response = client
        .get(format!("{}/customers?purchased=true", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let customers = body["customers"].as_array().expect("Customers is not a list");
    assert!(customers.iter().all(|c| c["has_purchased"] == true));
    assert!(customers.iter().any(|c| c["line_user_id"] == visitor.as_str()));

    // Un-marking keeps the note
    let response = client
        .put(format!("{}/customers/{}", BASE_URL, visitor))
        .json(&json!({ "has_purchased": false }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["customer"]["has_purchased"], false);
    assert_eq!(body["customer"]["purchase_note"], "Tour package");

    let response = client
        .get(format!("{}/customers?purchased=true", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let customers = body["customers"].as_array().expect("Customers is not a list");
    assert!(!customers.iter().any(|c| c["line_user_id"] == visitor.as_str()));

    let response = client
        .put(format!("{}/customers/{}", BASE_URL, visitor))
        .json(&json!({ "purchase_note": null }))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["customer"]["purchase_note"].is_null());

    let response = client
        .put(format!("{}/customers/U-missing-{}", BASE_URL, Uuid::new_v4().simple()))
        .json(&json!({ "has_purchased": true }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_stats_shape() {
    let client = admin_client().await;

    let body: Value = client
        .get(format!("{}/stats", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["stats"].as_object().map(|o| o.len()), Some(6));
    assert!(body["stats"]["conversionRate"].is_string());
    assert!(body["scansByDay"].is_object());
    assert!(body["topTaxis"].as_array().map(|t| t.len() <= 10).unwrap_or(false));
}

#[tokio::test]
#[ignore]
async fn test_stats_are_read_only() {
    let client = admin_client().await;

    async fn fetch(client: &Client) -> Value {
        client
            .get(format!("{}/stats", BASE_URL))
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse response")
    }

    // Concurrent tests may write between two reads
    let mut identical = false;
    for _ in 0..5 {
        let first = fetch(&client).await;
        let second = fetch(&client).await;
        if first == second {
            identical = true;
            break;
        }
    }
    assert!(identical, "Two consecutive stats reads never matched");
}
