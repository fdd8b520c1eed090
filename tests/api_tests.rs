//! API integration tests
//!
//! Run against a live server with a clean database:
//! cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an authenticated token
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Helper to create a book and return its JSON
async fn create_book(client: &Client, token: &str, isbn: &str, total_copies: i64) -> Value {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Test Book",
            "author": "Test Author",
            "isbn": isbn,
            "total_copies": total_copies
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
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
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_create_book_forces_available_copies() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    // available_copies is server-computed; sending it must be rejected
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Sneaky Book",
            "author": "Nobody",
            "isbn": "9780000000100",
            "total_copies": 3,
            "available_copies": 99
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let book = create_book(&client, &token, "9780000000101", 3).await;
    assert_eq!(book["available_copies"], 3);
    assert_eq!(book["total_copies"], 3);

    let book_id = book["id"].as_i64().expect("No book ID");
    let _ = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_total_copies_change_adjusts_available() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let book = create_book(&client, &token, "9780000000102", 2).await;
    let book_id = book["id"].as_i64().expect("No book ID");

    // Grow: +3 copies frees 3 more
    let response = client
        .put(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "total_copies": 5 }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["available_copies"], 5);

    // Shrink below available: clamp to the new total
    let response = client
        .put(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "total_copies": 1 }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["available_copies"], 1);

    let _ = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_borrow_and_return_flow() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let book = create_book(&client, &token, "9780000000103", 2).await;
    let book_id = book["id"].as_i64().expect("No book ID");

    // Borrow: decrement and 7-day due date
    let response = client
        .post(format!("{}/borrowings", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "book_id": book_id,
            "borrower_name": "Flow Tester",
            "borrower_email": "flow@example.com"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let borrowing: Value = response.json().await.expect("Failed to parse response");
    let borrowing_id = borrowing["id"].as_i64().expect("No borrowing ID");
    assert_eq!(borrowing["book"]["available_copies"], 1);
    assert!(borrowing["date_due"].is_string());
    assert!(borrowing["date_returned"].is_null());

    // Return on time: no fine, copy back on the shelf
    let response = client
        .put(format!("{}/borrowings/{}", BASE_URL, borrowing_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "date_returned": chrono_now() }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let returned: Value = response.json().await.expect("Failed to parse response");
    let fine: f64 = returned["fine_amount"]
        .as_str()
        .expect("fine_amount not a string")
        .parse()
        .expect("fine_amount not numeric");
    assert_eq!(fine, 0.0);
    assert_eq!(returned["book"]["available_copies"], 2);

    // Second return attempt is rejected
    let response = client
        .put(format!("{}/borrowings/{}", BASE_URL, borrowing_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "date_returned": chrono_now() }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let _ = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_update_other_borrowing_fields_rejected() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let book = create_book(&client, &token, "9780000000104", 1).await;
    let book_id = book["id"].as_i64().expect("No book ID");

    let response = client
        .post(format!("{}/borrowings", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "book_id": book_id,
            "borrower_name": "Field Tester"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let borrowing: Value = response.json().await.expect("Failed to parse response");
    let borrowing_id = borrowing["id"].as_i64().expect("No borrowing ID");

    // Touching anything but date_returned is not allowed
    let response = client
        .put(format!("{}/borrowings/{}", BASE_URL, borrowing_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "fine_amount": "0" }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_client_error());

    let _ = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_borrowing_without_copies_rejected() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let book = create_book(&client, &token, "9780000000105", 1).await;
    let book_id = book["id"].as_i64().expect("No book ID");

    let borrow = |name: &str| {
        let client = client.clone();
        let token = token.clone();
        let name = name.to_string();
        async move {
            client
                .post(format!("{}/borrowings", BASE_URL))
                .header("Authorization", format!("Bearer {}", token))
                .json(&json!({ "book_id": book_id, "borrower_name": name }))
                .send()
                .await
                .expect("Failed to send request")
        }
    };

    assert_eq!(borrow("First Borrower").await.status(), 201);
    // No copies left
    assert_eq!(borrow("Second Borrower").await.status(), 400);

    let _ = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_borrower_get_or_create() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let book = create_book(&client, &token, "9780000000106", 5).await;
    let book_id = book["id"].as_i64().expect("No book ID");

    // First borrowing creates the borrower with contact details
    let response = client
        .post(format!("{}/borrowings", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "book_id": book_id,
            "borrower_name": "Recurring Reader",
            "borrower_email": "first@example.com"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let first: Value = response.json().await.expect("Failed to parse response");
    let borrower_id = first["borrower"]["id"].as_i64().expect("No borrower ID");
    assert_eq!(first["borrower"]["email"], "first@example.com");

    // Second borrowing by the same name reuses the borrower,
    // without overwriting the stored contact details
    let response = client
        .post(format!("{}/borrowings", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "book_id": book_id,
            "borrower_name": "Recurring Reader",
            "borrower_email": "second@example.com"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let second: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(second["borrower"]["id"].as_i64(), Some(borrower_id));
    assert_eq!(second["borrower"]["email"], "first@example.com");

    let _ = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_borrowing_requires_borrower_identification() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let book = create_book(&client, &token, "9780000000107", 1).await;
    let book_id = book["id"].as_i64().expect("No book ID");

    let response = client
        .post(format!("{}/borrowings", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["field"], "borrower_name");

    let _ = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_book_search() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/books?search=test&page=1&per_page=10", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
}

fn chrono_now() -> String {
    chrono::Utc::now().to_rfc3339()
}
