//! API integration tests
//!
//! These run against a live server with the seed admin account
//! (login "admin", password "admin", all permissions).

use reqwest::{redirect::Policy, Client};
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

/// Client that surfaces redirects instead of following them
fn manual_redirect_client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
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
async fn test_index_counts_visits_per_session() {
    let client = Client::new();

    let first: Value = client
        .get(format!("{}/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let session_id = first["session_id"].as_str().expect("No session id");
    assert!(first["num_books"].is_number());
    assert!(first["num_copies_available"].is_number());

    let second: Value = client
        .get(format!("{}/", BASE_URL))
        .header("x-session-id", session_id)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(
        second["num_visits"].as_i64().unwrap(),
        first["num_visits"].as_i64().unwrap() + 1
    );
    assert_eq!(second["session_id"], first["session_id"]);
}

#[tokio::test]
#[ignore]
async fn test_anonymous_request_redirects_to_login_with_next() {
    let client = manual_redirect_client();

    let response = client
        .get(format!("{}/loans/mine", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 303);
    let location = response
        .headers()
        .get("location")
        .expect("No location header")
        .to_str()
        .expect("Bad location header");
    assert!(location.starts_with("/api/v1/auth/login?next="));
    assert!(location.ends_with("/loans/mine"));
}

#[tokio::test]
#[ignore]
async fn test_book_listing_is_paginated() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert_eq!(body["per_page"], 2);
    assert!(body["items"].as_array().unwrap().len() <= 2);
}

#[tokio::test]
#[ignore]
async fn test_author_listing_pagination() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    // Seed enough authors to spill onto a second page
    for i in 0..13 {
        client
            .post(format!("{}/authors", BASE_URL))
            .header("Authorization", format!("Bearer {}", token))
            .json(&json!({
                "first_name": format!("First{}", i),
                "last_name": format!("Pagination{:02}", i)
            }))
            .send()
            .await
            .expect("Failed to send request");
    }

    let page1: Value = client
        .get(format!("{}/authors?page=1", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(page1["items"].as_array().unwrap().len(), 10);
    assert_eq!(page1["is_paginated"], true);

    let page2: Value = client
        .get(format!("{}/authors?page=2", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert!(!page2["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_create_book_requires_permission() {
    let client = Client::new();

    // Anonymous: redirected to login
    let anonymous = manual_redirect_client()
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "Nope",
            "summary": "Nope",
            "isbn": "9780000000001"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(anonymous.status(), 303);

    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "The Art of Testing",
            "summary": "A book about tests",
            "isbn": "9780000000002"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
}

#[tokio::test]
#[ignore]
async fn test_create_book_rejects_bad_isbn() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Short ISBN",
            "summary": "Should fail",
            "isbn": "123"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "ISBN must be exactly 13 characters");
    assert_eq!(body["field"], "isbn");
}

#[tokio::test]
#[ignore]
async fn test_duplicate_genre_rejected_case_insensitively() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    client
        .post(format!("{}/genres", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "name": "Cyberpunk" }))
        .send()
        .await
        .expect("Failed to send request");

    let response = client
        .post(format!("{}/genres", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "name": "CYBERPUNK" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Genre already exists (case insensitive match)");
}

#[tokio::test]
#[ignore]
async fn test_loan_and_renewal_flow() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    // Book with one copy
    let book: Value = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Renewable Book",
            "summary": "For the renewal flow",
            "isbn": "9780000000099"
        }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let copy: Value = client
        .post(format!("{}/books/{}/copies", BASE_URL, book["id"]))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "imprint": "First edition, 2020", "status": "available" }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let copy_id = copy["id"].as_str().expect("No copy id");

    // Lend it to the admin account itself
    let me: Value = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let loaned = client
        .post(format!("{}/copies/{}/loan", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "borrower_id": me["id"] }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(loaned.status().is_success());

    // The copy shows up in the borrower's listing
    let mine: Value = client
        .get(format!("{}/loans/mine", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let ids: Vec<&str> = mine["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["id"].as_str())
        .collect();
    assert!(ids.contains(&copy_id));

    // Renewal form proposes a date
    let form: Value = client
        .get(format!("{}/copies/{}/renew", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(form["proposed_renewal_date"].is_string());

    // Renewal in the past is rejected with the exact message
    let rejected = client
        .post(format!("{}/copies/{}/renew", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "renewal_date": "2000-01-01" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(rejected.status(), 400);
    let body: Value = rejected.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Invalid date - renewal in past");

    // A valid renewal leaves for the all-borrowed listing
    let proposed = form["proposed_renewal_date"].as_str().unwrap();
    let renewed = manual_redirect_client()
        .post(format!("{}/copies/{}/renew", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "renewal_date": proposed }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(renewed.status(), 303);
    assert_eq!(
        renewed.headers().get("location").unwrap().to_str().unwrap(),
        "/api/v1/loans/borrowed"
    );

    // Return it: status goes back to available
    let returned: Value = client
        .post(format!("{}/copies/{}/return", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(returned["status"], "available");
    assert!(returned["borrower_id"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_delete_author_with_books_is_restricted() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let author: Value = client
        .post(format!("{}/authors", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "first_name": "Busy", "last_name": "Author" }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Attached Book",
            "summary": "Keeps its author alive",
            "isbn": "9780000000150",
            "author_id": author["id"]
        }))
        .send()
        .await
        .expect("Failed to send request");

    let response = client
        .post(format!("{}/authors/{}/delete", BASE_URL, author["id"]))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_delete_author_confirmation_flow() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let author: Value = client
        .post(format!("{}/authors", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "first_name": "Fleeting", "last_name": "Author" }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let id = author["id"].as_i64().expect("No author id");

    // Confirmation step
    let confirmation: Value = client
        .get(format!("{}/authors/{}/delete", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(
        confirmation["confirm_path"],
        format!("/api/v1/authors/{}/delete", id)
    );

    // Confirmed delete leaves for the listing
    let deleted = manual_redirect_client()
        .post(format!("{}/authors/{}/delete", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(deleted.status(), 303);
    assert_eq!(
        deleted.headers().get("location").unwrap().to_str().unwrap(),
        "/api/v1/authors"
    );

    // Gone now
    let lookup = client
        .get(format!("{}/authors/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(lookup.status(), 404);
}
