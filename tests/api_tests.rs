//! API integration tests
//!
//! These run against a live server with a migrated database:
//! `cargo test -- --ignored`

use reqwest::Client;
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Unique suffix so repeated runs do not trip the uniqueness constraints
fn unique() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .subsec_nanos();
    format!("{:08x}", nanos)
}

async fn create_book(client: &Client, author: &str, name: &str, available: i64) -> i64 {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "author": author,
            "name": name,
            "available": available
        }))
        .send()
        .await
        .expect("Failed to send create book request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No book ID")
}

async fn create_user(client: &Client, username: &str, email: &str) -> i64 {
    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({
            "username": username,
            "email": email,
            "password": "passw0rd!"
        }))
        .send()
        .await
        .expect("Failed to send create user request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No user ID")
}

async fn book_available(client: &Client, book_id: i64) -> i64 {
    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send get book request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    body["available"].as_i64().expect("No available count")
}

async fn delete_entity(client: &Client, resource: &str, id: i64) {
    let _ = client
        .delete(format!("{}/{}/{}", BASE_URL, resource, id))
        .send()
        .await;
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
async fn test_create_duplicate_book_conflicts() {
    let client = Client::new();
    let name = format!("Duplicate {}", unique());

    let book_id = create_book(&client, "A. Writer", &name, 2).await;

    // Same (author, name) pair must be rejected
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "author": "A. Writer",
            "name": name,
            "available": 2
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["kind"], "DATA_CONSISTENCY");

    delete_entity(&client, "books", book_id).await;
}

#[tokio::test]
#[ignore]
async fn test_create_book_rejects_zero_copies() {
    let client = Client::new();

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "author": "A. Writer",
            "name": format!("Zero {}", unique()),
            "available": 0
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_get_missing_book_is_404() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books/999999999", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["kind"], "NOT_FOUND");
}

#[tokio::test]
#[ignore]
async fn test_partial_user_update_preserves_username() {
    let client = Client::new();
    let suffix = unique();
    let username = format!("us{}", &suffix[..6]);
    let user_id = create_user(&client, &username, &format!("{}@example.com", username)).await;

    // Only email supplied; username must be untouched
    let new_email = format!("new.{}@example.com", username);
    let response = client
        .patch(format!("{}/users/{}", BASE_URL, user_id))
        .json(&json!({ "email": new_email }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["username"], username.as_str());
    assert_eq!(body["email"], new_email.as_str());
    assert!(body.get("password").is_none());

    delete_entity(&client, "users", user_id).await;
}

#[tokio::test]
#[ignore]
async fn test_update_to_taken_email_conflicts() {
    let client = Client::new();
    let suffix = unique();
    let first = format!("ua{}", &suffix[..6]);
    let second = format!("ub{}", &suffix[..6]);
    let first_id = create_user(&client, &first, &format!("{}@example.com", first)).await;
    let second_id = create_user(&client, &second, &format!("{}@example.com", second)).await;

    let response = client
        .patch(format!("{}/users/{}", BASE_URL, second_id))
        .json(&json!({ "email": format!("{}@example.com", first) }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);

    delete_entity(&client, "users", first_id).await;
    delete_entity(&client, "users", second_id).await;
}

#[tokio::test]
#[ignore]
async fn test_issue_return_round_trip() {
    let client = Client::new();
    let suffix = unique();
    let user_id = create_user(
        &client,
        &format!("rt{}", &suffix[..6]),
        &format!("rt{}@example.com", &suffix[..6]),
    )
    .await;
    let book_id = create_book(&client, "A. Writer", &format!("Round Trip {}", suffix), 3).await;

    // Issue
    let response = client
        .post(format!("{}/users/{}/issue/{}", BASE_URL, user_id, book_id))
        .send()
        .await
        .expect("Failed to send issue request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let held: Vec<i64> = body["books"]
        .as_array()
        .expect("No books array")
        .iter()
        .map(|b| b["id"].as_i64().unwrap())
        .collect();
    assert!(held.contains(&book_id));
    assert_eq!(book_available(&client, book_id).await, 2);

    // Second issue of the same pair is rejected, state unchanged
    let response = client
        .post(format!("{}/users/{}/issue/{}", BASE_URL, user_id, book_id))
        .send()
        .await
        .expect("Failed to send issue request");
    assert_eq!(response.status(), 409);
    assert_eq!(book_available(&client, book_id).await, 2);

    // Return restores the pre-issue state
    let response = client
        .post(format!("{}/users/{}/return/{}", BASE_URL, user_id, book_id))
        .send()
        .await
        .expect("Failed to send return request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["books"].as_array().expect("No books array").is_empty());
    assert_eq!(book_available(&client, book_id).await, 3);

    delete_entity(&client, "books", book_id).await;
    delete_entity(&client, "users", user_id).await;
}

#[tokio::test]
#[ignore]
async fn test_return_never_issued_conflicts() {
    let client = Client::new();
    let suffix = unique();
    let user_id = create_user(
        &client,
        &format!("ni{}", &suffix[..6]),
        &format!("ni{}@example.com", &suffix[..6]),
    )
    .await;
    let book_id = create_book(&client, "A. Writer", &format!("Never Issued {}", suffix), 1).await;

    let response = client
        .post(format!("{}/users/{}/return/{}", BASE_URL, user_id, book_id))
        .send()
        .await
        .expect("Failed to send return request");

    assert_eq!(response.status(), 409);
    assert_eq!(book_available(&client, book_id).await, 1);

    delete_entity(&client, "books", book_id).await;
    delete_entity(&client, "users", user_id).await;
}

#[tokio::test]
#[ignore]
async fn test_last_copy_contention() {
    let client = Client::new();
    let suffix = unique();
    let first = create_user(
        &client,
        &format!("ca{}", &suffix[..6]),
        &format!("ca{}@example.com", &suffix[..6]),
    )
    .await;
    let second = create_user(
        &client,
        &format!("cb{}", &suffix[..6]),
        &format!("cb{}@example.com", &suffix[..6]),
    )
    .await;
    let book_id = create_book(&client, "A. Writer", &format!("Last Copy {}", suffix), 1).await;

    // First user takes the only copy
    let response = client
        .post(format!("{}/users/{}/issue/{}", BASE_URL, first, book_id))
        .send()
        .await
        .expect("Failed to send issue request");
    assert!(response.status().is_success());
    assert_eq!(book_available(&client, book_id).await, 0);

    // Second user cannot issue while no copies are left
    let response = client
        .post(format!("{}/users/{}/issue/{}", BASE_URL, second, book_id))
        .send()
        .await
        .expect("Failed to send issue request");
    assert_eq!(response.status(), 409);
    assert_eq!(book_available(&client, book_id).await, 0);

    // After the first user returns, the second succeeds
    let response = client
        .post(format!("{}/users/{}/return/{}", BASE_URL, first, book_id))
        .send()
        .await
        .expect("Failed to send return request");
    assert!(response.status().is_success());

    let response = client
        .post(format!("{}/users/{}/issue/{}", BASE_URL, second, book_id))
        .send()
        .await
        .expect("Failed to send issue request");
    assert!(response.status().is_success());
    assert_eq!(book_available(&client, book_id).await, 0);

    // Cleanup
    let _ = client
        .post(format!("{}/users/{}/return/{}", BASE_URL, second, book_id))
        .send()
        .await;
    delete_entity(&client, "books", book_id).await;
    delete_entity(&client, "users", first).await;
    delete_entity(&client, "users", second).await;
}

#[tokio::test]
#[ignore]
async fn test_delete_guards_active_lending() {
    let client = Client::new();
    let suffix = unique();
    let user_id = create_user(
        &client,
        &format!("dg{}", &suffix[..6]),
        &format!("dg{}@example.com", &suffix[..6]),
    )
    .await;
    let book_id = create_book(&client, "A. Writer", &format!("Guarded {}", suffix), 1).await;

    let response = client
        .post(format!("{}/users/{}/issue/{}", BASE_URL, user_id, book_id))
        .send()
        .await
        .expect("Failed to send issue request");
    assert!(response.status().is_success());

    // Neither side of an active lending relation can be deleted
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send delete request");
    assert_eq!(response.status(), 409);

    let response = client
        .delete(format!("{}/users/{}", BASE_URL, user_id))
        .send()
        .await
        .expect("Failed to send delete request");
    assert_eq!(response.status(), 409);

    // Both records are still there
    assert_eq!(book_available(&client, book_id).await, 0);

    // After the return, deletes succeed
    let response = client
        .post(format!("{}/users/{}/return/{}", BASE_URL, user_id, book_id))
        .send()
        .await
        .expect("Failed to send return request");
    assert!(response.status().is_success());

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send delete request");
    assert_eq!(response.status(), 204);

    let response = client
        .delete(format!("{}/users/{}", BASE_URL, user_id))
        .send()
        .await
        .expect("Failed to send delete request");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_sorted_page_out_of_range_is_empty() {
    let client = Client::new();

    let response = client
        .get(format!(
            "{}/books?page=100000&size=50&sortBy=name&order=desc",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].as_array().expect("No items array").is_empty());
    assert!(body["total"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_extreme_page_number_is_empty() {
    let client = Client::new();

    // page * size exceeds i64; treated as past the end, not an error
    let response = client
        .get(format!(
            "{}/books?page=9223372036854775807&size=2",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].as_array().expect("No items array").is_empty());
}

#[tokio::test]
#[ignore]
async fn test_invalid_page_params_rejected() {
    let client = Client::new();

    let response = client
        .get(format!("{}/users?size=0", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}
