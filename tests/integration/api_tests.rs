//! API integration tests
//!
//! Require a running server with a seeded administrator (admin/admin):
//! `create-admin --password admin && cargo test -- --ignored`

use chrono::{Duration, Utc};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an authenticated client
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

fn unique(prefix: &str) -> String {
    format!("{} {}", prefix, Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

async fn create_group(client: &Client, token: &str) -> i64 {
    let response = client
        .post(format!("{}/groups", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "name": unique("Watercolor"),
            "weekdays": "MONDAY,THURSDAY",
            "startTime": "17:00",
            "endTime": "18:30",
            "price": "4500.00"
        }))
        .send()
        .await
        .expect("Failed to create group");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    body["id"].as_i64().unwrap()
}

async fn create_customer(client: &Client, token: &str, group_id: i64) -> i64 {
    let response = client
        .post(format!("{}/customers", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "firstName": "Anna",
            "lastName": unique("Petrova"),
            "phoneNumber": "+7 900 123-45-67",
            "dateOfBirth": "2012-04-02",
            "groupId": group_id
        }))
        .send()
        .await
        .expect("Failed to create customer");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    body["id"].as_i64().unwrap()
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
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cookie.starts_with("auth-token="));
    assert!(cookie.contains("HttpOnly"));

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["tokenType"], "Bearer");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid username or password");
}

#[tokio::test]
#[ignore]
async fn test_cookie_authenticates() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Cookie", format!("auth-token={}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let forged = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Cookie", "auth-token=anything")
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_groups_are_public() {
    let client = Client::new();

    let response = client
        .get(format!("{}/groups", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.json::<Value>().await.unwrap().is_array());
}

#[tokio::test]
#[ignore]
async fn test_group_with_three_weekdays_rejected() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/groups", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Too busy",
            "weekdays": "MONDAY,WEDNESDAY,FRIDAY",
            "startTime": "10:00",
            "endTime": "11:00",
            "price": "1000"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_group_details_list_members() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let group_id = create_group(&client, &token).await;
    let customer_id = create_customer(&client, &token, group_id).await;

    let body: Value = client
        .get(format!("{}/groups/{}", BASE_URL, group_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["weekdayNames"], json!(["Понедельник", "Четверг"]));
    let members = body["customers"].as_array().unwrap();
    assert!(members.iter().any(|c| c["id"].as_i64() == Some(customer_id)));

    // still referenced by the customer
    let response = client
        .delete(format!("{}/groups/{}", BASE_URL, group_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        format!("Group {} still has customers or attendance records", group_id)
    );
}

#[tokio::test]
#[ignore]
async fn test_batch_attendance_updates_existing_record() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let group_id = create_group(&client, &token).await;
    let first = create_customer(&client, &token, group_id).await;
    let second = create_customer(&client, &token, group_id).await;
    let third = create_customer(&client, &token, group_id).await;

    let response = client
        .post(format!("{}/attendances", BASE_URL))
        .bearer_auth(&token)
        .json(&json!([
            { "customerId": first, "groupId": group_id, "date": "2031-03-03", "status": "ABSENT" }
        ]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .post(format!("{}/attendances", BASE_URL))
        .bearer_auth(&token)
        .json(&json!([
            { "customerId": first, "groupId": group_id, "date": "2031-03-03", "status": "PRESENT" },
            { "customerId": second, "groupId": group_id, "date": "2031-03-03", "isPresent": true },
            { "customerId": third, "groupId": group_id, "date": "2031-03-03", "status": "EXCUSED" }
        ]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    let saved = body["saved"].as_array().unwrap();
    assert_eq!(saved.len(), 3);
    assert_eq!(saved.iter().filter(|s| s["created"] == false).count(), 1);
    assert_eq!(saved.iter().filter(|s| s["created"] == true).count(), 2);
    assert_eq!(saved[0]["status"], "PRESENT");
    assert_eq!(saved[0]["isPresent"], true);

    let listed: Value = client
        .get(format!(
            "{}/attendances?customerId={}&month=3&year=2031",
            BASE_URL, first
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_batch_attendance_partial_failure() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let group_id = create_group(&client, &token).await;
    let customer_id = create_customer(&client, &token, group_id).await;

    let response = client
        .post(format!("{}/attendances", BASE_URL))
        .bearer_auth(&token)
        .json(&json!([
            { "customerId": customer_id, "groupId": group_id, "date": "2031-04-07", "status": "PRESENT" },
            { "customerId": i32::MAX, "groupId": group_id, "date": "2031-04-07", "status": "PRESENT" },
            { "customerId": customer_id, "groupId": group_id, "date": "2031-04-10" }
        ]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::MULTI_STATUS);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["saved"].as_array().unwrap().len(), 1);
    let failed = body["failed"].as_array().unwrap();
    assert_eq!(failed.len(), 2);
    assert_eq!(failed[0]["index"], 1);
    assert_eq!(failed[1]["index"], 2);
}

#[tokio::test]
#[ignore]
async fn test_overdue_after_seven_classes_and_payment_keeps_history() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let group_id = create_group(&client, &token).await;
    let customer_id = create_customer(&client, &token, group_id).await;

    let start = Utc::now().date_naive() + Duration::days(1);
    let records: Vec<Value> = (0..7)
        .map(|i| {
            json!({
                "customerId": customer_id,
                "groupId": group_id,
                "date": (start + Duration::days(i)).to_string(),
                "status": "PRESENT"
            })
        })
        .collect();
    let response = client
        .post(format!("{}/attendances", BASE_URL))
        .bearer_auth(&token)
        .json(&records)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let as_of = (start + Duration::days(10)).format("%Y-%m-%dT00:00:00Z");
    let customer: Value = client
        .get(format!("{}/customers/{}?asOf={}", BASE_URL, customer_id, as_of))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(customer["attendanceCount"], 7);
    assert_eq!(customer["overdue"], true);
    let age = customer["age"].as_str().unwrap();
    assert!(["год", "года", "лет"].iter().any(|noun| age.ends_with(noun)));

    let overdue: Value = client
        .get(format!("{}/customers/overdue?asOf={}", BASE_URL, as_of))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(overdue
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c["id"].as_i64() == Some(customer_id)));

    let paid: Value = client
        .patch(format!("{}/customers/{}", BASE_URL, customer_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(paid["attendanceCount"], 0);
    assert_eq!(paid["overdue"], false);

    let history: Value = client
        .get(format!("{}/attendances?customerId={}", BASE_URL, customer_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history.as_array().unwrap().len(), 7);
}

#[tokio::test]
#[ignore]
async fn test_delete_customer_removes_attendance() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let group_id = create_group(&client, &token).await;
    let customer_id = create_customer(&client, &token, group_id).await;

    let body: Value = client
        .post(format!("{}/attendances", BASE_URL))
        .bearer_auth(&token)
        .json(&json!([
            { "customerId": customer_id, "groupId": group_id, "date": "2031-05-05", "status": "PRESENT" }
        ]))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let attendance_id = body["saved"][0]["id"].as_i64().unwrap();

    let response = client
        .delete(format!("{}/customers/{}", BASE_URL, customer_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .get(format!("{}/attendances/{}", BASE_URL, attendance_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
