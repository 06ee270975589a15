//! API integration tests
//!
//! These run against a live server seeded with the standard fixtures
//! (admin token, employees 1-3, officer rights for employee 2).

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Tokens are minted by the identity provider stub in dev environments
async fn get_token(client: &Client, role: &str) -> String {
    let response = client
        .post("http://localhost:8081/tokens")
        .json(&json!({ "role": role }))
        .send()
        .await
        .expect("Failed to request token");

    let body: Value = response.json().await.expect("Failed to parse token response");
    body["token"].as_str().expect("No token in response").to_string()
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
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/employees", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_draft_only_editable_before_submission() {
    let client = Client::new();
    let token = get_token(&client, "applicant").await;

    // Draft with everything missing is fine
    let response = client
        .post(format!("{}/email-applications", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.unwrap();
    let id = body["id"].as_i64().unwrap();
    assert_eq!(body["status"], "draft");

    // Submitting without a purpose fails field validation, status unchanged
    let response = client
        .post(format!("{}/email-applications/{}/submit", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "service_status": "permanent",
            "proposed_email": "test.applicant@agency.example",
            "supporting_officer_id": 2,
            "certification_accepted": true
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("purpose"));

    let response = client
        .get(format!("{}/email-applications/{}", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "draft");

    // No approval row was opened by the failed submission
    let response = client
        .get(format!("{}/email-applications/{}/approvals", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    let approvals: Value = response.json().await.unwrap();
    assert_eq!(approvals.as_array().unwrap().len(), 0);
}

#[tokio::test]
#[ignore]
async fn test_loan_submission_requires_confirmation_and_items() {
    let client = Client::new();
    let token = get_token(&client, "applicant").await;

    let response = client
        .post(format!("{}/loan-applications", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "purpose": "Field audit visit",
            "location": "Branch office",
            "items": [
                { "equipment_type": "laptop", "quantity_requested": 1 },
                { "equipment_type": "projector", "quantity_requested": 1 }
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.unwrap();
    let id = body["id"].as_i64().unwrap();

    let submit_body = json!({
        "purpose": "Field audit visit",
        "location": "Branch office",
        "loan_start_date": "2026-03-02T08:00:00Z",
        "loan_end_date": "2026-03-06T17:00:00Z",
        "supporting_officer_id": 2,
        "items": [
            { "equipment_type": "laptop", "quantity_requested": 1 },
            { "equipment_type": "projector", "quantity_requested": 1 }
        ],
        "applicant_confirmation": false
    });

    // Confirmation flag still false: validation error
    let response = client
        .post(format!("{}/loan-applications/{}/submit", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&submit_body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    // With the confirmation set, the application enters the workflow
    let mut confirmed = submit_body.clone();
    confirmed["applicant_confirmation"] = json!(true);
    let response = client
        .post(format!("{}/loan-applications/{}/submit", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&confirmed)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "pending_support");

    // Exactly one pending approval at the first stage
    let response = client
        .get(format!("{}/loan-applications/{}/approvals", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    let approvals: Value = response.json().await.unwrap();
    let approvals = approvals.as_array().unwrap();
    assert_eq!(approvals.len(), 1);
    assert_eq!(approvals[0]["stage"], "support_review");
    assert_eq!(approvals[0]["status"], "pending");

    // Submitted applications are no longer editable
    let response = client
        .put(format!("{}/loan-applications/{}", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "purpose": "Changed my mind" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore]
async fn test_issue_and_return_cycle() {
    let client = Client::new();
    let applicant = get_token(&client, "applicant").await;
    let officer = get_token(&client, "officer").await;
    let admin = get_token(&client, "admin").await;

    // Draft -> submit
    let response = client
        .post(format!("{}/loan-applications", BASE_URL))
        .header("Authorization", format!("Bearer {}", applicant))
        .json(&json!({ "items": [{ "equipment_type": "laptop" }] }))
        .send()
        .await
        .unwrap();
    let app: Value = response.json().await.unwrap();
    let app_id = app["id"].as_i64().unwrap();

    let response = client
        .post(format!("{}/loan-applications/{}/submit", BASE_URL, app_id))
        .header("Authorization", format!("Bearer {}", applicant))
        .json(&json!({
            "purpose": "Training session",
            "location": "HQ lab",
            "loan_start_date": "2026-03-02T08:00:00Z",
            "loan_end_date": "2026-03-06T17:00:00Z",
            "supporting_officer_id": 2,
            "items": [{ "equipment_type": "laptop" }],
            "applicant_confirmation": true
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // Single-stage loan approval
    let response = client
        .post(format!("{}/loan-applications/{}/decision", BASE_URL, app_id))
        .header("Authorization", format!("Bearer {}", officer))
        .json(&json!({ "decision": "approved", "comments": "OK for training" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("{}/loan-applications/{}", BASE_URL, app_id))
        .header("Authorization", format!("Bearer {}", applicant))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["application"]["status"], "approved");

    // Create a dedicated asset and issue it
    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({
            "asset_tag": format!("IT-TEST-{}", app_id),
            "equipment_type": "laptop"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let equipment: Value = response.json().await.unwrap();
    let equipment_id = equipment["id"].as_i64().unwrap();
    assert_eq!(equipment["availability_status"], "available");

    let response = client
        .post(format!("{}/loan-applications/{}/issue", BASE_URL, app_id))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({
            "equipment_id": equipment_id,
            "accessories": ["charger", "bag"]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let transaction: Value = response.json().await.unwrap();
    let transaction_id = transaction["id"].as_i64().unwrap();
    assert_eq!(transaction["status"], "issued");

    let response = client
        .get(format!("{}/equipment/{}", BASE_URL, equipment_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["availability_status"], "on_loan");

    // Issuing the same unit again must fail: it is no longer available
    let response = client
        .post(format!("{}/loan-applications/{}/issue", BASE_URL, app_id))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "equipment_id": equipment_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);

    // Damaged return sends the asset to maintenance and settles the loan
    let response = client
        .post(format!("{}/loan-transactions/{}/return", BASE_URL, transaction_id))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({
            "return_status": "damaged",
            "equipment_status_on_return": "under_maintenance",
            "notes": "Cracked hinge"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "damaged");

    let response = client
        .get(format!("{}/equipment/{}", BASE_URL, equipment_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["availability_status"], "under_maintenance");
    assert_eq!(body["condition_status"], "minor_damage");

    let response = client
        .get(format!("{}/loan-applications/{}", BASE_URL, app_id))
        .header("Authorization", format!("Bearer {}", applicant))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["application"]["status"], "returned");

    // Second return of the same transaction must fail and change nothing
    let response = client
        .post(format!("{}/loan-transactions/{}/return", BASE_URL, transaction_id))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({
            "return_status": "returned",
            "equipment_status_on_return": "available"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);

    let response = client
        .get(format!("{}/equipment/{}", BASE_URL, equipment_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["availability_status"], "under_maintenance");
}

#[tokio::test]
#[ignore]
async fn test_email_rejection_is_terminal() {
    let client = Client::new();
    let applicant = get_token(&client, "applicant").await;
    let officer = get_token(&client, "officer").await;

    let response = client
        .post(format!("{}/email-applications", BASE_URL))
        .header("Authorization", format!("Bearer {}", applicant))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    let app: Value = response.json().await.unwrap();
    let id = app["id"].as_i64().unwrap();

    let response = client
        .post(format!("{}/email-applications/{}/submit", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", applicant))
        .json(&json!({
            "purpose": "New staff mailbox",
            "service_status": "contract",
            "proposed_email": "new.staff@agency.example",
            "supporting_officer_id": 2,
            "certification_accepted": true
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .post(format!("{}/email-applications/{}/decision", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", officer))
        .json(&json!({ "decision": "rejected", "comments": "Use the shared mailbox" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("{}/email-applications/{}", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", applicant))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["rejection_reason"], "Use the shared mailbox");

    // No further decision is accepted on a rejected application
    let response = client
        .post(format!("{}/email-applications/{}/decision", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", officer))
        .json(&json!({ "decision": "approved" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore]
async fn test_hourly_leave_window() {
    let client = Client::new();
    let token = get_token(&client, "applicant").await;

    // Hourly leave spanning two days is rejected
    let response = client
        .post(format!("{}/leave-requests", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "leave_type": "annual",
            "start_date": "2026-04-06",
            "end_date": "2026-04-07",
            "start_time": "09:00:00",
            "end_time": "12:00:00"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = client
        .post(format!("{}/leave-requests", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "leave_type": "annual",
            "start_date": "2026-04-06",
            "end_date": "2026-04-06",
            "start_time": "09:00:00",
            "end_time": "12:00:00"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "pending");
}
