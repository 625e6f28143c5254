//! Employee endpoint tests against a mock backend.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use staffdesk_auth::session::{AuthClient, AuthenticatedClient, SessionContext};
use staffdesk_auth::token::{Claims, MemoryTokenStore};
use staffdesk_core::config::api::ApiConfig;
use staffdesk_core::config::session::SessionConfig;
use staffdesk_core::error::ErrorKind;
use staffdesk_employees::{Employee, EmployeeClient, EmployeeStatus};

fn mint_token(sub: &str, lifetime_secs: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: Some(sub.to_string()),
        roles: vec!["ROLE_USER".to_string()],
        iat: Some(now),
        exp: Some(now + lifetime_secs),
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"integration-test-secret"),
    )
    .expect("failed to mint test token")
}

/// Wires an [`EmployeeClient`] against the mock server with a valid
/// signed-in session, and returns it along with the bearer value every
/// request is expected to carry.
async fn signed_in_client(server: &MockServer) -> (EmployeeClient, String) {
    let token = mint_token("alice", 3600);
    let api = ApiConfig {
        base_url: server.uri(),
        ..ApiConfig::default()
    };
    let session = SessionConfig::default();
    let store = Arc::new(MemoryTokenStore::with_tokens(token.as_str(), None));
    let context = SessionContext::new(store, &session)
        .await
        .expect("failed to build session context");
    let auth =
        Arc::new(AuthClient::new(&api, &session, context).expect("failed to build auth client"));
    let http =
        Arc::new(AuthenticatedClient::new(&api, auth).expect("failed to build http client"));
    (EmployeeClient::new(&api, http), format!("Bearer {token}"))
}

#[tokio::test]
async fn test_list_decodes_the_wire_form_and_sends_the_bearer() {
    let server = MockServer::start().await;
    let (client, bearer) = signed_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/employee/all"))
        .and(header("Authorization", bearer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "name": "Grace Hopper",
                "email": "grace@example.com",
                "jobTitle": "Rear Admiral",
                "phone": "555-0001",
                "imageUrl": "https://img.example.com/grace.png",
                "employeeCode": "a1b2c3",
                "status": "approved"
            },
            {
                "id": 2,
                "name": "Ada Lovelace",
                "email": "ada@example.com",
                "jobTitle": "Analyst",
                "phone": "555-0002",
                "imageUrl": "https://img.example.com/ada.png"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let employees = client.list().await.unwrap();

    assert_eq!(employees.len(), 2);
    assert_eq!(employees[0].id, Some(1));
    assert_eq!(employees[0].job_title, "Rear Admiral");
    assert_eq!(employees[0].employee_code.as_deref(), Some("a1b2c3"));
    assert_eq!(employees[0].status, EmployeeStatus::Approved);
    // The second record is missing optional wire fields.
    assert_eq!(employees[1].employee_code, None);
    assert_eq!(employees[1].status, EmployeeStatus::Pending);
}

#[tokio::test]
async fn test_add_posts_the_camel_case_body_and_returns_the_saved_form() {
    let server = MockServer::start().await;
    let (client, _) = signed_in_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/employee/add"))
        .and(body_partial_json(json!({
            "name": "Grace Hopper",
            "jobTitle": "Rear Admiral",
            "imageUrl": "https://img.example.com/grace.png"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "name": "Grace Hopper",
            "email": "grace@example.com",
            "jobTitle": "Rear Admiral",
            "phone": "555-0001",
            "imageUrl": "https://img.example.com/grace.png",
            "employeeCode": "f4c3b0",
            "status": "pending"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let draft = Employee::new(
        "Grace Hopper",
        "grace@example.com",
        "Rear Admiral",
        "555-0001",
        "https://img.example.com/grace.png",
    );
    assert!(!draft.is_saved());

    let saved = client.add(&draft).await.unwrap();
    assert!(saved.is_saved());
    assert_eq!(saved.id, Some(42));
    assert_eq!(saved.employee_code.as_deref(), Some("f4c3b0"));
}

#[tokio::test]
async fn test_update_rejects_records_that_were_never_saved() {
    let server = MockServer::start().await;
    let (client, _) = signed_in_client(&server).await;

    Mock::given(method("PUT"))
        .and(path("/employee/update"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let draft = Employee::new("Nobody", "n@example.com", "Ghost", "555-0000", "");
    let err = client.update(&draft).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Input);
}

#[tokio::test]
async fn test_delete_targets_the_record_path() {
    let server = MockServer::start().await;
    let (client, bearer) = signed_in_client(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/employee/delete/7"))
        .and(header("Authorization", bearer.as_str()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.delete(7).await.unwrap();
}

#[tokio::test]
async fn test_missing_record_maps_to_not_found_with_the_backend_message() {
    let server = MockServer::start().await;
    let (client, _) = signed_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/employee/find/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Employee by id 99 was not found"
        })))
        .mount(&server)
        .await;

    let err = client.find(99).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(err.message, "Employee by id 99 was not found");
}

#[tokio::test]
async fn test_forbidden_write_maps_to_access_denied() {
    let server = MockServer::start().await;
    let (client, _) = signed_in_client(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/employee/delete/1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "Admin role required"
        })))
        .mount(&server)
        .await;

    let err = client.delete(1).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccessDenied);
    assert_eq!(err.message, "Admin role required");
}
