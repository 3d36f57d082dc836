mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_seeded_catalogue_is_listed_by_name() {
    let app = TestApp::new().await;

    let (status, body) = app.request("GET", "/api/services", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body.as_array().unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Barba", "Corte de Cabelo", "Corte e Barba", "Pezinho"]);

    let haircut = &body[1];
    assert_eq!(haircut["price"], json!(40.0));
    assert_eq!(haircut["duration"], json!(45));
    assert!(haircut.get("price_cents").is_none());
}

#[tokio::test]
async fn test_service_writes_require_admin_and_csrf() {
    let app = TestApp::new().await;
    let payload = json!({"name": "Sobrancelha", "price": 20.0, "duration": 15});

    let (status, _) = app.request("POST", "/api/services", Some(payload.clone()), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut auth = app.login().await;
    auth.csrf_token = "forged".to_string();
    let (status, _) = app.request("POST", "/api/services", Some(payload), Some(&auth)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_service_crud() {
    let app = TestApp::new().await;
    let auth = app.login().await;

    let (status, created) = app.request(
        "POST",
        "/api/services",
        Some(json!({"name": "  Sobrancelha  ", "price": 19.99, "duration": 20})),
        Some(&auth),
    ).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Sobrancelha");
    assert_eq!(created["price"], json!(19.99));
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = app.request(
        "PUT",
        &format!("/api/services/{}", id),
        Some(json!({"name": "Sobrancelha Design", "price": 25, "duration": 30})),
        Some(&auth),
    ).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["duration"], json!(30));

    let (_, list) = app.request("GET", "/api/services", None, None).await;
    assert_eq!(list.as_array().unwrap().len(), 5);

    let (status, _) = app.request("DELETE", &format!("/api/services/{}", id), None, Some(&auth)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.request("DELETE", &format!("/api/services/{}", id), None, Some(&auth)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_unknown_service_is_not_found() {
    let app = TestApp::new().await;
    let auth = app.login().await;

    let (status, body) = app.request(
        "PUT",
        "/api/services/does-not-exist",
        Some(json!({"name": "Ghost", "price": 1, "duration": 15})),
        Some(&auth),
    ).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Service not found");
}

#[tokio::test]
async fn test_invalid_services_are_rejected() {
    let app = TestApp::new().await;
    let auth = app.login().await;

    let cases = [
        json!({"name": "   ", "price": 10, "duration": 15}),
        json!({"name": "Negative", "price": -5, "duration": 15}),
        json!({"name": "Instant", "price": 10, "duration": 0}),
        json!({"name": "Forever", "price": 10, "duration": 1441}),
    ];

    for payload in cases {
        let (status, body) = app.request("POST", "/api/services", Some(payload.clone()), Some(&auth)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {}", payload);
        assert!(body["error"].is_string());
    }
}
