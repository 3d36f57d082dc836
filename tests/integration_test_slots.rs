mod common;

use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use common::TestApp;

#[tokio::test]
async fn test_full_day_for_haircut() {
    let app = TestApp::new().await;
    let haircut = app.service_id("Corte de Cabelo").await;

    let slots = app.slots("2030-03-05", &haircut).await;
    assert_eq!(slots.len(), 32);
    assert_eq!(slots.first().map(String::as_str), Some("09:00"));
    assert_eq!(slots.last().map(String::as_str), Some("18:15"));
    assert!(slots.contains(&"11:15".to_string()));
    assert!(!slots.contains(&"11:30".to_string()));
    assert!(!slots.contains(&"12:45".to_string()));
    assert!(slots.contains(&"13:00".to_string()));
}

#[tokio::test]
async fn test_today_skips_elapsed_starts() {
    let app = TestApp::new().await;
    let neckline = app.service_id("Pezinho").await;

    let slots = app.slots("2030-03-04", &neckline).await;
    assert_eq!(slots.first().map(String::as_str), Some("10:30"));
    assert_eq!(slots.len(), 30);
}

#[tokio::test]
async fn test_after_closing_today_is_empty() {
    let app = TestApp::at(Utc.with_ymd_and_hms(2030, 3, 4, 18, 50, 0).unwrap()).await;
    let beard = app.service_id("Barba").await;

    assert!(app.slots("2030-03-04", &beard).await.is_empty());
}

#[tokio::test]
async fn test_past_dates_offer_nothing() {
    let app = TestApp::new().await;
    let beard = app.service_id("Barba").await;

    assert!(app.slots("2030-03-03", &beard).await.is_empty());
}

#[tokio::test]
async fn test_response_echoes_query() {
    let app = TestApp::new().await;
    let beard = app.service_id("Barba").await;

    let (status, body) = app.request("GET", &format!("/api/slots?date=2030-03-05&serviceId={}", beard), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "2030-03-05");
    assert_eq!(body["serviceId"], beard.as_str());
}

#[tokio::test]
async fn test_bad_queries() {
    let app = TestApp::new().await;
    let beard = app.service_id("Barba").await;

    let (status, _) = app.request("GET", "/api/slots?date=2030-03-05", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.request("GET", &format!("/api/slots?date=05/03/2030&serviceId={}", beard), None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.request("GET", "/api/slots?date=2030-03-05&serviceId=missing", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
