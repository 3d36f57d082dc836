mod common;

use axum::http::StatusCode;
use common::{TestApp, NOTIFY_EMAIL};
use salon_booking::background::run_pending_jobs;

async fn job_statuses(app: &TestApp) -> Vec<(String, Option<String>)> {
    sqlx::query_as::<_, (String, Option<String>)>("SELECT status, error_message FROM jobs ORDER BY created_at")
        .fetch_all(&app.pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_booking_queues_confirmation() {
    let app = TestApp::new().await;
    let haircut = app.service_id("Corte de Cabelo").await;

    let (status, _) = app.book(&haircut, "2030-03-05", "09:30").await;
    assert_eq!(status, StatusCode::CREATED);

    assert_eq!(job_statuses(&app).await, vec![("PENDING".to_string(), None)]);
    assert!(app.sent_emails().is_empty());
}

#[tokio::test]
async fn test_confirmation_is_sent_with_invite() {
    let app = TestApp::new().await;
    let haircut = app.service_id("Corte de Cabelo").await;
    app.book(&haircut, "2030-03-05", "09:30").await;

    let processed = run_pending_jobs(&app.state).await.unwrap();
    assert_eq!(processed, 1);

    let sent = app.sent_emails();
    assert_eq!(sent.len(), 1);
    let email = &sent[0];
    assert_eq!(email.recipient, NOTIFY_EMAIL);
    assert_eq!(email.subject, "Appointment confirmed: Corte de Cabelo - 05/03/2030 09:30");
    assert!(email.html_body.contains("Ana Souza"));
    assert!(email.html_body.contains("Lucas Barbearia"));
    assert!(email.html_body.contains("@ana"));
    assert_eq!(email.attachment_name.as_deref(), Some("appointment.ics"));

    let ics = String::from_utf8(email.attachment_data.clone().unwrap()).unwrap();
    assert!(ics.contains("BEGIN:VCALENDAR"));
    assert!(ics.contains("DTSTART:20300305T093000Z"));
    assert!(ics.contains("DTEND:20300305T101500Z"));

    assert_eq!(job_statuses(&app).await, vec![("COMPLETED".to_string(), None)]);
    assert_eq!(run_pending_jobs(&app.state).await.unwrap(), 0);
}

#[tokio::test]
async fn test_confirmation_for_deleted_appointment_fails() {
    let app = TestApp::new().await;
    let auth = app.login().await;
    let beard = app.service_id("Barba").await;

    let (_, booked) = app.book(&beard, "2030-03-05", "16:00").await;
    let id = booked["id"].as_str().unwrap();
    app.request("DELETE", &format!("/api/appointments/{}", id), None, Some(&auth)).await;

    run_pending_jobs(&app.state).await.unwrap();

    assert!(app.sent_emails().is_empty());
    let statuses = job_statuses(&app).await;
    assert_eq!(statuses[0].0, "FAILED");
    assert!(statuses[0].1.as_deref().unwrap().contains(id));
}

#[tokio::test]
async fn test_confirmation_survives_service_deletion() {
    let app = TestApp::new().await;
    let auth = app.login().await;
    let beard = app.service_id("Barba").await;

    app.book(&beard, "2030-03-05", "16:00").await;
    app.request("DELETE", &format!("/api/services/{}", beard), None, Some(&auth)).await;

    run_pending_jobs(&app.state).await.unwrap();

    let sent = app.sent_emails();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].subject.contains("Unknown service"));
    assert_eq!(job_statuses(&app).await[0].0, "COMPLETED");
}
