use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, info_span, Instrument};
use crate::state::AppState;
use crate::error::AppError;
use crate::domain::models::appointment::hhmm;
use crate::domain::models::job::{Job, JOB_CONFIRMATION};
use crate::domain::models::settings::HomeContent;
use crate::domain::services::calendar::generate_ics;
use crate::infra::factory::{CONFIRMATION_SUBJECT_TEMPLATE, CONFIRMATION_TEMPLATE};

const POLL_INTERVAL: Duration = Duration::from_secs(5);
const BATCH_SIZE: i32 = 10;
const UNKNOWN_SERVICE: &str = "Unknown service";

pub async fn start_background_worker(state: Arc<AppState>) {
    info!("Starting background job worker...");

    loop {
        if let Err(e) = run_pending_jobs(&state).await {
            error!("Failed to fetch pending jobs: {:?}", e);
        }
        sleep(POLL_INTERVAL).await;
    }
}

/// Claims one batch of due jobs and settles each as `COMPLETED` or `FAILED`.
pub async fn run_pending_jobs(state: &Arc<AppState>) -> Result<usize, AppError> {
    let jobs = state.job_repo.find_pending(BATCH_SIZE).await?;
    let claimed = jobs.len();

    for job in jobs {
        let span = info_span!(
            "background_job",
            job_id = %job.id,
            job_type = %job.job_type,
            appointment_id = %job.payload.appointment_id
        );

        async {
            info!("Processing job: {}", job.job_type);
            match process_job(state, &job).await {
                Ok(_) => {
                    info!("Job completed successfully");
                    if let Err(e) = state.job_repo.update_status(&job.id, "COMPLETED", None).await {
                        error!("Failed to mark job as completed: {:?}", e);
                    }
                }
                Err(e) => {
                    let err_msg = format!("{}", e);
                    error!("Job failed with error: {}", err_msg);
                    if let Err(up_err) = state.job_repo.update_status(&job.id, "FAILED", Some(err_msg)).await {
                        error!("Failed to mark job as failed: {:?}", up_err);
                    }
                }
            }
        }
            .instrument(span)
            .await;
    }

    Ok(claimed)
}

async fn process_job(state: &AppState, job: &Job) -> Result<(), AppError> {
    match job.job_type.as_str() {
        JOB_CONFIRMATION => send_confirmation(state, &job.payload.appointment_id).await,
        other => Err(AppError::InternalWithMsg(format!("Unknown job type {}", other))),
    }
}

async fn send_confirmation(state: &AppState, appointment_id: &str) -> Result<(), AppError> {
    let appointment = state.appointment_repo.find_by_id(appointment_id).await?
        .ok_or(AppError::NotFound(format!("Appointment {} not found", appointment_id)))?;

    let service = match appointment.service_id.as_deref() {
        Some(id) => state.service_repo.find_by_id(id).await?,
        None => None,
    };
    let service_name = service.as_ref().map_or(UNKNOWN_SERVICE, |s| s.name.as_str());
    let duration = service.as_ref().and_then(|s| s.duration_min()).unwrap_or(0);

    let business_name = state.settings_repo.get().await?
        .map(|settings| settings.title)
        .unwrap_or_else(|| HomeContent::default().title);

    let mut context = tera::Context::new();
    context.insert("client_name", &appointment.client_name);
    context.insert("client_phone", &appointment.client_phone);
    context.insert("client_instagram", &appointment.client_instagram);
    context.insert("business_name", &business_name);
    context.insert("service_name", service_name);
    context.insert("date", &appointment.date.format("%d/%m/%Y").to_string());
    context.insert("time", &appointment.time.format(hhmm::FORMAT).to_string());
    context.insert("duration", &duration);

    let html = state.templates.render(CONFIRMATION_TEMPLATE, &context)
        .map_err(|e| AppError::InternalWithMsg(format!("Tera render error: {:?}", e)))?;
    let subject = state.templates.render(CONFIRMATION_SUBJECT_TEMPLATE, &context)
        .map_err(|e| AppError::InternalWithMsg(format!("Tera subject render error: {:?}", e)))?;

    let ics = generate_ics(&appointment, service_name, i64::from(duration), state.config.business_hours.timezone);

    state.email_service.send(
        &state.config.notify_email,
        subject.trim(),
        &html,
        Some("appointment.ics"),
        Some(ics.as_bytes()),
    ).await?;

    info!("Confirmation sent for appointment {}", appointment.id);
    Ok(())
}
