use std::sync::Arc;
use crate::domain::ports::{
    AppointmentRepository, EmailService, JobRepository, ServiceRepository, SettingsRepository,
};
use crate::domain::services::{auth_service::AuthService, availability::Clock};
use crate::config::Config;
use tera::Tera;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub service_repo: Arc<dyn ServiceRepository>,
    pub appointment_repo: Arc<dyn AppointmentRepository>,
    pub settings_repo: Arc<dyn SettingsRepository>,
    pub job_repo: Arc<dyn JobRepository>,
    pub auth_service: Arc<AuthService>,
    pub email_service: Arc<dyn EmailService>,
    pub clock: Arc<dyn Clock>,
    pub templates: Arc<Tera>,
    /// Serialises slot check and insert when booking.
    pub booking_lock: Arc<Mutex<()>>,
}
