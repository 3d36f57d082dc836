use crate::domain::models::{
    appointment::Appointment, job::Job, service::Service,
    settings::{HomeContent, Settings},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn create(&self, service: &Service) -> Result<Service, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Service>, AppError>;
    async fn list(&self) -> Result<Vec<Service>, AppError>;
    async fn update(&self, service: &Service) -> Result<Service, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn count(&self) -> Result<i64, AppError>;
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Inserts the appointment and its notification jobs in one transaction.
    async fn create_with_jobs(&self, appointment: &Appointment, jobs: Vec<Job>) -> Result<Appointment, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError>;
    async fn list(&self) -> Result<Vec<Appointment>, AppError>;
    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Appointment>, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get(&self) -> Result<Option<Settings>, AppError>;
    async fn init_if_missing(&self, settings: &Settings) -> Result<(), AppError>;
    async fn update_content(&self, content: &HomeContent) -> Result<Settings, AppError>;
    async fn update_password_hash(&self, password_hash: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Claims due `PENDING` jobs by moving them to `PROCESSING`.
    async fn find_pending(&self, limit: i32) -> Result<Vec<Job>, AppError>;
    async fn update_status(&self, id: &str, status: &str, error_message: Option<String>) -> Result<(), AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str, attachment_name: Option<&str>, attachment_data: Option<&[u8]>) -> Result<(), AppError>;
}
