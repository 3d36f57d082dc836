pub mod sqlite_appointment_repo;
pub mod sqlite_job_repo;
pub mod sqlite_service_repo;
pub mod sqlite_settings_repo;

pub mod postgres_appointment_repo;
pub mod postgres_job_repo;
pub mod postgres_service_repo;
pub mod postgres_settings_repo;
