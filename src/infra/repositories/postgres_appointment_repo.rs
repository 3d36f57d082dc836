use crate::domain::{models::{appointment::Appointment, job::Job}, ports::AppointmentRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

pub struct PostgresAppointmentRepo {
    pool: PgPool,
}

impl PostgresAppointmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for PostgresAppointmentRepo {
    async fn create_with_jobs(&self, appointment: &Appointment, jobs: Vec<Job>) -> Result<Appointment, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let created = sqlx::query_as::<_, Appointment>("INSERT INTO appointments (id, client_name, client_phone, client_instagram, service_id, date, time, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *").bind(&appointment.id).bind(&appointment.client_name).bind(&appointment.client_phone).bind(&appointment.client_instagram).bind(&appointment.service_id).bind(appointment.date).bind(appointment.time).bind(appointment.created_at).fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        for job in jobs {
            sqlx::query("INSERT INTO jobs (id, job_type, payload, execute_at, status, error_message, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7)").bind(&job.id).bind(&job.job_type).bind(&job.payload).bind(job.execute_at).bind(&job.status).bind(&job.error_message).bind(job.created_at).execute(&mut *tx).await.map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments ORDER BY created_at DESC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE date = $1 ORDER BY time ASC").bind(date).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Appointment not found".into())); }
        Ok(())
    }
}
