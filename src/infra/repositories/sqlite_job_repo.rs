use crate::domain::{models::job::Job, ports::JobRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use chrono::Utc;

pub struct SqliteJobRepo {
    pool: SqlitePool,
}

impl SqliteJobRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl JobRepository for SqliteJobRepo {
    async fn find_pending(&self, limit: i32) -> Result<Vec<Job>, AppError> {
        sqlx::query_as::<_, Job>(
            "UPDATE jobs SET status = 'PROCESSING' WHERE id IN (SELECT id FROM jobs WHERE status = 'PENDING' AND execute_at <= ? ORDER BY execute_at LIMIT ?) RETURNING *"
        )
            .bind(Utc::now())
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_status(&self, id: &str, status: &str, error_message: Option<String>) -> Result<(), AppError> {
        sqlx::query("UPDATE jobs SET status = ?, error_message = ? WHERE id = ?")
            .bind(status)
            .bind(error_message)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
