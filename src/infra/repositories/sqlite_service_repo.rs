use crate::domain::{models::service::Service, ports::ServiceRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{SqlitePool, Row};

pub struct SqliteServiceRepo {
    pool: SqlitePool,
}

impl SqliteServiceRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceRepository for SqliteServiceRepo {
    async fn create(&self, service: &Service) -> Result<Service, AppError> {
        sqlx::query_as::<_, Service>(
            "INSERT INTO services (id, name, price_cents, duration) VALUES (?, ?, ?, ?) RETURNING *"
        )
            .bind(&service.id)
            .bind(&service.name)
            .bind(service.price_cents)
            .bind(service.duration)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Service>, AppError> {
        sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Service>, AppError> {
        sqlx::query_as::<_, Service>("SELECT * FROM services ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, service: &Service) -> Result<Service, AppError> {
        sqlx::query_as::<_, Service>(
            "UPDATE services SET name = ?, price_cents = ?, duration = ? WHERE id = ? RETURNING *"
        )
            .bind(&service.name)
            .bind(service.price_cents)
            .bind(service.duration)
            .bind(&service.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Service not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM services WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Service not found".into()));
        }
        Ok(())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM services")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }
}
