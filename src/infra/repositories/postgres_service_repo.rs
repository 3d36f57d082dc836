use crate::domain::{models::service::Service, ports::ServiceRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Row};

pub struct PostgresServiceRepo {
    pool: PgPool,
}

impl PostgresServiceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceRepository for PostgresServiceRepo {
    async fn create(&self, service: &Service) -> Result<Service, AppError> {
        sqlx::query_as::<_, Service>(
            "INSERT INTO services (id, name, price_cents, duration) VALUES ($1, $2, $3, $4) RETURNING *"
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
        sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1")
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
            "UPDATE services SET name = $1, price_cents = $2, duration = $3 WHERE id = $4 RETURNING *"
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
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
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
