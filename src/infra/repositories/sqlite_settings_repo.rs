use crate::domain::{models::settings::{HomeContent, Settings}, ports::SettingsRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteSettingsRepo {
    pool: SqlitePool,
}

impl SqliteSettingsRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for SqliteSettingsRepo {
    async fn get(&self) -> Result<Option<Settings>, AppError> {
        sqlx::query_as::<_, Settings>("SELECT * FROM settings WHERE id = ?")
            .bind(Settings::ROW_ID)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn init_if_missing(&self, settings: &Settings) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO settings (id, title, subtitle, description, cta_button_link, admin_password_hash)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT (id) DO NOTHING"
        )
            .bind(settings.id)
            .bind(&settings.title)
            .bind(&settings.subtitle)
            .bind(&settings.description)
            .bind(&settings.cta_button_link)
            .bind(&settings.admin_password_hash)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn update_content(&self, content: &HomeContent) -> Result<Settings, AppError> {
        sqlx::query_as::<_, Settings>(
            "UPDATE settings SET title = ?, subtitle = ?, description = ?, cta_button_link = ? WHERE id = ? RETURNING *"
        )
            .bind(&content.title)
            .bind(&content.subtitle)
            .bind(&content.description)
            .bind(&content.cta_button_link)
            .bind(Settings::ROW_ID)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Settings not initialized".into()))
    }

    async fn update_password_hash(&self, password_hash: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE settings SET admin_password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Settings::ROW_ID)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Settings not initialized".into()));
        }
        Ok(())
    }
}
