use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tokio::sync::Mutex;
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::domain::models::{service::Service, settings::{HomeContent, Settings}};
use crate::domain::services::{
    auth_service::{hash_password, AuthService},
    availability::SystemClock,
};
use crate::infra::repositories::{
    postgres_appointment_repo::PostgresAppointmentRepo, postgres_job_repo::PostgresJobRepo,
    postgres_service_repo::PostgresServiceRepo, postgres_settings_repo::PostgresSettingsRepo,
    sqlite_appointment_repo::SqliteAppointmentRepo, sqlite_job_repo::SqliteJobRepo,
    sqlite_service_repo::SqliteServiceRepo, sqlite_settings_repo::SqliteSettingsRepo,
};

pub const CONFIRMATION_TEMPLATE: &str = "confirmation.html";
pub const CONFIRMATION_SUBJECT_TEMPLATE: &str = "confirmation_subject.txt";

/// Catalogue created on first boot: name, price in cents, minutes.
const DEFAULT_SERVICES: [(&str, i64, i32); 4] = [
    ("Corte de Cabelo", 4000, 45),
    ("Barba", 3000, 30),
    ("Corte e Barba", 6500, 75),
    ("Pezinho", 1500, 15),
];

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
        config.mail_from_alias.clone(),
    ));

    let mut tera = Tera::default();
    tera.add_raw_template(CONFIRMATION_TEMPLATE, include_str!("../templates/confirmation.html"))
        .expect("Failed to load confirmation template");
    tera.add_raw_template(CONFIRMATION_SUBJECT_TEMPLATE, include_str!("../templates/confirmation_subject.txt"))
        .expect("Failed to load confirmation subject template");
    let templates = Arc::new(tera);

    let auth_service = Arc::new(AuthService::new(config));
    let clock = Arc::new(SystemClock);
    let booking_lock = Arc::new(Mutex::new(()));

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        AppState {
            config: config.clone(),
            service_repo: Arc::new(PostgresServiceRepo::new(pool.clone())),
            appointment_repo: Arc::new(PostgresAppointmentRepo::new(pool.clone())),
            settings_repo: Arc::new(PostgresSettingsRepo::new(pool.clone())),
            job_repo: Arc::new(PostgresJobRepo::new(pool.clone())),
            auth_service,
            email_service,
            clock,
            templates,
            booking_lock,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        AppState {
            config: config.clone(),
            service_repo: Arc::new(SqliteServiceRepo::new(pool.clone())),
            appointment_repo: Arc::new(SqliteAppointmentRepo::new(pool.clone())),
            settings_repo: Arc::new(SqliteSettingsRepo::new(pool.clone())),
            job_repo: Arc::new(SqliteJobRepo::new(pool.clone())),
            auth_service,
            email_service,
            clock,
            templates,
            booking_lock,
        }
    }
}

/// Creates the settings row and the default catalogue on an empty database.
pub async fn seed_defaults(state: &AppState) -> Result<(), AppError> {
    if state.settings_repo.get().await?.is_none() {
        let password_hash = hash_password(&state.config.admin_password)?;
        state.settings_repo
            .init_if_missing(&Settings::new(HomeContent::default(), password_hash))
            .await?;
        info!("Settings initialized with default content");
    }

    if state.service_repo.count().await? == 0 {
        for (name, price_cents, duration) in DEFAULT_SERVICES {
            state.service_repo.create(&Service::new(name.to_string(), price_cents, duration)).await?;
        }
        info!("Seeded {} default services", DEFAULT_SERVICES.len());
    }

    Ok(())
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
