use std::env;
use chrono::NaiveTime;
use chrono_tz::Tz;
use crate::domain::services::availability::{minute_of_day, BusinessHours};

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub frontend_url: String,
    pub mail_service_url: String,
    pub mail_service_token: String,
    pub mail_from_alias: String,
    pub notify_email: String,
    pub jwt_secret_key: String, // Private key (PEM)
    pub jwt_public_key: String, // Public key (PEM)
    pub auth_issuer: String,
    pub session_ttl_minutes: i64,
    pub admin_password: String, // Seed only, ignored once settings exist
    pub business_hours: BusinessHours,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "10000".to_string()).parse().expect("PORT must be a number"),
            frontend_url: env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string()),
            mail_service_url: env::var("MAIL_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            mail_from_alias: env::var("MAIL_FROM_ALIAS").unwrap_or_else(|_| "default".to_string()),
            notify_email: env::var("NOTIFY_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string()),
            jwt_secret_key: env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set (Ed25519 Private Key)"),
            jwt_public_key: env::var("JWT_PUBLIC_KEY").expect("JWT_PUBLIC_KEY must be set (Ed25519 Public Key)"),
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "salon-booking".to_string()),
            session_ttl_minutes: env::var("SESSION_TTL_MINUTES").unwrap_or_else(|_| "480".to_string()).parse().expect("SESSION_TTL_MINUTES must be a number"),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string()),
            business_hours: business_hours_from_env(),
        }
    }
}

fn business_hours_from_env() -> BusinessHours {
    let defaults = BusinessHours::default();
    let timezone: Tz = env::var("BUSINESS_TIMEZONE")
        .unwrap_or_else(|_| "America/Sao_Paulo".to_string())
        .parse()
        .expect("BUSINESS_TIMEZONE must be an IANA timezone name");

    let hours = BusinessHours {
        work_start: minute_var("WORK_START", defaults.work_start),
        work_end: minute_var("WORK_END", defaults.work_end),
        lunch_start: minute_var("LUNCH_START", defaults.lunch_start),
        lunch_end: minute_var("LUNCH_END", defaults.lunch_end),
        step: env::var("SLOT_STEP_MIN").map(|v| v.parse().expect("SLOT_STEP_MIN must be a number")).unwrap_or(defaults.step),
        timezone,
    };

    hours.validate().unwrap_or_else(|e| panic!("Invalid business hours: {}", e))
}

fn minute_var(name: &str, default: u32) -> u32 {
    match env::var(name) {
        Ok(raw) => parse_clock_minutes(&raw)
            .unwrap_or_else(|| panic!("{} must be HH:MM (or 24:00), got {:?}", name, raw)),
        Err(_) => default,
    }
}

/// Parses `HH:MM` into minutes since midnight; `24:00` closes at midnight.
pub fn parse_clock_minutes(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw == "24:00" {
        return Some(24 * 60);
    }
    NaiveTime::parse_from_str(raw, "%H:%M").ok().map(minute_of_day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clock_minutes() {
        assert_eq!(parse_clock_minutes("09:00"), Some(540));
        assert_eq!(parse_clock_minutes(" 13:45 "), Some(825));
        assert_eq!(parse_clock_minutes("24:00"), Some(1440));
        assert_eq!(parse_clock_minutes("9am"), None);
        assert_eq!(parse_clock_minutes("25:00"), None);
    }
}
