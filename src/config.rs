use std::env;

use chrono_tz::Tz;

use crate::errors::AppError;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    /// Vocabulary JSON path; the embedded default is used when unset.
    pub vocabulary_path: Option<String>,
    pub directory_ttl_secs: i64,
    pub pacing_delay_ms: u64,
    pub scripture_api_url: String,
    pub scripture_translation: String,
    pub timezone: Tz,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let timezone_name = env::var("TIMEZONE").unwrap_or_else(|_| "America/Mexico_City".to_string());
        let timezone = timezone_name
            .parse::<Tz>()
            .map_err(|e| AppError::Config(format!("invalid TIMEZONE '{timezone_name}': {e}")))?;

        Ok(Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "arcana.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            vocabulary_path: env::var("ARCANA_VOCABULARY").ok().filter(|p| !p.trim().is_empty()),
            directory_ttl_secs: env::var("DIRECTORY_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|ttl| *ttl > 0)
                .unwrap_or(crate::services::directory::cache::DEFAULT_TTL_SECS),
            pacing_delay_ms: env::var("PACING_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1200),
            scripture_api_url: env::var("SCRIPTURE_API_URL")
                .unwrap_or_else(|_| "https://bible-api.com".to_string()),
            scripture_translation: env::var("SCRIPTURE_TRANSLATION")
                .unwrap_or_else(|_| "rvr1960".to_string()),
            timezone,
        })
    }
}
