use crate::core::{AppError, Currency, ReportClock, Result};
use std::env;
use std::str::FromStr;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Shortest accepted `TOKEN_SECRET`, in bytes
const MIN_TOKEN_SECRET_LEN: usize = 32;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    /// `None` selects the in-memory store
    pub database: Option<DatabaseConfig>,
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub reports: ReportsConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub token_secret: String,
    pub session_ttl_hours: i64,
    pub rate_limit_per_minute: u32,
    pub admin: Option<AdminCredentials>,
}

/// Administrator created at startup when missing
#[derive(Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ReportsConfig {
    pub currency: Currency,
    pub utc_offset_hours: i32,
}

impl ReportsConfig {
    pub fn clock(&self) -> Result<ReportClock> {
        ReportClock::from_offset_hours(self.utc_offset_hours).map_err(AppError::Configuration)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_source<F>(source: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| source(key).filter(|v| !v.trim().is_empty());

        let admin = match (var("ADMIN_USERNAME"), var("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(AdminCredentials { username, password }),
            (None, None) => None,
            _ => {
                return Err(AppError::Configuration(
                    "ADMIN_USERNAME and ADMIN_PASSWORD must be set together".to_string(),
                ))
            }
        };

        let database = match var("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                pool_size: parse_or(&var, "DATABASE_POOL_SIZE", 10)?,
                max_connections: parse_or(&var, "DATABASE_MAX_CONNECTIONS", 20)?,
            }),
            None => None,
        };

        let config = Config {
            app: AppConfig {
                env: var("APP_ENV").unwrap_or_else(|| "development".to_string()),
                log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            },
            database,
            server: ServerConfig {
                host: var("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
                port: parse_or(&var, "SERVER_PORT", 3000)?,
                workers: parse_or(&var, "SERVER_WORKERS", num_cpus::get() * 2)?,
                frontend_url: var("FRONTEND_URL")
                    .unwrap_or_else(|| "http://localhost:5173".to_string()),
            },
            security: SecurityConfig {
                token_secret: var("TOKEN_SECRET")
                    .ok_or_else(|| AppError::Configuration("TOKEN_SECRET not set".to_string()))?,
                session_ttl_hours: parse_or(&var, "SESSION_TTL_HOURS", 24)?,
                rate_limit_per_minute: parse_or(&var, "RATE_LIMIT_PER_MINUTE", 1000)?,
                admin,
            },
            reports: ReportsConfig {
                currency: parse_or(&var, "REPORT_CURRENCY", Currency::PLN)?,
                utc_offset_hours: parse_or(&var, "REPORT_UTC_OFFSET_HOURS", 0)?,
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.security.token_secret.len() < MIN_TOKEN_SECRET_LEN {
            return Err(AppError::Configuration(format!(
                "TOKEN_SECRET must be at least {} bytes",
                MIN_TOKEN_SECRET_LEN
            )));
        }

        if self.security.session_ttl_hours <= 0 {
            return Err(AppError::Configuration(
                "Session TTL must be greater than 0".to_string(),
            ));
        }

        if self.security.rate_limit_per_minute == 0 {
            return Err(AppError::Configuration(
                "Rate limit must be greater than 0".to_string(),
            ));
        }

        if self.server.workers == 0 {
            return Err(AppError::Configuration(
                "Server workers must be greater than 0".to_string(),
            ));
        }

        if !(-12..=14).contains(&self.reports.utc_offset_hours) {
            return Err(AppError::Configuration(format!(
                "REPORT_UTC_OFFSET_HOURS out of range: {}",
                self.reports.utc_offset_hours
            )));
        }

        if let Some(database) = &self.database {
            database.validate()?;
        }

        Ok(())
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}: '{}'", key, raw))),
        None => Ok(default),
    }
}
