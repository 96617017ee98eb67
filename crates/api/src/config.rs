//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the
//! After-Hours Connect API server. It retrieves configuration values from
//! environment variables and provides defaults where appropriate.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Request timeout (default: 30)
//! - `AFTER_HOURS_SEARCH_DAYS`: Slot-search horizon in days (default: 14)
//! - `FEATURE_AFTER_HOURS_WINDOW`: Enable the daily submission window gate
//! - `AFTER_HOURS_START` / `AFTER_HOURS_END`: Window boundaries, `HH:MM`
//!   (defaults: 17:00 / 21:00)
//! - `AFTER_HOURS_TIMEZONE`: IANA zone the window is evaluated in
//!   (default: America/Chicago)

use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use eyre::{eyre, Result, WrapErr};
use std::env;
use tracing::Level;

use afterhours_core::models::teacher::{parse_hm, parse_timezone};
use afterhours_core::slots::DEFAULT_SEARCH_DAYS;

/// The optional daily window during which new questions may be submitted.
///
/// When disabled (the default) submissions are accepted around the clock;
/// when enabled, a submission outside `start..=end` in the configured zone
/// is rejected as a validation error.
#[derive(Debug, Clone)]
pub struct AfterHoursWindow {
    pub enabled: bool,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub timezone: Tz,
}

impl AfterHoursWindow {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            start: NaiveTime::from_hms_opt(17, 0, 0).expect("static time"),
            end: NaiveTime::from_hms_opt(21, 0, 0).expect("static time"),
            timezone: chrono_tz::America::Chicago,
        }
    }

    pub fn from_env() -> Result<Self> {
        let enabled = env::var("FEATURE_AFTER_HOURS_WINDOW")
            .map(|value| value.to_lowercase() == "true")
            .unwrap_or(false);
        let start_str = env::var("AFTER_HOURS_START").unwrap_or_else(|_| "17:00".to_string());
        let end_str = env::var("AFTER_HOURS_END").unwrap_or_else(|_| "21:00".to_string());
        let tz_str =
            env::var("AFTER_HOURS_TIMEZONE").unwrap_or_else(|_| "America/Chicago".to_string());

        let start = parse_hm(&start_str).map_err(|e| eyre!("Invalid AFTER_HOURS_START: {e}"))?;
        let end = parse_hm(&end_str).map_err(|e| eyre!("Invalid AFTER_HOURS_END: {e}"))?;
        let timezone =
            parse_timezone(&tz_str).map_err(|e| eyre!("Invalid AFTER_HOURS_TIMEZONE: {e}"))?;

        Ok(Self {
            enabled,
            start,
            end,
            timezone,
        })
    }

    /// Whether a submission at `instant` falls inside the window. The
    /// window is a same-day interval, inclusive at both ends.
    pub fn is_open_at(&self, instant: DateTime<Utc>) -> bool {
        if !self.enabled {
            return true;
        }
        let local = instant.with_timezone(&self.timezone).time();
        self.start <= local && local <= self.end
    }
}

/// Configuration for the After-Hours Connect API server
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Slot-search horizon in days
    pub search_days: u32,

    /// Optional daily submission window
    pub window: AfterHoursWindow,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - The API_PORT value cannot be parsed as a u16
    /// - The submission-window values cannot be parsed
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;

        // Logging settings
        let log_level = match env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()).as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS")
            .ok()
            .map(|origins| origins.split(',').map(|s| s.trim().to_string()).collect());

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        // Scheduling settings
        let search_days = env::var("AFTER_HOURS_SEARCH_DAYS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_SEARCH_DAYS);

        let window = AfterHoursWindow::from_env()?;

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            search_days,
            window,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
