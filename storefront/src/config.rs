// storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

impl FromStr for LogFormat {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "pretty" => Ok(LogFormat::Pretty),
      "json" => Ok(LogFormat::Json),
      other => Err(AppError::Config(format!(
        "Invalid LOG_FORMAT '{}': expected 'pretty' or 'json'",
        other
      ))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
  /// `postgres://...` or `memory://`.
  pub url: String,
  pub max_connections: u32,
  pub acquire_timeout: Duration,
  pub run_migrations: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database: DatabaseConfig,
  /// Insert a sample catalog on startup when no products exist yet.
  pub seed_db: bool,
  pub log_format: LogFormat,
}

impl AppConfig {
  /// Reads the configuration from the process environment, loading `.env`
  /// first if one is present.
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the configuration from an arbitrary variable source.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = parse_var(&lookup, "SERVER_PORT", 8080u16)?;
    let url = lookup("DATABASE_URL")
      .ok_or_else(|| AppError::Config("Missing environment variable 'DATABASE_URL'".to_string()))?;
    let max_connections = parse_var(&lookup, "DATABASE_MAX_CONNECTIONS", 10u32)?;
    let acquire_timeout_secs = parse_var(&lookup, "DATABASE_ACQUIRE_TIMEOUT_SECS", 30u64)?;
    let run_migrations = parse_var(&lookup, "RUN_MIGRATIONS", true)?;
    let seed_db = parse_var(&lookup, "SEED_DB", false)?;
    let log_format = parse_var(&lookup, "LOG_FORMAT", LogFormat::Pretty)?;

    if max_connections == 0 {
      return Err(AppError::Config("DATABASE_MAX_CONNECTIONS must be at least 1".to_string()));
    }

    Ok(Self {
      server_host,
      server_port,
      database: DatabaseConfig {
        url,
        max_connections,
        acquire_timeout: Duration::from_secs(acquire_timeout_secs),
        run_migrations,
      },
      seed_db,
      log_format,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match lookup(name) {
    Some(raw) => raw
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", name, raw, e))),
    None => Ok(default),
  }
}
