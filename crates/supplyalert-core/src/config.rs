use std::fmt::Display;
use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_SEARCH_BASE_URL: &str = "https://api.tavily.com";
const DEFAULT_MODEL_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL_NAME: &str = "gemini-1.5-flash";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let database_url = require("DATABASE_URL")?;
    let api_key_hash_salt = require("SUPPLYALERT_API_KEY_HASH_SALT")?;
    let search_api_key = require("TAVILY_API_KEY")?;
    let model_api_key = require("GOOGLE_API_KEY")?;

    let env = parse_environment(&or_default("SUPPLYALERT_ENV", "development"))?;

    let bind_addr = parse_var(&lookup, "SUPPLYALERT_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("SUPPLYALERT_LOG_LEVEL", "info");

    let search_base_url = or_default("SUPPLYALERT_SEARCH_BASE_URL", DEFAULT_SEARCH_BASE_URL);
    let model_base_url = or_default("SUPPLYALERT_MODEL_BASE_URL", DEFAULT_MODEL_BASE_URL);
    let model_name = or_default("SUPPLYALERT_MODEL", DEFAULT_MODEL_NAME);

    let model_temperature: f32 = parse_var(&lookup, "SUPPLYALERT_MODEL_TEMPERATURE", "0.7")?;
    if !(0.0..=2.0).contains(&model_temperature) {
        return Err(ConfigError::InvalidEnvVar {
            var: "SUPPLYALERT_MODEL_TEMPERATURE".to_string(),
            reason: format!("{model_temperature} is outside 0.0..=2.0"),
        });
    }
    let model_max_output_tokens =
        parse_var(&lookup, "SUPPLYALERT_MODEL_MAX_OUTPUT_TOKENS", "1000")?;

    let output_mode = parse_var(&lookup, "SUPPLYALERT_OUTPUT_MODE", "delimited")?;
    let risk_profile = parse_var(&lookup, "SUPPLYALERT_RISK_PROFILE", "general")?;

    let upstream_timeout_secs = parse_var(&lookup, "SUPPLYALERT_UPSTREAM_TIMEOUT_SECS", "60")?;
    let history_limit: i64 = parse_var(&lookup, "SUPPLYALERT_HISTORY_LIMIT", "50")?;
    if history_limit < 1 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SUPPLYALERT_HISTORY_LIMIT".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let db_max_connections: u32 = parse_var(&lookup, "SUPPLYALERT_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections: u32 = parse_var(&lookup, "SUPPLYALERT_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_var(&lookup, "SUPPLYALERT_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    if db_min_connections > db_max_connections {
        return Err(ConfigError::InvalidEnvVar {
            var: "SUPPLYALERT_DB_MIN_CONNECTIONS".to_string(),
            reason: format!(
                "min connections ({db_min_connections}) exceeds max connections ({db_max_connections})"
            ),
        });
    }

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        api_key_hash_salt,
        search_api_key,
        search_base_url,
        model_api_key,
        model_base_url,
        model_name,
        model_temperature,
        model_max_output_tokens,
        output_mode,
        risk_profile,
        upstream_timeout_secs,
        history_limit,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

/// Parse an optional env var into `T`, falling back to `default` when unset.
fn parse_var<F, T>(lookup: &F, var: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(var).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SUPPLYALERT_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}
