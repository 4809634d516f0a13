use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

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
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("ORDVAL_ENV", "development"))?;

    let bind_addr = parse_var(&or_default, "ORDVAL_BIND_ADDR", "0.0.0.0:5000")?;
    let log_level = or_default("ORDVAL_LOG_LEVEL", "info");

    let openai_api_key = lookup("OPENAI_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    let openai_base_url = or_default("ORDVAL_OPENAI_BASE_URL", "https://api.openai.com/v1");
    let openai_model = or_default("ORDVAL_OPENAI_MODEL", "gpt-4.1-mini");
    let llm_timeout_secs = parse_var(&or_default, "ORDVAL_LLM_TIMEOUT_SECS", "60")?;

    let db_max_connections = parse_var(&or_default, "ORDVAL_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_var(&or_default, "ORDVAL_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_var(&or_default, "ORDVAL_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    if db_min_connections > db_max_connections {
        return Err(ConfigError::InvalidEnvVar {
            var: "ORDVAL_DB_MIN_CONNECTIONS".to_string(),
            reason: format!(
                "min ({db_min_connections}) exceeds max ({db_max_connections})"
            ),
        });
    }

    let rate_limit_per_minute = parse_var(&or_default, "ORDVAL_RATE_LIMIT_PER_MINUTE", "120")?;
    let api_keys = parse_api_keys(&or_default("ORDVAL_API_KEYS", ""));

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        openai_api_key,
        openai_base_url,
        openai_model,
        llm_timeout_secs,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        rate_limit_per_minute,
        api_keys,
    })
}

fn parse_var<T>(
    or_default: &impl Fn(&str, &str) -> String,
    var: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = or_default(var, default);
    raw.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
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
            var: "ORDVAL_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// Split a comma-separated list of bearer tokens, dropping blanks.
fn parse_api_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
