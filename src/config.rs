use std::env;
use std::str::FromStr;

use crate::utils::AppError;

/// Runtime configuration read from the environment (after `.env` is loaded)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_name: String,
    pub cors_origin: String,
    pub max_pool_size: u32,
    pub password_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            host: var_or("HOST", "0.0.0.0"),
            port: parse_or("PORT", 3000)?,
            database_url: database_url()?,
            database_name: var_or("DATABASE_NAME", "premier1"),
            cors_origin: var_or("CORS_ORIGIN", "http://localhost:5173"),
            max_pool_size: parse_or("DB_MAX_POOL_SIZE", 50)?,
            password_cost: parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        log::debug!("{} not set, using default: {}", key, default);
        default.to_string()
    })
}

fn parse_or<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", key, raw, e))),
        Err(_) => Ok(default),
    }
}

/// `DATABASE_URL` wins; otherwise an Atlas SRV URI is assembled from
/// `DB_USER`, `DB_PASS` and `DB_CLUSTER`.
fn database_url() -> Result<String, AppError> {
    if let Ok(url) = env::var("DATABASE_URL") {
        return Ok(url);
    }

    match (env::var("DB_USER"), env::var("DB_PASS"), env::var("DB_CLUSTER")) {
        (Ok(user), Ok(pass), Ok(cluster)) => Ok(atlas_uri(&user, &pass, &cluster)),
        _ => Err(AppError::Config(
            "DATABASE_URL or DB_USER/DB_PASS/DB_CLUSTER must be set".to_string(),
        )),
    }
}

fn atlas_uri(user: &str, pass: &str, cluster: &str) -> String {
    format!(
        "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority",
        user, pass, cluster
    )
}
