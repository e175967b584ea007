use std::{env, ops::RangeInclusive, path::PathBuf, str::FromStr, time::Duration};

use script_llm::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};

use crate::auth::{firebase_identity::DEFAULT_IDENTITY_BASE_URL, jwt::JwtConfig};

/// Session lifetimes from one minute up to one year.
pub const JWT_EXPIRY_MINS_RANGE: RangeInclusive<i64> = 1..=525_600;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),
    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
}

#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub uri: String,
    pub name: String,
}

/// Service configuration, read once at startup.
///
/// | Env Var                | Required | Default                                     |
/// |------------------------|----------|---------------------------------------------|
/// | `APP_ENVIRONMENT`      | no       | `dev`                                       |
/// | `BIND_ADDRESS`         | no       | `0.0.0.0:8000`                              |
/// | `REQUEST_TIMEOUT_SECS` | no       | `60`                                        |
/// | `GEMINI_API_KEY`       | **yes**  | --                                          |
/// | `GEMINI_MODEL`         | no       | `gemini-1.5-flash-latest`                   |
/// | `GEMINI_BASE_URL`      | no       | `https://generativelanguage.googleapis.com` |
/// | `MODEL_TIMEOUT_SECS`   | no       | `180`                                       |
/// | `MODEL_MAX_RETRIES`    | no       | `0`                                         |
/// | `LOCAL_SCRIPTS_PATH`   | no       | `saved_scripts.json`                        |
/// | `DATABASE_URI`         | no       | unset, cloud persistence disabled           |
/// | `DATABASE_NAME`        | no       | `ScriptWriter`                              |
/// | `IDENTITY_API_KEY`     | **yes**  | --                                          |
/// | `IDENTITY_BASE_URL`    | no       | `https://identitytoolkit.googleapis.com`    |
/// | `JWT_SECRET`           | **yes**  | --                                          |
/// | `JWT_EXPIRY_MINS`      | no       | `60` (1 to 525600)                          |
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub bind_address: String,
    pub request_timeout: Duration,
    pub model: ModelConfig,
    pub local_scripts_path: PathBuf,
    pub database: Option<DatabaseConfig>,
    pub identity: IdentityConfig,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database = optional("DATABASE_URI").map(|uri| DatabaseConfig {
            uri,
            name: or_default("DATABASE_NAME", "ScriptWriter"),
        });

        let jwt_secret = required("JWT_SECRET")?;

        Ok(Self {
            environment: or_default("APP_ENVIRONMENT", "dev"),
            bind_address: or_default("BIND_ADDRESS", "0.0.0.0:8000"),
            request_timeout: Duration::from_secs(parsed("REQUEST_TIMEOUT_SECS", 60)?),
            model: ModelConfig {
                api_key: required("GEMINI_API_KEY")?,
                model: or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
                base_url: or_default("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
                timeout: Duration::from_secs(parsed("MODEL_TIMEOUT_SECS", 180)?),
                max_retries: parsed("MODEL_MAX_RETRIES", 0)?,
            },
            local_scripts_path: PathBuf::from(or_default(
                "LOCAL_SCRIPTS_PATH",
                "saved_scripts.json",
            )),
            database,
            identity: IdentityConfig {
                api_key: required("IDENTITY_API_KEY")?,
                base_url: or_default("IDENTITY_BASE_URL", DEFAULT_IDENTITY_BASE_URL),
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                expiry_mins: bounded(
                    "JWT_EXPIRY_MINS",
                    optional("JWT_EXPIRY_MINS"),
                    60,
                    JWT_EXPIRY_MINS_RANGE,
                )?,
            },
        })
    }

    pub fn is_dev(&self) -> bool {
        self.environment == "dev"
    }
}

fn optional(name: &'static str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn or_default(name: &'static str, default: &str) -> String {
    optional(name).unwrap_or_else(|| default.to_string())
}

fn parsed<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    parse_value(name, optional(name), default)
}

fn parse_value<T: FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

fn bounded<T: FromStr + PartialOrd>(
    name: &'static str,
    raw: Option<String>,
    default: T,
    range: RangeInclusive<T>,
) -> Result<T, ConfigError> {
    let value = parse_value(name, raw.clone(), default)?;
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            name,
            value: raw.unwrap_or_default(),
        })
    }
}
