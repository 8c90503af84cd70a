use std::{fmt::Display, num::NonZeroUsize, str::FromStr, time::Duration};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Env {
    Dev,
    Staging,
    Production,
}

impl Env {
    /// Runs before the tracing subscriber exists, so a value that cannot be
    /// used is returned as `Err` with the `Env::Dev` fallback for the caller
    /// to log once tracing is up.
    pub fn from_env() -> Result<Self, (Self, String)> {
        let value =
            var("ENVIRONMENT").map_err(|e| (Env::Dev, format!("{e}, falling back to dev")))?;
        Env::parse(value.as_deref())
    }

    pub fn default_log_filter(self) -> &'static str {
        match self {
            Env::Dev => "meetups=debug,tower_http=debug",
            Env::Staging | Env::Production => "meetups=info,tower_http=info",
        }
    }

    fn parse(value: Option<&str>) -> Result<Self, (Self, String)> {
        match value {
            Some("dev") | None => Ok(Env::Dev),
            Some("staging") => Ok(Env::Staging),
            Some("production") => Ok(Env::Production),
            Some(other) => Err((
                Env::Dev,
                format!("Unknown ENVIRONMENT `{other}`, falling back to dev"),
            )),
        }
    }
}

#[derive(Debug)]
pub struct ServerConfig {
    pub env: Env,
    pub database_url: String,
    pub port: u16,
    pub database_max_connections: NonZeroUsize,
    pub database_acquire_timeout: Duration,
    /// `None` means no explicit allow list was configured.
    pub cors_allowed_origins: Option<Vec<String>>,
}

fn var(key: &str) -> Result<Option<String>, String> {
    match std::env::var(key) {
        Ok(env) => Ok(Some(env)),
        Err(e) => match e {
            std::env::VarError::NotPresent => Ok(None),
            std::env::VarError::NotUnicode(_) => Err(format!(
                "Could not get the environment variable `{key}` due to unicode error"
            )),
        },
    }
}

fn optional_var(key: &str) -> Option<String> {
    var(key).unwrap_or_else(|e| {
        tracing::warn!("{e}, using default");
        None
    })
}

fn required_var(key: &str) -> String {
    let val = var(key);
    match val {
        Ok(val) => match val {
            Some(val) => val,
            None => {
                tracing::error!("Environment variable `{key}` is required");
                std::process::exit(1)
            }
        },
        Err(e) => {
            tracing::error!(
                "Environment variable `{key}` is required, but could not retrieve: {e}"
            );
            std::process::exit(1)
        }
    }
}

fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> T
where
    T::Err: Display,
{
    match value {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            tracing::warn!("Invalid value for `{key}`: {e}, using default");
            default
        }),
        None => default,
    }
}

fn parse_origins(value: Option<String>) -> Option<Vec<String>> {
    value.map(|v| {
        v.split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_owned)
            .collect()
    })
}

const DEFAULT_MAX_CONNECTIONS: NonZeroUsize = NonZeroUsize::new(10).unwrap();

impl ServerConfig {
    pub fn new_from_env(env: Env) -> Self {
        ServerConfig {
            env,
            database_url: required_var("DATABASE_URL"),
            port: parse_or("PORT", optional_var("PORT"), 3000),
            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                optional_var("DATABASE_MAX_CONNECTIONS"),
                DEFAULT_MAX_CONNECTIONS,
            ),
            database_acquire_timeout: Duration::from_secs(parse_or(
                "DATABASE_ACQUIRE_TIMEOUT_SECS",
                optional_var("DATABASE_ACQUIRE_TIMEOUT_SECS"),
                10,
            )),
            cors_allowed_origins: parse_origins(optional_var("CORS_ALLOWED_ORIGINS")),
        }
    }
}
