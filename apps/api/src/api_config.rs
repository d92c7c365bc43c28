use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use masterhub_application::csv_import::CsvDelimiter;
use masterhub_core::AppError;
use tracing_subscriber::EnvFilter;

const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
const DEFAULT_API_HOST: &str = "127.0.0.1";
const DEFAULT_API_PORT: u16 = 8000;
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CSV_IMPORT_MAX_BYTES: usize = 5 * 1024 * 1024;
const MIN_SESSION_SECRET_LENGTH: usize = 32;

/// What the binary does after loading its configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Serve,
    Migrate,
    Seed,
}

impl RunMode {
    fn from_argument(argument: Option<&str>) -> Result<Self, AppError> {
        match argument {
            None => Ok(Self::Serve),
            Some("migrate") => Ok(Self::Migrate),
            Some("seed") => Ok(Self::Seed),
            Some(other) => Err(AppError::Validation(format!(
                "unknown command '{other}' (expected 'migrate' or 'seed')"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub run_mode: RunMode,
    pub database_url: String,
    pub database_max_connections: u32,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
    pub csv_import_max_bytes: usize,
    pub csv_import_delimiter: CsvDelimiter,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let argument = env::args().nth(1);
        Self::from_source(argument.as_deref(), |name| env::var(name).ok())
    }

    fn from_source(
        argument: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let run_mode = RunMode::from_argument(argument)?;

        let database_url = lookup("DATABASE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| AppError::Validation("DATABASE_URL is required".to_owned()))?;

        let session_secret = lookup("SESSION_SECRET")
            .ok_or_else(|| AppError::Validation("SESSION_SECRET is required".to_owned()))?;
        if session_secret.len() < MIN_SESSION_SECRET_LENGTH {
            return Err(AppError::Validation(format!(
                "SESSION_SECRET must be at least {MIN_SESSION_SECRET_LENGTH} characters"
            )));
        }

        let csv_import_delimiter = match lookup("CSV_IMPORT_DELIMITER") {
            Some(value) => CsvDelimiter::from_str(&value).map_err(|error| {
                AppError::Validation(format!("invalid CSV_IMPORT_DELIMITER: {error}"))
            })?,
            None => CsvDelimiter::default(),
        };

        Ok(Self {
            run_mode,
            database_url,
            database_max_connections: parsed(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_DATABASE_MAX_CONNECTIONS,
            )?,
            frontend_url: lookup("FRONTEND_URL")
                .unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_owned()),
            api_host: lookup("API_HOST").unwrap_or_else(|| DEFAULT_API_HOST.to_owned()),
            api_port: parsed(&lookup, "API_PORT", DEFAULT_API_PORT)?,
            cookie_secure: lookup("SESSION_COOKIE_SECURE")
                .is_some_and(|value| value.eq_ignore_ascii_case("true")),
            csv_import_max_bytes: parsed(
                &lookup,
                "CSV_IMPORT_MAX_BYTES",
                DEFAULT_CSV_IMPORT_MAX_BYTES,
            )?,
            csv_import_delimiter,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

fn parsed<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name).filter(|value| !value.trim().is_empty()) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name} '{value}': {error}"))),
        None => Ok(default),
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
