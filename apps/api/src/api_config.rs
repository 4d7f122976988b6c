use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tasklane_application::DEFAULT_MAX_HIERARCHY_DEPTH;
use tasklane_core::AppError;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 250;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub max_hierarchy_depth: usize,
    pub lookup_timeout: Duration,
    pub organization_seed_path: Option<PathBuf>,
    pub caller_tokens_path: Option<PathBuf>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let max_hierarchy_depth = positive_env(
            "AUTHZ_MAX_HIERARCHY_DEPTH",
            DEFAULT_MAX_HIERARCHY_DEPTH as u64,
        )? as usize;
        let lookup_timeout = Duration::from_millis(positive_env(
            "AUTHZ_LOOKUP_TIMEOUT_MS",
            DEFAULT_LOOKUP_TIMEOUT_MS,
        )?);

        Ok(Self {
            frontend_url,
            api_host,
            api_port,
            max_hierarchy_depth,
            lookup_timeout,
            organization_seed_path: optional_path_env("ORGANIZATION_SEED_PATH"),
            caller_tokens_path: optional_path_env("CALLER_TOKENS_PATH"),
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
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

fn positive_env(name: &str, default: u64) -> Result<u64, AppError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => parse_positive(name, value.as_str()),
        _ => Ok(default),
    }
}

fn parse_positive(name: &str, value: &str) -> Result<u64, AppError> {
    let parsed = value
        .trim()
        .parse::<u64>()
        .map_err(|error| AppError::Validation(format!("invalid {name}: {error}")))?;

    if parsed == 0 {
        return Err(AppError::Validation(format!("{name} must be at least 1")));
    }

    Ok(parsed)
}

fn optional_path_env(name: &str) -> Option<PathBuf> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}
