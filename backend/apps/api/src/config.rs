//! Server configuration read from the environment
//!
//! `.env` is loaded by `main` before [`ServerConfig::from_env`] runs.

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::Context;
use auth::AuthConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 3600;
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Everything the server needs to start
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub database_url: String,
    pub request_timeout: Duration,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = var_or("HOST", DEFAULT_HOST);
        let port = match env::var("PORT") {
            Ok(port) => port.parse::<u16>().context("PORT must be a port number")?,
            Err(_) => DEFAULT_PORT,
        };
        let ip: IpAddr = host
            .parse()
            .with_context(|| format!("HOST must be an IP address, got {host:?}"))?;

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

        let request_timeout = request_timeout(env::var("REQUEST_TIMEOUT_SECS").ok().as_deref())?;

        let frontend_origins = var_or("FRONTEND_ORIGINS", DEFAULT_FRONTEND_ORIGINS)
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let auth = auth_config(&host, port)?;

        Ok(Self {
            addr: SocketAddr::new(ip, port),
            database_url,
            request_timeout,
            frontend_origins,
            auth,
        })
    }
}

/// Parse `REQUEST_TIMEOUT_SECS`, bounded to `1..=MAX_REQUEST_TIMEOUT_SECS`
fn request_timeout(raw: Option<&str>) -> anyhow::Result<Duration> {
    let Some(raw) = raw else {
        return Ok(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
    };

    let secs: u64 = raw
        .trim()
        .parse()
        .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?;
    if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&secs) {
        anyhow::bail!("REQUEST_TIMEOUT_SECS must be between 1 and {MAX_REQUEST_TIMEOUT_SECS}, got {secs}");
    }

    Ok(Duration::from_secs(secs))
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn auth_config(host: &str, port: u16) -> anyhow::Result<AuthConfig> {
    let mut config = match env::var("JWT_SECRET") {
        Ok(secret) if !secret.is_empty() => AuthConfig::with_secret(secret),
        _ if cfg!(debug_assertions) => {
            tracing::warn!("JWT_SECRET not set, using a random secret for this run");
            AuthConfig::development()
        }
        _ => anyhow::bail!("JWT_SECRET must be set in production"),
    };

    config.activation_url = env::var("ACTIVATION_URL")
        .unwrap_or_else(|_| format!("http://{host}:{port}/api/v1/user/activate"));
    config.password_reset_url = env::var("PASSWORD_RESET_URL")
        .unwrap_or_else(|_| format!("http://{host}:{port}/api/v1/user/password/reset"));
    config.password_pepper = env::var("PASSWORD_PEPPER")
        .ok()
        .filter(|pepper| !pepper.is_empty())
        .map(String::into_bytes);

    Ok(config)
}
