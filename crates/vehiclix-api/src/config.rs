use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use eyre::WrapErr;

use vehiclix_reports::dispatcher::DispatcherConfig;

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_ISSUER: &str = "vehiclix";
const DEFAULT_AUDIENCE: &str = "vehiclix-web";

/// Service configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind: SocketAddr,
    /// When unset, records are kept in memory for the life of the process.
    pub bucket: Option<String>,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub dispatcher: DispatcherConfig,
}

impl ApiConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = var("VEHICLIX_JWT_SECRET")
            .ok_or_else(|| eyre::eyre!("VEHICLIX_JWT_SECRET must be set"))?;

        let defaults = DispatcherConfig::default();
        let workers = parsed(&var, "VEHICLIX_REPORT_WORKERS", defaults.workers)?;
        if workers == 0 {
            eyre::bail!("VEHICLIX_REPORT_WORKERS must be at least 1");
        }
        let queue_capacity = parsed(&var, "VEHICLIX_REPORT_QUEUE", defaults.queue_capacity)?;
        if queue_capacity == 0 {
            eyre::bail!("VEHICLIX_REPORT_QUEUE must be at least 1");
        }
        let timeout_secs = parsed(
            &var,
            "VEHICLIX_REPORT_TIMEOUT_SECS",
            defaults.job_timeout.as_secs(),
        )?;
        if timeout_secs == 0 {
            eyre::bail!("VEHICLIX_REPORT_TIMEOUT_SECS must be at least 1");
        }

        Ok(Self {
            bind: parsed(&var, "VEHICLIX_BIND", DEFAULT_BIND.parse::<SocketAddr>()?)?,
            bucket: var("VEHICLIX_BUCKET"),
            jwt_secret,
            jwt_issuer: var("VEHICLIX_JWT_ISSUER").unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
            jwt_audience: var("VEHICLIX_JWT_AUDIENCE")
                .unwrap_or_else(|| DEFAULT_AUDIENCE.to_string()),
            dispatcher: DispatcherConfig {
                workers,
                queue_capacity,
                job_timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

fn parsed<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> eyre::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .wrap_err_with(|| format!("invalid value for {key}: {raw}")),
        None => Ok(default),
    }
}
