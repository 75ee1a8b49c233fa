use std::str::FromStr;

/// Where records are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    /// Process-local tables, lost on restart.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => anyhow::bail!("STORAGE_BACKEND must be 'postgres' or 'memory', got '{}'", other),
        }
    }
}

/// Per-IP request budget for procedure routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub per_second: u64,
    pub burst_size: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage_backend: StorageBackend,
    /// Required for the Postgres backend.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub port: u16,
    /// `None` disables rate limiting.
    pub rate_limit: Option<RateLimit>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Storage backend: {:?}", config.storage_backend);
        if let Some(ref url) = config.database_url {
            tracing::debug!("Database: {}", redact_database_url(url));
        }
        tracing::debug!("Server Port: {}", config.port);
        match config.rate_limit {
            Some(limit) => tracing::debug!(
                "Rate limit: {} req/s, burst {}",
                limit.per_second,
                limit.burst_size
            ),
            None => tracing::warn!("Rate limiting disabled"),
        }

        Ok(config)
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage_backend = match lookup("STORAGE_BACKEND").filter(|s| !s.trim().is_empty()) {
            Some(value) => value.parse()?,
            None => StorageBackend::Postgres,
        };

        let database_url = lookup("DATABASE_URL")
            .or_else(|| lookup("DB_URL"))
            .filter(|url| !url.trim().is_empty());

        let database_url = match (storage_backend, database_url) {
            (StorageBackend::Postgres, None) => {
                anyhow::bail!("DATABASE_URL or DB_URL environment variable required")
            }
            (_, Some(url)) => Some(validate_database_url(url)?),
            (StorageBackend::Memory, None) => None,
        };

        let port = lookup("SERVER_PORT")
            .or_else(|| lookup("PORT"))
            .unwrap_or_else(|| "2022".to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("SERVER_PORT must be a valid number between 1-65535"))?;

        let db_max_connections: u32 = parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?;
        if db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }

        let per_second: u64 = parse_or(&lookup, "RATE_LIMIT_PER_SECOND", 10)?;
        let burst_size: u32 = parse_or(&lookup, "RATE_LIMIT_BURST", 20)?;
        let rate_limit = if per_second == 0 {
            None
        } else {
            if burst_size == 0 {
                anyhow::bail!("RATE_LIMIT_BURST must be at least 1 when rate limiting is on");
            }
            Some(RateLimit {
                per_second,
                burst_size,
            })
        };

        Ok(Self {
            storage_backend,
            database_url,
            db_max_connections,
            port,
            rate_limit,
        })
    }
}

fn validate_database_url(url: String) -> anyhow::Result<String> {
    if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
        anyhow::bail!("DATABASE_URL must start with postgresql:// or postgres://");
    }
    url::Url::parse(&url).map_err(|e| anyhow::anyhow!("DATABASE_URL is not a valid URL: {}", e))?;
    Ok(url)
}

/// Renders `scheme://host:port/db` without the userinfo.
fn redact_database_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(url) => {
            let host = url.host_str().unwrap_or("localhost");
            let port = url.port().map(|p| format!(":{}", p)).unwrap_or_default();
            format!("{}://{}{}{}", url.scheme(), host, port, url.path())
        }
        Err(_) => "<unparseable>".to_string(),
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|s| !s.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a non-negative integer, got '{}'", key, raw)),
        None => Ok(default),
    }
}
