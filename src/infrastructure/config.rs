use thiserror::Error;

const DEV_JWT_SECRET: &str = "dev-only-insecure-jwt-secret";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_secs: u64,
    pub cors_allowed_origins: Vec<String>,
    pub log_level: String,
}

impl AppConfig {
    /// Reads process environment; call `dotenv::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port_raw = get("PORT", "5000");
        let port = port_raw.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
            key: "PORT",
            value: port_raw.clone(),
        })?;

        let ttl_raw = get("JWT_TTL_SECS", "3600");
        let jwt_ttl_secs = ttl_raw
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue {
                key: "JWT_TTL_SECS",
                value: ttl_raw.clone(),
            })?;

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEV_JWT_SECRET.to_string());

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            host: get("HOST", "127.0.0.1"),
            port,
            jwt_secret,
            jwt_ttl_secs,
            cors_allowed_origins,
            log_level: get("LOG_LEVEL", "info"),
        })
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
