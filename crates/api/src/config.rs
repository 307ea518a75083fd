use estate_core::signing::Credentials;
use estate_core::token::DEFAULT_TOKEN_TTL_MS;
use estate_core::types::EpochMillis;

/// Server configuration loaded from environment variables.
///
/// Everything except the token secret and object-store credentials has a
/// default suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Bounded wait for a lead's lease guard in seconds (default: `10`).
    pub lease_wait_secs: u64,
    /// Postgres ledger URL. The in-memory ledger is used when unset.
    pub database_url: Option<String>,
    pub token: TokenConfig,
    pub storage: StorageConfig,
}

/// Session token signing configuration.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HMAC-SHA256 secret used to sign and verify session tokens.
    pub secret: String,
    /// Token lifetime in milliseconds (default: 24 hours).
    pub ttl_ms: EpochMillis,
}

/// Object-store bucket and credentials.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    pub credentials: Credentials,
    /// Overrides the virtual-hosted bucket endpoint, e.g. for a local S3
    /// stand-in: `host[:port]` or `http(s)://host[:port]`.
    pub endpoint: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:8081`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `LEASE_WAIT_SECS`      | `10`                       |
    /// | `DATABASE_URL`         | unset (in-memory ledger)   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:8081".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let lease_wait_secs: u64 = std::env::var("LEASE_WAIT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("LEASE_WAIT_SECS must be a valid u64");

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|s| !s.is_empty());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            lease_wait_secs,
            database_url,
            token: TokenConfig::from_env(),
            storage: StorageConfig::from_env(),
        }
    }
}

impl TokenConfig {
    /// | Env Var           | Required | Default |
    /// |-------------------|----------|---------|
    /// | `JWT_SECRET`      | **yes**  | --      |
    /// | `TOKEN_TTL_HOURS` | no       | `24`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let ttl_ms = match std::env::var("TOKEN_TTL_HOURS") {
            Ok(hours) => {
                let hours: i64 = hours.parse().expect("TOKEN_TTL_HOURS must be a valid i64");
                hours * 60 * 60 * 1000
            }
            Err(_) => DEFAULT_TOKEN_TTL_MS,
        };

        Self { secret, ttl_ms }
    }
}

impl StorageConfig {
    /// | Env Var           | Required | Default     |
    /// |-------------------|----------|-------------|
    /// | `AWS_ACCESS_KEY`  | **yes**  | --          |
    /// | `AWS_SECRET_KEY`  | **yes**  | --          |
    /// | `AWS_BUCKET_NAME` | **yes**  | --          |
    /// | `AWS_REGION`      | no       | `us-east-1` |
    /// | `S3_ENDPOINT`     | no       | --          |
    pub fn from_env() -> Self {
        let access_key = std::env::var("AWS_ACCESS_KEY").expect("AWS_ACCESS_KEY must be set");
        let secret_key = std::env::var("AWS_SECRET_KEY").expect("AWS_SECRET_KEY must be set");
        let bucket = std::env::var("AWS_BUCKET_NAME").expect("AWS_BUCKET_NAME must be set");
        let region = std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".into());
        let endpoint = std::env::var("S3_ENDPOINT")
            .ok()
            .filter(|s| !s.is_empty());

        Self {
            bucket,
            region,
            credentials: Credentials {
                access_key,
                secret_key,
            },
            endpoint,
        }
    }
}
