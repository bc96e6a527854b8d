/// Configuration management for the API server
///
/// Configuration comes from environment variables; a `.env` file is loaded
/// first if present.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `PORT`: Port to bind to (default: 8000)
/// - `CORS_ORIGINS`: Comma-separated allowed origins, `*` for any (default: *)
/// - `REQUEST_TIMEOUT_SECONDS`: Per-request deadline (default: 30)
/// - `AUTH_ISSUER`: Expected token issuer (required)
/// - `AUTH_AUDIENCE`: Expected token audience (required)
/// - `AUTH_JWKS_URL`: Key set URL (default: `{AUTH_ISSUER}.well-known/jwks.json`)
/// - `AUTH_IDENTITY_CLAIM` or `NAMESPACE_DOMAIN`: Claim holding the user's email (required)
/// - `JWKS_CACHE_TTL_SECONDS`: Key set cache lifetime, 0 disables (default: 0)
/// - `JWKS_FETCH_TIMEOUT_SECONDS`: Key set fetch timeout (default: 10)
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use tasklist_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Token validation configuration
    pub auth: AuthConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` means permissive
    pub cors_origins: Vec<String>,

    /// Deadline for a whole request, including key fetch and database calls
    pub request_timeout_seconds: u64,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Token validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Expected `iss` claim
    pub issuer: String,

    /// Expected `aud` entry
    pub audience: String,

    /// Published key set URL
    pub jwks_url: String,

    /// Namespaced claim holding the user's email
    pub identity_claim: String,

    /// Key set cache lifetime (0 = fetch on every validation)
    pub jwks_cache_ttl_seconds: u64,

    /// Timeout for one key set fetch
    pub jwks_fetch_timeout_seconds: u64,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a numeric
    /// variable does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()?;
        let cors_origins = parse_origins(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()));
        let request_timeout_seconds = env::var("REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let issuer = env::var("AUTH_ISSUER")
            .map_err(|_| anyhow::anyhow!("AUTH_ISSUER environment variable is required"))?;
        let audience = env::var("AUTH_AUDIENCE")
            .map_err(|_| anyhow::anyhow!("AUTH_AUDIENCE environment variable is required"))?;
        let jwks_url = env::var("AUTH_JWKS_URL").unwrap_or_else(|_| default_jwks_url(&issuer));
        let identity_claim = env::var("AUTH_IDENTITY_CLAIM")
            .or_else(|_| env::var("NAMESPACE_DOMAIN"))
            .map_err(|_| {
                anyhow::anyhow!("AUTH_IDENTITY_CLAIM (or NAMESPACE_DOMAIN) environment variable is required")
            })?;
        let jwks_cache_ttl_seconds = env::var("JWKS_CACHE_TTL_SECONDS")
            .unwrap_or_else(|_| "0".to_string())
            .parse::<u64>()?;
        let jwks_fetch_timeout_seconds = env::var("JWKS_FETCH_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()?;

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
                request_timeout_seconds,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            auth: AuthConfig {
                issuer,
                audience,
                jwks_url,
                identity_claim,
                jwks_cache_ttl_seconds,
                jwks_fetch_timeout_seconds,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Pool settings for the shared database layer
    pub fn pool_config(&self) -> tasklist_shared::db::pool::DatabaseConfig {
        tasklist_shared::db::pool::DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            ..Default::default()
        }
    }
}

/// Key set location conventionally published by the issuer
fn default_jwks_url(issuer: &str) -> String {
    format!("{}/.well-known/jwks.json", issuer.trim_end_matches('/'))
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
