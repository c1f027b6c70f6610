//! Application configuration management.
//!
//! Values come from optional `config/default.toml` and `config/{RUN_MODE}.toml`
//! files, overridden by `FXGATE__SECTION__KEY` environment variables.

use serde::Deserialize;
use tracing::warn;

/// Refresh period used when the configured one is missing or non-positive.
pub const DEFAULT_REFRESH_INTERVAL_HOURS: u64 = 6;

/// Longest accepted refresh interval (one year).
pub const MAX_REFRESH_INTERVAL_HOURS: u64 = 24 * 365;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Exchange-rate refresh configuration.
    #[serde(default)]
    pub rates: RatesConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
///
/// Either a full `url` or the discrete connection parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL; takes precedence over the discrete fields.
    pub url: Option<String>,
    /// Database host.
    #[serde(default = "default_db_host")]
    pub host: String,
    /// Database port.
    #[serde(default = "default_db_port")]
    pub port: u16,
    /// Database user.
    #[serde(default = "default_db_user")]
    pub user: String,
    /// Database password.
    #[serde(default = "default_db_password")]
    pub password: String,
    /// Database name.
    #[serde(default = "default_db_name")]
    pub name: String,
    /// Postgres `sslmode` parameter.
    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: default_db_host(),
            port: default_db_port(),
            user: default_db_user(),
            password: default_db_password(),
            name: default_db_name(),
            ssl_mode: default_ssl_mode(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

impl DatabaseConfig {
    /// Returns the Postgres connection URL.
    #[must_use]
    pub fn connection_url(&self) -> String {
        self.url.clone().unwrap_or_else(|| {
            format!(
                "postgres://{}:{}@{}:{}/{}?sslmode={}",
                self.user, self.password, self.host, self.port, self.name, self.ssl_mode
            )
        })
    }
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_db_password() -> String {
    "postgres".to_string()
}

fn default_db_name() -> String {
    "currency".to_string()
}

fn default_ssl_mode() -> String {
    "disable".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token lifetime in hours.
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

fn default_token_ttl_hours() -> i64 {
    24
}

impl JwtSettings {
    /// Builds the signing service configuration.
    #[must_use]
    pub fn to_jwt_config(&self) -> crate::jwt::JwtConfig {
        crate::jwt::JwtConfig {
            secret: self.secret.clone(),
            token_ttl: chrono::Duration::hours(self.token_ttl_hours),
        }
    }
}

/// Exchange-rate refresh configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// Upstream provider name (`frankfurter` or `exchangeratehost`).
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Hours between scheduled refreshes.
    #[serde(default = "default_refresh_interval_hours")]
    pub refresh_interval_hours: i64,
    /// Base currency refreshed by the scheduler.
    #[serde(default = "default_base")]
    pub default_base: String,
    /// Upstream request timeout in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Overrides the provider's public endpoint.
    pub base_url: Option<String>,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            refresh_interval_hours: default_refresh_interval_hours(),
            default_base: default_base(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            base_url: None,
        }
    }
}

impl RatesConfig {
    /// Scheduled refresh period.
    ///
    /// Non-positive settings, and settings above [`MAX_REFRESH_INTERVAL_HOURS`],
    /// fall back to 6 hours.
    #[must_use]
    pub fn refresh_interval(&self) -> std::time::Duration {
        let hours = u64::try_from(self.refresh_interval_hours)
            .ok()
            .filter(|hours| (1..=MAX_REFRESH_INTERVAL_HOURS).contains(hours))
            .unwrap_or_else(|| {
                warn!(
                    configured = self.refresh_interval_hours,
                    "Out-of-range rates refresh interval, using default"
                );
                DEFAULT_REFRESH_INTERVAL_HOURS
            });
        std::time::Duration::from_secs(hours.saturating_mul(3600))
    }

    /// Upstream request timeout.
    #[must_use]
    pub const fn fetch_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.fetch_timeout_secs)
    }
}

fn default_provider() -> String {
    "frankfurter".to_string()
}

fn default_refresh_interval_hours() -> i64 {
    6
}

fn default_base() -> String {
    "USD".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FXGATE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
