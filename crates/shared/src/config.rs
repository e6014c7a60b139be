//! Application configuration management.

use serde::Deserialize;

use crate::jwt::JwtConfig;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Account sharing configuration.
    #[serde(default)]
    pub sharing: SharingConfig,
    /// Administrator bootstrap configuration.
    #[serde(default)]
    pub admin: AdminConfig,
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

/// JWT settings as read from configuration sources.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
    /// Refresh token expiration in seconds.
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> u64 {
    604_800 // 7 days
}

impl From<&JwtSettings> for JwtConfig {
    fn from(settings: &JwtSettings) -> Self {
        Self {
            secret: settings.secret.clone(),
            access_token_expires_secs: i64::try_from(settings.access_token_expiry_secs)
                .unwrap_or(i64::MAX),
            refresh_token_expires_secs: i64::try_from(settings.refresh_token_expiry_secs)
                .unwrap_or(i64::MAX),
        }
    }
}

/// Account sharing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SharingConfig {
    /// Hours a generated share token stays redeemable.
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

impl Default for SharingConfig {
    fn default() -> Self {
        Self {
            token_ttl_hours: default_token_ttl_hours(),
        }
    }
}

fn default_token_ttl_hours() -> i64 {
    72
}

/// Administrator bootstrap configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminConfig {
    /// Emails that receive the admin role when they register.
    #[serde(default)]
    pub emails: Vec<String>,
}

impl AdminConfig {
    /// Returns true if the email belongs to a configured administrator.
    #[must_use]
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.emails.iter().any(|e| e.eq_ignore_ascii_case(email.trim()))
    }
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
            .add_source(
                config::Environment::with_prefix("TALLY")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("admin.emails"),
            )
            .build()?;

        config.try_deserialize()
    }
}
