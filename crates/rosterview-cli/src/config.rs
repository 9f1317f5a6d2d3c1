//! CLI configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/rosterview/config.toml` by default:
//!
//! ```toml
//! [api]
//! base_url = "https://rch.weroster.com.au"
//! timeout_secs = 30
//! request_delay_ms = 1000
//!
//! [credentials]
//! email = "env::EMAIL"
//! password = "pass::roster/login"
//!
//! [filters]
//! designations = ["registrar"]
//! exclude_names = ["---unassigned---"]
//! ```
//!
//! Credential values support secret references (see [`crate::secret`]). When
//! a credential is not configured, the `EMAIL` / `PASSWORD` environment
//! variables are used instead.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rosterview_api::{ApiConfig, Credentials};
use rosterview_core::{ConfigError, FilterConfig, UNASSIGNED_NAME};
use serde::{Deserialize, Serialize};

/// Environment variable holding the login email.
pub const EMAIL_ENV: &str = "EMAIL";

/// Environment variable holding the login password.
pub const PASSWORD_ENV: &str = "PASSWORD";

/// Configuration for the rosterview CLI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Upstream API settings.
    pub api: ApiSettings,

    /// Login credentials.
    pub credentials: CredentialSettings,

    /// Aggregation filters.
    pub filters: FilterSettings,
}

/// Upstream API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Roster site, scheme and host.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Pause between week requests in milliseconds.
    pub request_delay_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: ApiConfig::DEFAULT_BASE_URL.to_string(),
            timeout_secs: ApiConfig::DEFAULT_TIMEOUT_SECS,
            request_delay_ms: ApiConfig::DEFAULT_REQUEST_DELAY_MS,
        }
    }
}

/// Login credentials (support `pass::` and `env::` prefixes).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialSettings {
    /// Account email.
    pub email: Option<String>,

    /// Account password.
    pub password: Option<String>,
}

/// Which staff assignments the reports count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Designations to count, case-insensitive.
    pub designations: Vec<String>,

    /// Staff names never counted, case-insensitive.
    pub exclude_names: Vec<String>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            designations: vec!["registrar".to_string()],
            exclude_names: vec![UNASSIGNED_NAME.to_string()],
        }
    }
}

impl FilterSettings {
    /// Converts to the aggregation filter.
    pub fn to_filter(&self) -> FilterConfig {
        FilterConfig::new(&self.designations, &self.exclude_names)
    }
}

impl RosterConfig {
    /// Loads configuration from the default path, or defaults if absent.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rosterview")
    }

    /// Builds the API client configuration.
    pub fn to_api_config(&self) -> Result<ApiConfig, ConfigError> {
        let config = ApiConfig::new(&self.api.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.api.base_url, e)))?;

        Ok(config
            .with_timeout(Duration::from_secs(self.api.timeout_secs))
            .with_request_delay(Duration::from_millis(self.api.request_delay_ms))
            .with_filter(self.filters.to_filter()))
    }

    /// Resolves the login credentials from config or the environment.
    pub fn resolve_credentials(&self) -> Result<Credentials, ConfigError> {
        self.resolve_credentials_with(|var| std::env::var(var).ok())
    }

    /// Like [`resolve_credentials`](Self::resolve_credentials) with a custom
    /// environment lookup for the fallbacks.
    pub(crate) fn resolve_credentials_with<F>(&self, lookup: F) -> Result<Credentials, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let email = resolve_field(self.credentials.email.as_deref(), EMAIL_ENV, "email", &lookup)?;
        let password = resolve_field(
            self.credentials.password.as_deref(),
            PASSWORD_ENV,
            "password",
            &lookup,
        )?;
        Ok(Credentials::new(email, password))
    }

    /// Checks everything that can be checked without a network round trip.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.to_api_config()?;

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Parse("api.timeout_secs must be positive".to_string()));
        }
        if self.filters.designations.is_empty() {
            return Err(ConfigError::Parse(
                "filters.designations must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// A copy safe to print: plain-text secrets are masked, references kept.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        config.credentials.password = config.credentials.password.map(|p| {
            if crate::secret::is_reference(&p) {
                p
            } else {
                "<redacted>".to_string()
            }
        });
        config
    }
}

fn resolve_field<F>(
    configured: Option<&str>,
    env_var: &str,
    name: &str,
    lookup: &F,
) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = match configured {
        Some(raw) => crate::secret::resolve(raw)?,
        None => lookup(env_var).ok_or_else(|| {
            ConfigError::MissingCredentials(format!(
                "set [credentials] {} in {} or the {} environment variable",
                name,
                RosterConfig::default_path().display(),
                env_var
            ))
        })?,
    };

    if value.is_empty() {
        return Err(ConfigError::MissingCredentials(format!("{} is empty", name)));
    }
    Ok(value)
}
