//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The configuration
//! file path defaults to `config.yaml` but can be specified via `-f` flag or `UPLINK_CONFIG`
//! environment variable.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `UPLINK_` override YAML values
//!
//! For nested config values, use double underscores in environment variables. For example,
//! `UPLINK_WEBHOOK__ENDPOINT=https://hooks.example.com/abc` sets the `webhook.endpoint` field.
//!
//! ## Configuration Structure
//!
//! - **Server**: `host`, `port` - HTTP server binding configuration
//! - **Auth**: `auth.header_name`, `auth.api_key` - inbound API key check
//! - **Webhook**: `webhook.endpoint`, `webhook.timeout` - outbound relay target
//! - **Fetch**: `fetch.timeout` - remote URL download settings
//! - **Limits**: `limits.max_upload_bytes` - inbound request body cap
//! - **CORS**: `cors.allowed_origins` - browser client origins

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "UPLINK_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    /// Useful for CI/CD pipelines to catch config errors before deployment.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// This is the root configuration structure loaded from YAML and environment variables.
/// All fields have sensible defaults defined in the `Default` implementation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Inbound API key authentication
    pub auth: AuthConfig,
    /// Outbound webhook relay target
    pub webhook: WebhookConfig,
    /// Remote URL download settings
    pub fetch: FetchConfig,
    /// Resource limits for inbound requests
    pub limits: LimitsConfig,
    /// CORS configuration for browser clients
    pub cors: CorsConfig,
}

/// Inbound authentication configuration.
///
/// Requests to `/upload` must present the configured key in the configured
/// header. The comparison is plain equality. When `api_key` is unset the
/// check is disabled entirely.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// HTTP header carrying the API key
    pub header_name: String,
    /// Expected API key value; `None` disables authentication
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            header_name: "x-api-key".to_string(),
            api_key: None,
        }
    }
}

/// Outbound webhook configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebhookConfig {
    /// Webhook endpoint files are relayed to. Uploads fail with a
    /// configuration error while this is unset; the server still boots so the
    /// endpoint can be provisioned after deployment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Url>,
    /// HTTP timeout for webhook deliveries (default: 30s)
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Remote URL fetch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// HTTP timeout for remote URL downloads (default: 30s)
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

/// Resource limits for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum inbound request body size in bytes. Oversized uploads are
    /// rejected with HTTP 413 before the relay pipeline runs.
    /// Default: 8MB
    pub max_upload_bytes: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 8 * 1024 * 1024, // 8MB
        }
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins for CORS requests
    pub allowed_origins: Vec<CorsOrigin>,
}

/// CORS origin specification.
///
/// Can be either a wildcard (`*`) to allow all origins, or a specific URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CorsOrigin {
    /// Allow all origins (`*`)
    #[serde(deserialize_with = "parse_wildcard")]
    Wildcard,
    /// Specific origin URL (e.g., `https://app.example.com`)
    #[serde(deserialize_with = "parse_url")]
    Url(Url),
}

fn parse_wildcard<'de, D>(deserializer: D) -> Result<(), D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    if s == "*" {
        Ok(())
    } else {
        Err(serde::de::Error::custom("Expected '*'"))
    }
}

fn parse_url<'de, D>(deserializer: D) -> Result<Url, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    Url::parse(&s).map_err(serde::de::Error::custom)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            auth: AuthConfig::default(),
            webhook: WebhookConfig::default(),
            fetch: FetchConfig::default(),
            limits: LimitsConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    /// Build the figment for config loading (YAML file + env overrides)
    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            .merge(Yaml::file(&args.config))
            .merge(Env::prefixed("UPLINK_").split("__"))
    }

    /// Cross-field validation run after loading.
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(key) = &self.auth.api_key {
            if key.is_empty() {
                anyhow::bail!("auth.api_key must not be empty; omit it to disable authentication");
            }
        }
        if self.limits.max_upload_bytes == 0 {
            anyhow::bail!("limits.max_upload_bytes must be greater than zero");
        }
        if self.webhook.timeout.is_zero() || self.fetch.timeout.is_zero() {
            anyhow::bail!("webhook.timeout and fetch.timeout must be greater than zero");
        }
        Ok(())
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
