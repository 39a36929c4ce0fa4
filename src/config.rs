use config::{Config, ConfigError, Environment, File};
use nutype::nutype;
use serde::Deserialize;
use std::env;
use std::time::Duration;
use url::Url;

/// Base URL of the upstream content origin
#[nutype(
    derive(Clone, Debug, Display, Deserialize, Serialize, TryFrom, AsRef),
    validate(predicate = |s: &str| s.starts_with("http://") || s.starts_with("https://")),
)]
pub struct OriginBaseUrl(String);

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub upstream: UpstreamSettings,
    pub cache: CacheSettings,
    pub assets: AssetSettings,
    pub revalidate: RevalidateSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

/// Connection details for the headless CMS backend.
///
/// Credentials are supplied via configuration files or environment
/// variables, never compiled in.
#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamSettings {
    pub base_url: OriginBaseUrl,
    pub api_path: String,
    pub username: String,
    pub password: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl UpstreamSettings {
    /// Parsed origin root, used for host checks and relative-URL resolution
    pub fn origin(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.base_url.as_ref())
    }

    /// Full base of the content API, e.g. `https://cms.example.test/wp-json/wp/v2`
    pub fn api_base(&self) -> String {
        format!(
            "{}{}",
            self.base_url.as_ref().trim_end_matches('/'),
            self.api_path
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheSettings {
    pub ttl_secs: u64,
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssetSettings {
    /// Route the asset proxy is mounted at; rewritten URLs point here
    pub proxy_path: String,
    /// Local placeholder served when an asset cannot be fetched
    pub placeholder_path: String,
    /// `max-age` for the `Cache-Control` header on proxied assets
    pub max_age_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RevalidateSettings {
    /// Shared token for the cache refresh hook; empty disables the endpoint
    pub secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with default values
            .set_default("application.host", "0.0.0.0")?
            .set_default("application.port", 8080)?
            .set_default("upstream.base_url", "https://cms.example.test")?
            .set_default("upstream.api_path", "/wp-json/wp/v2")?
            .set_default("upstream.username", "")?
            .set_default("upstream.password", "")?
            .set_default("upstream.timeout_secs", 10)?
            .set_default("upstream.user_agent", "Mozilla/5.0 (compatible; clubgate)")?
            .set_default("cache.ttl_secs", 300)?
            .set_default("assets.proxy_path", "/api/image-proxy")?
            .set_default("assets.placeholder_path", "/placeholder.svg")?
            .set_default("assets.max_age_secs", 3600)?
            .set_default("revalidate.secret", "")?
            .set_default("logging.level", "info")?
            // Add configuration file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{environment}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix
            .add_source(Environment::with_prefix("CLUBGATE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
