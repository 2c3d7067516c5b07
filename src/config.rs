use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub appwrite: AppwriteSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Appwrite,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_seed_on_start")]
    pub seed_on_start: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            seed_on_start: default_seed_on_start(),
        }
    }
}

fn default_seed_on_start() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct AppwriteSettings {
    #[serde(default = "default_appwrite_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default = "default_database_id")]
    pub database_id: String,
    #[serde(default = "default_psws_collection")]
    pub psws_collection: String,
    #[serde(default = "default_bookings_collection")]
    pub bookings_collection: String,
    #[serde(default = "default_conversations_collection")]
    pub conversations_collection: String,
}

impl Default for AppwriteSettings {
    fn default() -> Self {
        Self {
            endpoint: default_appwrite_endpoint(),
            api_key: String::new(),
            project_id: String::new(),
            database_id: default_database_id(),
            psws_collection: default_psws_collection(),
            bookings_collection: default_bookings_collection(),
            conversations_collection: default_conversations_collection(),
        }
    }
}

fn default_appwrite_endpoint() -> String { "https://cloud.appwrite.io/v1".to_string() }
fn default_database_id() -> String { "psw_booking".to_string() }
fn default_psws_collection() -> String { "psws".to_string() }
fn default_bookings_collection() -> String { "bookings".to_string() }
fn default_conversations_collection() -> String { "conversations".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_ttl() -> u64 { 300 }
fn default_cache_capacity() -> u64 { 1000 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_radius_km: default_radius_km(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl MatchingSettings {
    /// Requested limit, falling back to the default and capped at `max_limit`
    pub fn clamp_limit(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_limit).min(self.max_limit)
    }
}

fn default_radius_km() -> f64 { 15.0 }
fn default_limit() -> usize { 5 }
fn default_max_limit() -> usize { 50 }

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default = "default_baseline")]
    pub baseline: f64,
    #[serde(default = "default_distance_penalty")]
    pub distance_penalty: f64,
    #[serde(default = "default_rating_weight")]
    pub rating_weight: f64,
    #[serde(default = "default_review_weight")]
    pub review_weight: f64,
    #[serde(default = "default_review_cap")]
    pub review_cap: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            baseline: default_baseline(),
            distance_penalty: default_distance_penalty(),
            rating_weight: default_rating_weight(),
            review_weight: default_review_weight(),
            review_cap: default_review_cap(),
        }
    }
}

impl From<&ScoringSettings> for ScoringWeights {
    fn from(s: &ScoringSettings) -> Self {
        ScoringWeights {
            baseline: s.baseline,
            distance_penalty: s.distance_penalty,
            rating_weight: s.rating_weight,
            review_weight: s.review_weight,
            review_cap: s.review_cap,
        }
    }
}

fn default_baseline() -> f64 { 100.0 }
fn default_distance_penalty() -> f64 { 2.0 }
fn default_rating_weight() -> f64 { 5.0 }
fn default_review_weight() -> f64 { 0.5 }
fn default_review_cap() -> f64 { 10.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml, then config/local.toml)
    /// 3. Environment variables (prefixed with PSW__)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PSW__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("PSW")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("PSW")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the conventional Appwrite variables (`APPWRITE_ENDPOINT`,
/// `APPWRITE_API_KEY`, `APPWRITE_PROJECT_ID`, `APPWRITE_DATABASE_ID`) on top of
/// the loaded configuration
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("APPWRITE_ENDPOINT", "appwrite.endpoint"),
        ("APPWRITE_API_KEY", "appwrite.api_key"),
        ("APPWRITE_PROJECT_ID", "appwrite.project_id"),
        ("APPWRITE_DATABASE_ID", "appwrite.database_id"),
    ];

    let mut builder = Config::builder().add_source(settings);
    for (var, key) in overrides {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring() {
        let weights = ScoringWeights::from(&ScoringSettings::default());
        assert_eq!(weights, ScoringWeights::default());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let settings: Settings = Config::builder().build().unwrap().try_deserialize().unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.store.backend, StoreBackend::Memory);
        assert!(settings.store.seed_on_start);
        assert_eq!(settings.matching.default_radius_km, 15.0);
        assert_eq!(settings.appwrite.psws_collection, "psws");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("psw-match-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "[store]\nbackend = \"appwrite\"\nseed_on_start = false\n\n[matching]\nmax_limit = 20\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.store.backend, StoreBackend::Appwrite);
        assert!(!settings.store.seed_on_start);
        assert_eq!(settings.matching.max_limit, 20);
        assert_eq!(settings.matching.default_limit, 5);
    }

    #[test]
    fn test_clamp_limit() {
        let matching = MatchingSettings::default();
        assert_eq!(matching.clamp_limit(None), 5);
        assert_eq!(matching.clamp_limit(Some(3)), 3);
        assert_eq!(matching.clamp_limit(Some(500)), 50);
    }
}
