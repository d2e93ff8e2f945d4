//! Application settings and configuration management

use crate::error::{AppError, Result};
use crate::gateway::persona::{GENERAL_PERSONA, PLACE_PERSONA};
use axum::http::HeaderValue;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default configuration file, optional
pub const DEFAULT_CONFIG_PATH: &str = "config/travelbot.yaml";

/// Prefix for structured environment overrides (`TRAVELBOT__SERVER__PORT`)
pub const ENV_PREFIX: &str = "TRAVELBOT";

/// Upper bound on images returned for a place
pub const MAX_IMAGES: u32 = 5;

/// Smallest page size the image provider accepts
pub const MIN_IMAGE_PAGE: u32 = 3;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub flights: FlightsConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Guard on the whole request, upstream calls included
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_request_timeout() -> u64 {
    90
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// CORS configuration for the browser front-end
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Flight offer provider (OAuth2 client credentials + offer search)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlightsConfig {
    #[serde(default = "default_flights_base_url")]
    pub base_url: String,
    #[serde(default = "default_token_path")]
    pub token_path: String,
    #[serde(default = "default_search_path")]
    pub search_path: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
    #[serde(default = "default_adults")]
    pub adults: u32,
    #[serde(default = "default_flights_timeout")]
    pub timeout_ms: u64,
    /// Reuse the bearer token until shortly before it expires
    #[serde(default)]
    pub cache_token: bool,
}

fn default_flights_base_url() -> String {
    "https://test.api.amadeus.com".to_string()
}

fn default_token_path() -> String {
    "/v1/security/oauth2/token".to_string()
}

fn default_search_path() -> String {
    "/v2/shopping/flight-offers".to_string()
}

fn default_adults() -> u32 {
    1
}

fn default_flights_timeout() -> u64 {
    10000
}

impl Default for FlightsConfig {
    fn default() -> Self {
        Self {
            base_url: default_flights_base_url(),
            token_path: default_token_path(),
            search_path: default_search_path(),
            api_key: String::new(),
            api_secret: String::new(),
            adults: default_adults(),
            timeout_ms: default_flights_timeout(),
            cache_token: false,
        }
    }
}

impl FlightsConfig {
    pub fn token_url(&self) -> String {
        join_url(&self.base_url, &self.token_path)
    }

    pub fn search_url(&self) -> String {
        join_url(&self.base_url, &self.search_path)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Image search provider
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImagesConfig {
    #[serde(default = "default_images_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default = "default_images_timeout")]
    pub timeout_ms: u64,
}

fn default_images_base_url() -> String {
    "https://pixabay.com/api/".to_string()
}

fn default_per_page() -> u32 {
    MAX_IMAGES
}

fn default_images_timeout() -> u64 {
    5000
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            base_url: default_images_base_url(),
            api_key: String::new(),
            per_page: default_per_page(),
            timeout_ms: default_images_timeout(),
        }
    }
}

impl ImagesConfig {
    /// Requested result count, never above [`MAX_IMAGES`]
    pub fn result_cap(&self) -> u32 {
        self.per_page.min(MAX_IMAGES)
    }

    /// Page size sent to the provider, raised to [`MIN_IMAGE_PAGE`]
    pub fn page_size(&self) -> u32 {
        self.result_cap().max(MIN_IMAGE_PAGE)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Chat completion provider (OpenAI compatible)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatConfig {
    #[serde(default = "default_chat_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_chat_timeout")]
    pub timeout_ms: u64,
    #[serde(default = "default_place_persona")]
    pub place_persona: String,
    #[serde(default = "default_general_persona")]
    pub general_persona: String,
}

fn default_chat_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_chat_timeout() -> u64 {
    60000
}

fn default_place_persona() -> String {
    PLACE_PERSONA.to_string()
}

fn default_general_persona() -> String {
    GENERAL_PERSONA.to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: default_chat_base_url(),
            api_key: String::new(),
            model: default_model(),
            timeout_ms: default_chat_timeout(),
            place_persona: default_place_persona(),
            general_persona: default_general_persona(),
        }
    }
}

impl ChatConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn config_error(message: impl Into<String>) -> AppError {
    AppError::Config(config::ConfigError::Message(message.into()))
}

impl Settings {
    /// Load settings from the default file, the environment and `.env` secrets
    pub fn load() -> Result<Self> {
        let mut settings = Self::load_from_path(DEFAULT_CONFIG_PATH)?;
        settings.apply_env_fallbacks(|name| std::env::var(name).ok());
        Ok(settings)
    }

    /// Load settings from a specific configuration file plus `TRAVELBOT__*` overrides
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let format = if path.extension().map_or(false, |ext| ext == "toml") {
            FileFormat::Toml
        } else {
            FileFormat::Yaml
        };

        let mut config_builder = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port() as i64)?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?;

        if path.exists() {
            config_builder = config_builder.add_source(File::from(path).format(format));
        }

        config_builder = config_builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("cors.allowed_origins")
                .try_parsing(true),
        );

        let config = config_builder.build()?;
        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// Fill empty credentials from the provider-named variables
    /// (`AMADEUS_API_KEY`, `AMADEUS_API_SECRET`, `PIXABAY_API_KEY`, `OPENAI_API_KEY`).
    pub fn apply_env_fallbacks<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let slots: [(&mut String, &str); 4] = [
            (&mut self.flights.api_key, "AMADEUS_API_KEY"),
            (&mut self.flights.api_secret, "AMADEUS_API_SECRET"),
            (&mut self.images.api_key, "PIXABAY_API_KEY"),
            (&mut self.chat.api_key, "OPENAI_API_KEY"),
        ];

        for (slot, var) in slots {
            if slot.is_empty() {
                if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
                    *slot = value;
                }
            }
        }
    }

    /// Parsed CORS origins
    pub fn cors_origins(&self) -> Result<Vec<HeaderValue>> {
        self.cors
            .allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|_| config_error(format!("Invalid CORS origin '{}'", origin)))
            })
            .collect()
    }

    /// Longest a single message can spend on upstream calls: token then search,
    /// or image search alongside the completion
    pub fn upstream_budget(&self) -> Duration {
        let flight_branch = self.flights.timeout() * 2;
        let place_branch = self.images.timeout().max(self.chat.timeout());
        flight_branch.max(place_branch)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(config_error("Server port cannot be 0"));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(config_error("Request timeout cannot be 0"));
        }

        self.cors_origins()?;

        for (name, timeout_ms) in [
            ("flights", self.flights.timeout_ms),
            ("images", self.images.timeout_ms),
            ("chat", self.chat.timeout_ms),
        ] {
            if timeout_ms == 0 {
                return Err(config_error(format!("Timeout for '{}' cannot be 0", name)));
            }
        }

        if self.flights.api_key.is_empty() || self.flights.api_secret.is_empty() {
            return Err(config_error("Flight provider client id and secret are required"));
        }
        if self.images.api_key.is_empty() {
            return Err(config_error("Image search API key is required"));
        }
        if self.chat.api_key.is_empty() {
            return Err(config_error("Chat completion API key is required"));
        }
        if self.chat.model.trim().is_empty() {
            return Err(config_error("Chat model cannot be empty"));
        }
        if self.images.per_page == 0 {
            return Err(config_error("Image per_page must be at least 1"));
        }
        if self.server.request_timeout() <= self.upstream_budget() {
            return Err(config_error(format!(
                "Request timeout ({}s) must exceed the upstream timeouts ({}ms)",
                self.server.request_timeout_secs,
                self.upstream_budget().as_millis()
            )));
        }

        Ok(())
    }
}
