use client::transport::ApiConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiSettings,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

// Default value functions
fn default_request_timeout() -> u64 {
    30
}
fn default_log_level() -> String {
    "warn".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}
fn default_page_size() -> usize {
    shared::pagination::DEFAULT_PAGE_SIZE
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with CATALOG__ prefix
    /// 4. `base_url`, when given on the command line
    pub fn load(base_url: Option<&str>) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("CATALOG").separator("__"))
            .set_override_option("api.base_url", base_url)?
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides, without touching
    /// the file system.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [api]
            base_url = "http://localhost:8080/api"
            request_timeout_secs = 30

            [logging]
            level = "info"
            format = "json"

            [console]
            page_size = 10
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        // Skip validation in tests to allow partial configs
        Ok(cfg)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "CATALOG__API__BASE_URL environment variable must be set".to_string(),
            ));
        }

        if self.api.request_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "request_timeout_secs cannot be 0".to_string(),
            ));
        }

        if self.console.page_size == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "page_size cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Settings for the HTTP transport.
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.api.base_url.clone(),
            request_timeout_secs: self.api.request_timeout_secs,
        }
    }
}
