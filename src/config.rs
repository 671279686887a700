use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Configuration for the SEO keyword analyzer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Inference service connection settings
    pub service: ServiceConfig,

    /// Video upload restrictions
    pub upload: UploadConfig,

    /// Output and logging settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceConfig {
    /// Base URL of the inference service
    pub base_url: String,

    /// Path of the keyword ranking endpoint
    pub endpoint_path: String,

    /// Path probed to check that the service is up
    pub health_path: String,

    /// Timeout for the whole analysis request (seconds). Transcription and
    /// knowledge-base lookups run server side, so this is long.
    pub timeout_seconds: u64,

    /// Connection timeout (seconds)
    pub connect_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadConfig {
    /// Accepted video file extensions, lowercase, without the dot
    pub supported_extensions: Vec<String>,

    /// Maximum file size in bytes (0 = no limit)
    pub max_file_size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Report format written to stdout
    pub format: OutputFormat,

    /// Log level used when RUST_LOG is not set
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

const CONFIG_PATHS: [&str; 2] = ["seo-analyzer.toml", "config/seo-analyzer.toml"];

impl Config {
    /// Load configuration from the first readable config file, then apply
    /// environment overrides. Falls back to defaults plus environment.
    pub fn load() -> Result<Self> {
        for path in &CONFIG_PATHS {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str::<Config>(&config_str) {
                    Ok(mut config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        config.apply_overrides(|key| std::env::var(key).ok());
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Self::from_env()
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_overrides(|key| std::env::var(key).ok());

        tracing::info!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override settings from `SEO_ANALYZER_*` variables
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup("SEO_ANALYZER_BASE_URL") {
            self.service.base_url = base_url;
        }

        if let Some(timeout) = lookup("SEO_ANALYZER_TIMEOUT") {
            match timeout.parse() {
                Ok(seconds) => self.service.timeout_seconds = seconds,
                Err(_) => tracing::warn!("Ignoring invalid SEO_ANALYZER_TIMEOUT: {}", timeout),
            }
        }

        if let Some(log_level) = lookup("SEO_ANALYZER_LOG_LEVEL") {
            self.output.log_level = log_level;
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = self.endpoint_url()?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow!("base_url must use http or https, got {}", url.scheme()));
        }

        if self.service.timeout_seconds == 0 {
            return Err(anyhow!("timeout_seconds must be greater than 0"));
        }

        if self.upload.supported_extensions.is_empty() {
            return Err(anyhow!("supported_extensions must not be empty"));
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }

    /// Full URL of the keyword ranking endpoint
    pub fn endpoint_url(&self) -> Result<Url> {
        self.service.endpoint_url()
    }

    /// Full URL of the health probe
    pub fn health_url(&self) -> Result<Url> {
        self.service.health_url()
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "SEO Analyzer Configuration:\n\
            - Service: {}{}\n\
            - Timeout: {}s\n\
            - Supported Extensions: {}\n\
            - Max File Size: {}\n\
            - Output Format: {:?}",
            self.service.base_url,
            self.service.endpoint_path,
            self.service.timeout_seconds,
            self.upload.supported_extensions.join(", "),
            if self.upload.max_file_size == 0 {
                "unlimited".to_string()
            } else {
                format!("{} bytes", self.upload.max_file_size)
            },
            self.output.format
        )
    }
}

impl ServiceConfig {
    pub fn endpoint_url(&self) -> Result<Url> {
        join_url(&self.base_url, &self.endpoint_path)
    }

    pub fn health_url(&self) -> Result<Url> {
        join_url(&self.base_url, &self.health_path)
    }
}

fn join_url(base: &str, path: &str) -> Result<Url> {
    let base = Url::parse(base).with_context(|| format!("Invalid base_url: {}", base))?;
    base.join(path)
        .with_context(|| format!("Invalid path {} for {}", path, base))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                base_url: "http://localhost:8000".to_string(),
                endpoint_path: "/keywords-bart-seed-seo/".to_string(),
                health_path: "/docs".to_string(),
                timeout_seconds: 1800, // 30 minutes
                connect_timeout_seconds: 10,
            },
            upload: UploadConfig {
                supported_extensions: vec![
                    "mp4".to_string(),
                    "avi".to_string(),
                    "mov".to_string(),
                    "mkv".to_string(),
                ],
                max_file_size: 0, // No limit
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                log_level: "info".to_string(),
            },
        }
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.service.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.config.service.timeout_seconds = seconds;
        self
    }

    pub fn with_supported_extensions(mut self, extensions: &[&str]) -> Self {
        self.config.upload.supported_extensions =
            extensions.iter().map(|e| (*e).to_string()).collect();
        self
    }

    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.config.upload.max_file_size = bytes;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.config.output.format = format;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
