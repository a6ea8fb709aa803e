use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    pub credentials: Credentials,
    pub model: ModelConfig,
    pub product: ProductBrief,
    pub output: OutputConfig,
}

/// Secrets are explicit configuration handed to the provider
/// constructors, never process-wide environment state.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Credentials {
    pub model_api_key: String,
    pub search_api_key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// The product under campaign. The original deployment hardcoded one
/// product; here it is plain configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProductBrief {
    pub website: String,
    pub details: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials {
                model_api_key: String::new(),
                search_api_key: String::new(),
            },
            model: ModelConfig {
                model: "gpt-4o-mini".to_string(),
                temperature: 0.7,
                max_tokens: 1024,
            },
            product: ProductBrief {
                website: "https://australiatravelsafe.com".to_string(),
                details: "Australia Travel Safe offers comprehensive safety information \
                          and travel tips for tourists exploring Australia. Our services \
                          include up-to-date safety alerts, travel itineraries, and \
                          guides to help ensure a safe and enjoyable journey."
                    .to_string(),
            },
            output: OutputConfig {
                directory: PathBuf::from("./generated_content"),
            },
        }
    }
}

pub trait ConfigManager {
    fn load_config(&self) -> Result<PipelineConfig>;
    fn save_config(&self, config: &PipelineConfig) -> Result<()>;
    fn validate_config(&self, config: &PipelineConfig) -> Result<()>;
}

pub struct FileConfigManager {
    config_path: PathBuf,
}

impl FileConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Create a default configuration file
    fn create_default_config(&self) -> Result<()> {
        let default_config = PipelineConfig::default();
        let toml_content = toml::to_string_pretty(&default_config).map_err(|e| {
            PipelineError::Config(format!("Failed to serialize default config: {}", e))
        })?;

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                PipelineError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        fs::write(&self.config_path, toml_content)
            .map_err(|e| PipelineError::Config(format!("Failed to write default config: {}", e)))?;

        info!("Default configuration file created at {:?}", self.config_path);
        Ok(())
    }
}

impl ConfigManager for FileConfigManager {
    fn load_config(&self) -> Result<PipelineConfig> {
        info!("Loading configuration from {:?}", self.config_path);

        // check if config file exists, create default if not
        if !self.config_path.exists() {
            warn!(
                "Configuration file not found, creating default config at {:?}",
                self.config_path
            );
            self.create_default_config()?;
        }

        let config_content = fs::read_to_string(&self.config_path)
            .map_err(|e| PipelineError::Config(format!("Failed to read config file: {}", e)))?;

        let config: PipelineConfig = toml::from_str(&config_content)
            .map_err(|e| PipelineError::Config(format!("Failed to parse TOML config: {}", e)))?;

        self.validate_config(&config)?;

        info!("Configuration loaded successfully");
        Ok(config)
    }

    fn save_config(&self, config: &PipelineConfig) -> Result<()> {
        info!("Saving configuration to {:?}", self.config_path);

        let toml_content = toml::to_string_pretty(config)
            .map_err(|e| PipelineError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&self.config_path, toml_content)
            .map_err(|e| PipelineError::Config(format!("Failed to write config file: {}", e)))?;

        info!("Configuration saved successfully");
        Ok(())
    }

    /// Fails fast on a missing model credential: no stage is attempted
    /// without it. The search key is optional (prompt enrichment only).
    fn validate_config(&self, config: &PipelineConfig) -> Result<()> {
        debug!("Validating configuration");

        if config.credentials.model_api_key.trim().is_empty() {
            return Err(
                PipelineError::Config("model_api_key is required, set it in the config file".to_string()).into(),
            );
        }
        if config.credentials.search_api_key.trim().is_empty() {
            warn!("search_api_key not set, worker search enrichment is disabled");
        }

        if config.model.model.trim().is_empty() {
            return Err(PipelineError::Config("model name cannot be empty".to_string()).into());
        }
        if !(0.0..=2.0).contains(&config.model.temperature) {
            return Err(PipelineError::Config(format!(
                "temperature {} out of range, expected 0.0 to 2.0",
                config.model.temperature
            ))
            .into());
        }
        if config.model.max_tokens == 0 {
            return Err(
                PipelineError::Config("max_tokens must be greater than 0".to_string()).into(),
            );
        }

        if !config.product.website.starts_with("http://")
            && !config.product.website.starts_with("https://")
        {
            return Err(PipelineError::Config(format!(
                "product website '{}' must start with http:// or https://",
                config.product.website
            ))
            .into());
        }

        if config.output.directory.as_os_str().is_empty() {
            return Err(
                PipelineError::Config("output directory cannot be empty".to_string()).into(),
            );
        }

        debug!("Configuration validation passed");
        Ok(())
    }
}
