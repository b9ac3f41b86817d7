use crate::catalog::CardCatalog;
use crate::render::RenderOptions;
use crate::types::ConfigError;
use crate::viewed::DEFAULT_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Viewer settings, stored as JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// The card deck PDF
    pub pdf_path: PathBuf,
    /// File holding persisted viewed-state
    pub state_path: PathBuf,
    pub storage_key: String,
    pub render: RenderOptions,
    pub catalog: CardCatalog,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            pdf_path: PathBuf::from("card.pdf"),
            state_path: PathBuf::from("viewed-cards.json"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            render: RenderOptions::default(),
            catalog: CardCatalog::default(),
        }
    }
}

impl ViewerConfig {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        let config: Self = serde_json::from_slice(&bytes)?;
        config.validate()?;
        Ok(config)
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Load `path` if given, otherwise use the defaults
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path).await,
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.is_empty() {
            return Err(ConfigError::Invalid("storage_key is empty".to_string()));
        }
        if self.render.max_width <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "render.max_width must be positive, got {}",
                self.render.max_width
            )));
        }
        if self.render.margin < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "render.margin must not be negative, got {}",
                self.render.margin
            )));
        }
        self.catalog.validate().map_err(ConfigError::Invalid)
    }
}
