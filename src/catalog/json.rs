use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};

use super::traits::CatalogSource;
use super::validate_catalog;
use crate::models::Property;

/// Catalog read from a JSON array of property records on disk
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for JsonFileCatalog {
    async fn load(&self) -> Result<Vec<Property>> {
        debug!("Reading catalog from {}", self.path.display());

        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read catalog file {}", self.path.display()))?;

        let properties: Vec<Property> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse catalog file {}", self.path.display()))?;

        validate_catalog(&properties)
            .with_context(|| format!("Invalid catalog file {}", self.path.display()))?;

        info!("Loaded {} properties from {}", properties.len(), self.path.display());
        Ok(properties)
    }

    fn source_name(&self) -> &'static str {
        "JSON file"
    }
}
