use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

use super::traits::CatalogSource;
use crate::models::Property;

/// Tries a live source first and switches to a static one when it fails or
/// comes back empty.
pub struct FallbackCatalog {
    primary: Arc<dyn CatalogSource>,
    fallback: Arc<dyn CatalogSource>,
}

impl FallbackCatalog {
    pub fn new(primary: Arc<dyn CatalogSource>, fallback: Arc<dyn CatalogSource>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl CatalogSource for FallbackCatalog {
    async fn load(&self) -> Result<Vec<Property>> {
        match self.primary.load().await {
            Ok(properties) if !properties.is_empty() => return Ok(properties),
            Ok(_) => warn!(
                "{} returned no properties, falling back to {}",
                self.primary.source_name(),
                self.fallback.source_name()
            ),
            Err(e) => warn!(
                "{} failed ({:#}), falling back to {}",
                self.primary.source_name(),
                e,
                self.fallback.source_name()
            ),
        }
        self.fallback.load().await
    }

    fn source_name(&self) -> &'static str {
        self.primary.source_name()
    }
}
