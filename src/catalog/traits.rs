use crate::models::Property;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for all property catalog sources
/// New sources (other listings APIs, databases) plug in here without touching the engine
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Load the current catalog. Records are validated before they are returned.
    async fn load(&self) -> Result<Vec<Property>>;

    /// Get the name of the catalog source
    fn source_name(&self) -> &'static str;
}
