//! Property catalog sources.
//!
//! The engine only ever sees validated [`Property`] records. Every source runs
//! [`validate_catalog`] before handing records over, so malformed data is
//! rejected here instead of being scored.

pub mod error;
pub mod fallback;
pub mod json;
pub mod listings;
pub mod sample;
pub mod traits;

use std::collections::HashSet;

use crate::models::Property;

pub use error::CatalogError;
pub use fallback::FallbackCatalog;
pub use json::JsonFileCatalog;
pub use listings::ListingsApiCatalog;
pub use sample::SampleCatalog;
pub use traits::CatalogSource;

/// Reject records the engine must never see: empty or duplicate ids,
/// negative or non-finite prices and sizes.
pub fn validate_catalog(properties: &[Property]) -> Result<(), CatalogError> {
    let mut seen = HashSet::with_capacity(properties.len());

    for (index, property) in properties.iter().enumerate() {
        if property.id.trim().is_empty() {
            return Err(CatalogError::EmptyId { index });
        }
        if !seen.insert(property.id.as_str()) {
            return Err(CatalogError::DuplicateId {
                id: property.id.clone(),
            });
        }
        if let Some(price) = property.price {
            if !price.is_finite() || price < 0.0 {
                return Err(CatalogError::InvalidPrice {
                    id: property.id.clone(),
                    price,
                });
            }
        }
        if let Some(size_sqft) = property.size_sqft {
            if !size_sqft.is_finite() || size_sqft < 0.0 {
                return Err(CatalogError::InvalidSize {
                    id: property.id.clone(),
                    size_sqft,
                });
            }
        }
    }

    Ok(())
}
