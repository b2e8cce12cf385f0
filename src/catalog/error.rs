use thiserror::Error;

/// Failures surfaced by catalog sources before records reach the engine.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("property record #{index} has an empty id")]
    EmptyId { index: usize },

    #[error("duplicate property id `{id}`")]
    DuplicateId { id: String },

    #[error("property `{id}` has an invalid price {price}")]
    InvalidPrice { id: String, price: f64 },

    #[error("property `{id}` has an invalid size {size_sqft} sqft")]
    InvalidSize { id: String, size_sqft: f64 },

    #[error("listings API returned status {status}")]
    Status { status: u16 },

    #[error("listings API is not configured: {0} is missing")]
    MissingConfig(&'static str),
}
