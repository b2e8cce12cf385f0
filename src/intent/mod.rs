//! Intent extraction boundary.
//!
//! Turning free text into an [`Intent`] is normally done by an external
//! language-model service. [`KeywordIntentParser`] is the deterministic
//! rule-based extractor used when no such service is wired in.

mod keywords;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Intent;

pub use keywords::KeywordIntentParser;

/// Common trait for anything that turns a free-text query into an intent
#[async_trait]
pub trait IntentExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<Intent>;

    fn extractor_name(&self) -> &'static str;
}
