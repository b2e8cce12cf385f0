use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::error::CatalogError;
use super::traits::CatalogSource;
use super::validate_catalog;
use crate::config::{ListingsConfig, DEFAULT_CACHE_TTL, DEFAULT_MAX_RESULTS};
use crate::models::{Property, Source};

const DEFAULT_CITY: &str = "Dubai";
const DEFAULT_TYPE: &str = "Apartment";
const DEFAULT_STATUS: &str = "Ready";

/// Catalog fetched from a third-party listings API
///
/// Responses are cached for `cache_ttl`. When the API rate-limits us, the last
/// cached catalog is served even if it has expired.
pub struct ListingsApiCatalog {
    client: Client,
    base_url: String,
    api_key: String,
    max_results: usize,
    cache_ttl: Duration,
    cache: Mutex<Option<CachedListings>>,
}

struct CachedListings {
    fetched_at: Instant,
    properties: Vec<Property>,
}

impl ListingsApiCatalog {
    /// Create a new listings client for the given API
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("housing-match/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            max_results: DEFAULT_MAX_RESULTS,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache: Mutex::new(None),
        })
    }

    /// Create a listings client from configuration; URL and key are required
    pub fn from_config(config: &ListingsConfig) -> Result<Self> {
        let url = config
            .url
            .as_deref()
            .ok_or(CatalogError::MissingConfig("LISTINGS_API_URL"))?;
        let api_key = config
            .api_key
            .as_deref()
            .ok_or(CatalogError::MissingConfig("LISTINGS_API_KEY"))?;

        Ok(Self::new(url, api_key)?
            .with_max_results(config.max_results)
            .with_cache_ttl(config.cache_ttl))
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    pub fn with_cache_ttl(mut self, cache_ttl: Duration) -> Self {
        self.cache_ttl = cache_ttl;
        self
    }

    pub fn clear_cache(&self) {
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn cached(&self, allow_stale: bool) -> Option<Vec<Property>> {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache
            .as_ref()
            .filter(|entry| allow_stale || entry.fetched_at.elapsed() < self.cache_ttl)
            .map(|entry| entry.properties.clone())
    }

    fn store(&self, properties: &[Property]) {
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = Some(CachedListings {
            fetched_at: Instant::now(),
            properties: properties.to_vec(),
        });
    }

    async fn fetch(&self) -> Result<Vec<Property>> {
        let url = format!("{}/properties", self.base_url);
        debug!("Fetching URL: {} (limit {})", url, self.max_results);

        let response = self
            .client
            .get(&url)
            .header("x-api-key", &self.api_key)
            .query(&[("limit", self.max_results)])
            .send()
            .await
            .context("Failed to fetch listings")?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            if let Some(stale) = self.cached(true) {
                warn!("Listings API rate limited us, serving {} cached properties", stale.len());
                return Ok(stale);
            }
        }
        if !status.is_success() {
            warn!("Listings API returned status: {}", status);
            return Err(CatalogError::Status {
                status: status.as_u16(),
            }
            .into());
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to decode listings response")?;

        let properties = parse_listings(&body);
        validate_catalog(&properties).context("Listings API returned invalid records")?;
        self.store(&properties);

        info!("Fetched {} properties from listings API", properties.len());
        Ok(properties)
    }
}

#[async_trait]
impl CatalogSource for ListingsApiCatalog {
    async fn load(&self) -> Result<Vec<Property>> {
        if let Some(properties) = self.cached(false) {
            debug!("Serving {} properties from listings cache", properties.len());
            return Ok(properties);
        }
        self.fetch().await
    }

    fn source_name(&self) -> &'static str {
        "Listings API"
    }
}

/// Extract listings from either `{"data": [...]}` or a bare array.
///
/// Entries without an id and repeated ids are skipped.
pub fn parse_listings(body: &Value) -> Vec<Property> {
    let entries = body
        .get("data")
        .and_then(Value::as_array)
        .or_else(|| body.as_array())
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut seen = HashSet::new();
    let mut properties = Vec::with_capacity(entries.len());
    for raw in entries {
        match normalize_listing(raw) {
            Some(property) if seen.insert(property.id.clone()) => properties.push(property),
            Some(property) => warn!("Skipping repeated listing {}", property.id),
            None => warn!("Skipping listing without an id"),
        }
    }
    properties
}

/// Map one raw listing onto a [`Property`].
fn normalize_listing(raw: &Value) -> Option<Property> {
    let id = text(raw.get("property_id")).or_else(|| text(raw.get("id")))?;

    let location = raw.get("location");
    let name = text(location.and_then(|l| l.get("name")));
    let full_name = text(location.and_then(|l| l.get("full_name")));
    let (community, city) = split_location(name.as_deref(), full_name.as_deref());

    let image_url = raw
        .get("images")
        .and_then(Value::as_array)
        .and_then(|images| images.first())
        .and_then(|first| {
            text(first.get("medium_image_url")).or_else(|| text(first.get("small_image_url")))
        });

    let featured = [raw.get("is_featured"), raw.get("is_premium")]
        .iter()
        .any(|flag| flag.and_then(Value::as_bool).unwrap_or(false));

    Some(Property {
        id,
        title: text(raw.get("title")),
        price: parse_amount(raw.get("price")),
        community,
        city,
        property_type: text(raw.get("property_type")).unwrap_or_else(|| DEFAULT_TYPE.to_string()),
        bedrooms: parse_count(raw.get("bedrooms")).unwrap_or(0),
        status: Some(
            text(raw.get("completion_status")).unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        ),
        bathrooms: parse_count(raw.get("bathrooms")),
        size_sqft: parse_amount(raw.get("size")).filter(|s| *s > 0.0),
        image_url,
        featured,
        source: Source::Listings,
    })
}

/// Community and city from "Community, District, City"; the first and last parts.
fn split_location(name: Option<&str>, full_name: Option<&str>) -> (String, String) {
    let parts: Vec<&str> = full_name
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    match parts.as_slice() {
        [first, .., last] => (first.to_string(), last.to_string()),
        _ => (
            name.or(parts.first().copied())
                .unwrap_or(DEFAULT_CITY)
                .to_string(),
            DEFAULT_CITY.to_string(),
        ),
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numbers, or text such as "1,950,000 AED" and "1500 sqft".
fn parse_amount(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| *c != ',')
                .skip_while(|c| !c.is_ascii_digit())
                .take_while(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            cleaned.parse().ok()
        }
        _ => None,
    };
    parsed.filter(|n| n.is_finite() && *n >= 0.0)
}

/// Room counts; "studio" and "none" read as zero.
fn parse_count(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::String(s) if matches!(s.trim().to_lowercase().as_str(), "studio" | "none" | "") => {
            Some(0)
        }
        other => parse_amount(Some(other)).map(|n| n as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn normalizes_api_listing() {
        let body = json!({
            "data": [{
                "property_id": 15259544,
                "title": "Sea view apartment",
                "price": "1,480,000.00 AED",
                "bedrooms": "3",
                "bathrooms": "5",
                "size": "3014.00",
                "property_type": "Apartment",
                "completion_status": "off_plan",
                "is_premium": true,
                "location": {"name": "Al Helio 2", "full_name": "Al Helio 2, Al Helio, Ajman"},
                "images": [{"medium_image_url": "https://img.example.com/1.jpg"}]
            }],
            "pagination": {"page": 1}
        });

        let properties = parse_listings(&body);
        assert_eq!(properties.len(), 1);

        let property = &properties[0];
        assert_eq!(property.id, "15259544");
        assert_eq!(property.price, Some(1_480_000.0));
        assert_eq!(property.community, "Al Helio 2");
        assert_eq!(property.city, "Ajman");
        assert_eq!(property.bedrooms, 3);
        assert_eq!(property.bathrooms, Some(5));
        assert_eq!(property.size_sqft, Some(3014.0));
        assert_eq!(property.status.as_deref(), Some("off_plan"));
        assert_eq!(property.image_url.as_deref(), Some("https://img.example.com/1.jpg"));
        assert!(property.featured);
        assert_eq!(property.source, Source::Listings);
    }

    #[test]
    fn fills_defaults_for_sparse_listing() {
        let body = json!([{"id": "a1", "bedrooms": "studio", "location": {"name": "JVC"}}]);

        let property = &parse_listings(&body)[0];
        assert_eq!(property.community, "JVC");
        assert_eq!(property.city, "Dubai");
        assert_eq!(property.property_type, "Apartment");
        assert_eq!(property.status.as_deref(), Some("Ready"));
        assert_eq!(property.bedrooms, 0);
        assert_eq!(property.price, None);
        assert!(!property.featured);
    }

    #[test]
    fn skips_listings_without_id_and_repeats() {
        let body = json!({"data": [{"title": "no id"}, {"id": "x"}, {"id": "x"}]});
        let properties = parse_listings(&body);
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].id, "x");
    }

    #[test]
    fn unexpected_body_yields_nothing() {
        assert!(parse_listings(&json!({"error": "nope"})).is_empty());
    }

    #[test]
    fn from_config_requires_url_and_key() {
        let missing = ListingsApiCatalog::from_config(&ListingsConfig::default());
        assert!(missing.is_err());

        let config = ListingsConfig {
            url: Some("https://listings.example.com/".to_string()),
            api_key: Some("key".to_string()),
            ..ListingsConfig::default()
        };
        let catalog = ListingsApiCatalog::from_config(&config).unwrap();
        assert_eq!(catalog.base_url, "https://listings.example.com");
    }

    #[test]
    fn cache_respects_ttl() {
        let catalog = ListingsApiCatalog::new("https://listings.example.com", "key")
            .unwrap()
            .with_cache_ttl(Duration::from_secs(0));
        catalog.store(&[Property::new("cached")]);

        assert!(catalog.cached(false).is_none());
        assert_eq!(catalog.cached(true).map(|p| p.len()), Some(1));

        catalog.clear_cache();
        assert!(catalog.cached(true).is_none());
    }
}
