//! Runtime configuration read from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `CATALOG_PATH` | unset |
//! | `LISTINGS_API_URL` | unset |
//! | `LISTINGS_API_KEY` | unset |
//! | `LISTINGS_MAX_RESULTS` | 50 |
//! | `LISTINGS_CACHE_TTL_SECS` | 300 |
//! | `DEFAULT_PAGE_LIMIT` | 20, clamped to `1..=100` |
//! | `SNAPSHOT_TTL_SECS` | 1800 |
//!
//! Unparseable values fall back to their defaults with a warning.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::matching::{PageRequest, DEFAULT_LIMIT, MAX_LIMIT};

pub const DEFAULT_MAX_RESULTS: usize = 50;
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);
pub const DEFAULT_SNAPSHOT_TTL: Duration = Duration::from_secs(30 * 60);

/// Settings for the third-party listings API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingsConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub max_results: usize,
    pub cache_ttl: Duration,
}

impl Default for ListingsConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            max_results: DEFAULT_MAX_RESULTS,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// JSON catalog file.
    pub catalog_path: Option<PathBuf>,
    pub listings: ListingsConfig,
    pub default_page_limit: usize,
    /// How long a session keeps its pinned catalog snapshot.
    pub snapshot_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            listings: ListingsConfig::default(),
            default_page_limit: DEFAULT_LIMIT,
            snapshot_ttl: DEFAULT_SNAPSHOT_TTL,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let max_results = parse_or(&get, "LISTINGS_MAX_RESULTS", DEFAULT_MAX_RESULTS).max(1);
        let cache_ttl = get("LISTINGS_CACHE_TTL_SECS")
            .map(|raw| parse_value(&raw, "LISTINGS_CACHE_TTL_SECS", DEFAULT_CACHE_TTL.as_secs()))
            .map_or(DEFAULT_CACHE_TTL, Duration::from_secs);
        let default_page_limit =
            parse_or(&get, "DEFAULT_PAGE_LIMIT", DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let snapshot_ttl = Duration::from_secs(parse_or(
            &get,
            "SNAPSHOT_TTL_SECS",
            DEFAULT_SNAPSHOT_TTL.as_secs(),
        ));

        Self {
            catalog_path: get("CATALOG_PATH").map(PathBuf::from),
            listings: ListingsConfig {
                url: get("LISTINGS_API_URL"),
                api_key: get("LISTINGS_API_KEY"),
                max_results,
                cache_ttl,
            },
            default_page_limit,
            snapshot_ttl,
        }
    }

    /// Page request from raw user values; a missing or non-positive limit
    /// falls back to the configured default page size.
    pub fn page_request(&self, limit: Option<i64>, offset: Option<i64>) -> PageRequest {
        let limit = limit
            .filter(|l| *l > 0)
            .or_else(|| i64::try_from(self.default_page_limit).ok());
        PageRequest::from_signed(limit, offset)
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    get(key).map_or(default, |raw| parse_value(&raw, key, default))
}

fn parse_value<T>(raw: &str, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    raw.parse().unwrap_or_else(|_| {
        warn!("Ignoring {}={:?}: not a valid number, using {}", key, raw, default);
        default
    })
}
