//! Ranking and pagination of scored properties.

use serde::{Deserialize, Serialize};

use crate::models::lenient;
use crate::models::{PaginationInfo, ScoredProperty};

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 100;

/// Page size and position, already clamped to valid values.
///
/// Invalid input is never rejected: a missing, zero, negative or non-numeric
/// limit becomes [`DEFAULT_LIMIT`], limits above [`MAX_LIMIT`] are capped, and a
/// missing, negative or non-numeric offset becomes 0. The fields are only
/// reachable through the clamping constructors, deserialization included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPageRequest")]
pub struct PageRequest {
    limit: usize,
    offset: usize,
}

/// Wire form of a page request, before clamping.
#[derive(Deserialize)]
struct RawPageRequest {
    #[serde(default, deserialize_with = "lenient::integer")]
    limit: Option<i64>,
    #[serde(default, deserialize_with = "lenient::integer")]
    offset: Option<i64>,
}

impl From<RawPageRequest> for PageRequest {
    fn from(raw: RawPageRequest) -> Self {
        Self::from_signed(raw.limit, raw.offset)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl PageRequest {
    pub fn new(limit: usize, offset: usize) -> Self {
        let limit = match limit {
            0 => DEFAULT_LIMIT,
            n => n.min(MAX_LIMIT),
        };
        Self { limit, offset }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Clamp signed values as they arrive from a request body.
    pub fn from_signed(limit: Option<i64>, offset: Option<i64>) -> Self {
        let limit = limit
            .filter(|l| *l > 0)
            .map_or(DEFAULT_LIMIT, |l| usize::try_from(l).unwrap_or(MAX_LIMIT));
        let offset = offset
            .filter(|o| *o >= 0)
            .map_or(0, |o| usize::try_from(o).unwrap_or(usize::MAX));
        Self::new(limit, offset)
    }

    /// Clamp raw query-string values; anything unparseable falls back to defaults.
    pub fn from_raw(limit: Option<&str>, offset: Option<&str>) -> Self {
        let parse = |raw: Option<&str>| raw.and_then(|v| v.trim().parse::<i64>().ok());
        Self::from_signed(parse(limit), parse(offset))
    }

    /// Request for the page following `info`, if there is one.
    pub fn next_after(&self, info: &PaginationInfo) -> Option<PageRequest> {
        info.has_more.then(|| PageRequest {
            limit: self.limit,
            offset: info.offset + info.current_count,
        })
    }
}

/// Sort by unrounded score, highest first; equal scores by ascending id.
pub fn sort_ranked(scored: &mut [ScoredProperty]) {
    scored.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.property.id.cmp(&b.property.id))
    });
}

/// Rank the scored set and cut out the requested page.
///
/// An offset at or past the end yields an empty page, not an error.
pub fn rank(
    mut scored: Vec<ScoredProperty>,
    request: PageRequest,
) -> (Vec<ScoredProperty>, PaginationInfo) {
    sort_ranked(&mut scored);

    let total = scored.len();
    let start = request.offset.min(total);
    let end = start.saturating_add(request.limit).min(total);
    let page: Vec<ScoredProperty> = scored.drain(start..end).collect();

    let current_count = page.len();
    let info = PaginationInfo {
        total,
        limit: request.limit,
        offset: request.offset,
        current_count,
        has_more: request.offset.saturating_add(current_count) < total,
    };

    (page, info)
}
