//! Request-level glue around the engine: snapshot pinning, featured browsing,
//! value insights and the reply text.

pub mod insight;
pub mod snapshot;
pub mod summary;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::catalog::CatalogSource;
use crate::matching::{rank, score, PageRequest};
use crate::models::{Intent, PaginationInfo, Property, ScoredProperty};

pub use insight::ValueBenchmark;
pub use snapshot::{CatalogSnapshot, SnapshotStore};

const FALLBACK_REASON: &str = "This property may still be of interest";
const FEATURED_REASON: &str = "Featured listing";

/// One ranked result as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub scored: ScoredProperty,
    /// `score` rounded for display.
    pub display_score: u32,
    pub value_insight: Option<String>,
    /// Top reasons, plus the value insight when there is room, or a fallback
    /// when nothing scored.
    pub reasons: Vec<String>,
}

impl Recommendation {
    fn new(scored: ScoredProperty, benchmark: &ValueBenchmark) -> Self {
        let value_insight = benchmark.insight_for(&scored.property);

        let mut reasons = scored.top_reasons.clone();
        if let Some(insight) = &value_insight {
            if reasons.len() < crate::matching::MAX_TOP_REASONS {
                reasons.push(insight.clone());
            }
        }
        if reasons.is_empty() {
            let fallback = if scored.property.featured {
                FEATURED_REASON
            } else {
                FALLBACK_REASON
            };
            reasons.push(fallback.to_string());
        }

        Self {
            display_score: scored.display_score(),
            scored,
            value_insight,
            reasons,
        }
    }
}

/// A page of recommendations for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub text: String,
    pub intent: Intent,
    pub results: Vec<Recommendation>,
    pub pagination: PaginationInfo,
    pub snapshot_id: u64,
}

/// Score, rank and page a snapshot for one intent.
///
/// With no usable constraints the request is featured-list browsing: only
/// featured properties are ranked, when the snapshot has any.
pub fn recommend(intent: &Intent, snapshot: &CatalogSnapshot, request: PageRequest) -> Recommendations {
    let browsing_featured = !intent.has_constraints() && snapshot.has_featured();
    let candidates: Vec<&Property> = snapshot
        .properties
        .iter()
        .filter(|p| !browsing_featured || p.featured)
        .collect();

    let scored: Vec<ScoredProperty> = candidates.iter().map(|p| score(intent, p)).collect();
    let (page, pagination) = rank(scored, request);

    let benchmark = ValueBenchmark::from_properties(&snapshot.properties);
    let results: Vec<Recommendation> = page
        .into_iter()
        .map(|scored| Recommendation::new(scored, &benchmark))
        .collect();

    info!(
        snapshot = snapshot.id,
        total = pagination.total,
        offset = pagination.offset,
        returned = pagination.current_count,
        featured = browsing_featured,
        "ranked catalog snapshot"
    );

    Recommendations {
        text: summary::describe(intent, pagination.total),
        intent: intent.clone(),
        results,
        pagination,
        snapshot_id: snapshot.id,
    }
}

/// Serves paged recommendations from a catalog source, keeping pages of one
/// query consistent by pinning a snapshot per session.
pub struct MatchService {
    catalog: Arc<dyn CatalogSource>,
    snapshots: SnapshotStore,
}

impl MatchService {
    pub fn new(catalog: Arc<dyn CatalogSource>) -> Self {
        Self {
            catalog,
            snapshots: SnapshotStore::new(),
        }
    }

    /// Expire session pins after `ttl` instead of the default half hour.
    pub fn with_snapshot_ttl(mut self, ttl: Duration) -> Self {
        self.snapshots = SnapshotStore::with_limits(ttl, snapshot::MAX_PINNED_SESSIONS);
        self
    }

    /// Snapshot for this session and intent: the pinned one when the query is
    /// unchanged, otherwise a freshly loaded one.
    pub async fn snapshot_for(&self, session_id: Option<&str>, intent: &Intent) -> Result<Arc<CatalogSnapshot>> {
        let query_key = serde_json::to_string(intent).context("Failed to encode intent")?;

        if let Some(session_id) = session_id {
            if let Some(pinned) = self.snapshots.get(session_id, &query_key) {
                return Ok(pinned);
            }
        }

        let properties = self
            .catalog
            .load()
            .await
            .with_context(|| format!("Failed to load catalog from {}", self.catalog.source_name()))?;
        let snapshot = self.snapshots.create(self.catalog.source_name(), properties);
        info!(
            snapshot = snapshot.id,
            properties = snapshot.len(),
            source = snapshot.source,
            "took catalog snapshot"
        );

        if let Some(session_id) = session_id {
            self.snapshots.pin(session_id, &query_key, Arc::clone(&snapshot));
        }
        Ok(snapshot)
    }

    pub async fn search(
        &self,
        session_id: Option<&str>,
        intent: &Intent,
        request: PageRequest,
    ) -> Result<Recommendations> {
        let snapshot = self.snapshot_for(session_id, intent).await?;
        Ok(recommend(intent, &snapshot, request))
    }

    pub fn end_session(&self, session_id: &str) {
        self.snapshots.forget(session_id);
    }
}
