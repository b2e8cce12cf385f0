//! Housing intent matching with transparent, reproducible scores.
//!
//! A parsed [`Intent`] is scored against every [`Property`] of a catalog
//! snapshot. Each score is the sum of five weighted factors (budget, location,
//! bedrooms, property type, status) and carries a per-factor breakdown with
//! human-readable explanations. Scored properties are ranked and sliced into
//! pages.
//!
//! ```text
//! catalog source ─► snapshot ─► score (5 factors) ─► rank ─► page + pagination
//! ```

pub mod catalog;
pub mod config;
pub mod intent;
pub mod matching;
pub mod models;
pub mod service;

pub use matching::{rank, score, score_all, PageRequest};
pub use models::{
    Factor, Intent, PaginationInfo, Property, ScoreBreakdownItem, ScoredProperty, Source,
};
