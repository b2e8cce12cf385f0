//! The matching and scoring engine.
//!
//! Everything in here is a pure, synchronous function of its inputs: no I/O,
//! no clock, no shared state. Scoring the same (intent, property) pair twice
//! yields identical output, and ranking the same scored set twice yields the
//! same order.

pub mod engine;
pub mod factors;
pub mod location;
pub mod ranker;

pub use engine::{score, score_all, top_reasons, MAX_TOP_REASONS};
pub use factors::{bedroom_label, format_aed, FactorScore};
pub use location::{match_location, normalize, LocationMatch, LocationTier};
pub use ranker::{rank, sort_ranked, PageRequest, DEFAULT_LIMIT, MAX_LIMIT};
