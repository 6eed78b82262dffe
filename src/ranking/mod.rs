//! Recommendation ranking: distance, composite score, and the
//! filter/sort/truncate pipeline producing `RankedEntry` lists.

pub mod distance;
mod ranker;
mod scoring;

pub use distance::distance_km;
pub use ranker::{format, RankingConfig, RecommendationRanker};
pub use scoring::{round2, ScoringEngine, ScoringWeights};
