//! Filter, order and truncate scored places into recommendations.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::scoring::{ScoringEngine, ScoringWeights};
use crate::models::{Coordinate, Place, RankedEntry, ScoredPlace};

/// Cut-offs applied after scoring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    #[serde(flatten)]
    pub weights: ScoringWeights,
    /// Inclusive distance cut-off
    pub max_distance_km: f64,
    /// Maximum number of recommendations
    pub limit: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            max_distance_km: 5.0,
            limit: 3,
        }
    }
}

/// Recommendation pipeline: score, filter by distance, drop unrated,
/// stable sort by score, truncate.
#[derive(Debug, Clone)]
pub struct RecommendationRanker {
    engine: ScoringEngine,
    max_distance_km: f64,
    limit: usize,
}

impl RecommendationRanker {
    pub fn new(config: RankingConfig) -> Self {
        Self {
            engine: ScoringEngine::new(config.weights),
            max_distance_km: config.max_distance_km,
            limit: config.limit,
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Rank candidate places for a user position.
    ///
    /// Never fails; an empty result means nothing qualified.
    pub fn rank(&self, user: Coordinate, places: &[Place]) -> Vec<ScoredPlace> {
        let mut scored: Vec<ScoredPlace> = places
            .iter()
            .map(|place| self.engine.score(user, place))
            .filter(|s| s.distance_km <= self.max_distance_km)
            .filter(|s| s.place.rating > 0.0)
            .collect();

        // sort_by is stable: equal scores keep their input order
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(self.limit);

        debug!(
            "Ranked {} candidates into {} recommendations",
            places.len(),
            scored.len()
        );

        scored
    }
}

impl Default for RecommendationRanker {
    fn default() -> Self {
        Self::new(RankingConfig::default())
    }
}

/// Project scored places into presentation entries with contiguous 1-based ranks.
pub fn format(scored: &[ScoredPlace]) -> Vec<RankedEntry> {
    scored
        .iter()
        .enumerate()
        .map(|(i, s)| RankedEntry {
            rank: i + 1,
            name: s.place.name.clone(),
            address: s.place.address.clone(),
            distance: format!("{}km", s.distance_km),
            rating: s.place.rating,
            review_count: s.place.review_count,
            score: s.score,
            place_type: s.place.place_type.clone(),
            phone: s.place.phone.clone(),
            detail_url: s.place.detail_url.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: Coordinate = Coordinate::new(37.5665, 126.9780);

    /// Latitude offset that puts a point `km` north of the user
    fn north(km: f64) -> f64 {
        USER.lat + km / (crate::ranking::distance::EARTH_RADIUS_KM.to_radians())
    }

    fn rated(id: &str, rating: f64, reviews: u32, ratings: u32, km: f64) -> Place {
        Place::new(id, id)
            .at(north(km), USER.lng)
            .with_rating(rating, reviews, ratings)
    }

    #[test]
    fn test_reference_scenario_order() {
        let a = rated("A", 4.2, 15, 20, 0.0);
        let b = rated("B", 3.8, 8, 12, 0.2);

        let ranked = RecommendationRanker::default().rank(USER, &[b, a]);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].place.id, "A");
        assert!((ranked[0].score - 14.6).abs() < 1e-9);
        assert_eq!(ranked[1].place.id, "B");
        assert_eq!(ranked[1].distance_km, 0.2);
        assert_eq!(ranked[1].reliability, 1.0);
        assert!((ranked[1].score - 12.3).abs() < 1e-9, "got {}", ranked[1].score);
    }

    #[test]
    fn test_unrated_place_is_never_recommended() {
        let unrated = rated("zero", 0.0, 5000, 5000, 0.0);
        let ranked = RecommendationRanker::default().rank(USER, &[unrated]);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_distance_boundary_is_inclusive() {
        let at_limit = rated("edge", 4.0, 0, 0, 5.0);
        let beyond = rated("beyond", 4.0, 0, 0, 5.01);

        let ranked = RecommendationRanker::default().rank(USER, &[at_limit, beyond]);

        let ids: Vec<&str> = ranked.iter().map(|s| s.place.id.as_str()).collect();
        assert_eq!(ids, vec!["edge"]);
    }

    #[test]
    fn test_truncates_to_three_and_keeps_tie_order() {
        let places: Vec<Place> = ["t1", "t2", "t3", "t4", "t5"]
            .iter()
            .map(|id| rated(id, 4.0, 10, 10, 0.0))
            .collect();

        let ranked = RecommendationRanker::default().rank(USER, &places);

        let ids: Vec<&str> = ranked.iter().map(|s| s.place.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2", "t3"]);
    }

    #[test]
    fn test_scores_rounding_to_zero_keep_input_order() {
        // 3 - 2 * 1.502 = -0.004 and 3 - 2 * 1.499 = 0.002 both round to 0.00
        let slightly_negative = rated("A", 1.0, 0, 0, 1.502);
        let slightly_positive = rated("B", 1.0, 0, 0, 1.499);

        let ranked = RecommendationRanker::default().rank(USER, &[slightly_negative, slightly_positive]);

        let ids: Vec<&str> = ranked.iter().map(|s| s.place.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert!(ranked.iter().all(|s| s.score == 0.0 && s.score.is_sign_positive()));

        let json = serde_json::to_string(&format(&ranked)).unwrap();
        assert!(!json.contains("-0.0"), "{}", json);
    }

    #[test]
    fn test_sorted_by_non_increasing_score() {
        let places = vec![
            rated("low", 2.0, 1, 1, 1.0),
            rated("high", 5.0, 40, 30, 0.5),
            rated("mid", 3.5, 10, 5, 0.3),
            rated("far", 5.0, 100, 100, 12.0),
            Place::new("nowhere", "nowhere").with_rating(5.0, 100, 100),
        ];

        let ranked = RecommendationRanker::default().rank(USER, &places);

        assert!(ranked.len() <= 3);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(ranked.iter().all(|s| s.place.rating > 0.0 && s.distance_km <= 5.0));
        assert_eq!(ranked[0].place.id, "high");
    }

    #[test]
    fn test_empty_input() {
        assert!(RecommendationRanker::default().rank(USER, &[]).is_empty());
        assert!(format(&[]).is_empty());
    }

    #[test]
    fn test_format_ranks_and_distance_suffix() {
        let places = vec![
            rated("A", 4.2, 15, 20, 0.0),
            rated("B", 3.8, 8, 12, 0.2),
            rated("C", 4.0, 12, 18, 1.25),
        ];

        let entries = format(&RecommendationRanker::default().rank(USER, &places));

        let ranks: Vec<usize> = entries.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert!(entries.iter().all(|e| e.distance.ends_with("km")));
        assert_eq!(entries[0].distance, "0km");
        assert_eq!(entries[1].distance, "0.2km");
    }
}
