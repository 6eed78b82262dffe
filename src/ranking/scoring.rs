//! Composite relevance score for a single candidate place.

use serde::{Deserialize, Serialize};

use super::distance::distance_km;
use crate::models::{Coordinate, Place, ScoredPlace};

/// Tunable weights of the composite score.
///
/// ```text
/// reliability = min(rating_count / reliability_saturation, 1)
/// score = rating * rating_weight + review_count * review_weight
///       + reliability * reliability_weight - distance_km * distance_penalty
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub rating_weight: f64,
    pub review_weight: f64,
    pub reliability_weight: f64,
    /// Subtracted per kilometer
    pub distance_penalty: f64,
    /// Rating count at which reliability saturates to 1
    pub reliability_saturation: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            rating_weight: 3.0,
            review_weight: 0.1,
            reliability_weight: 0.5,
            distance_penalty: 2.0,
            reliability_saturation: 10,
        }
    }
}

/// Round to 2 decimals. Negative zero is normalized to `0.0`.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}

/// Scores places against a fixed weighting
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine {
    weights: ScoringWeights,
}

impl ScoringEngine {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Confidence proxy from rating volume, clamped to [0, 1]
    pub fn reliability(&self, rating_count: u32) -> f64 {
        if self.weights.reliability_saturation == 0 {
            return 1.0;
        }
        (rating_count as f64 / self.weights.reliability_saturation as f64).min(1.0)
    }

    /// Score one place for a user position.
    ///
    /// A place without a coordinate cannot be located; it is scored at an
    /// infinite distance so every distance cut-off drops it.
    pub fn score(&self, user: Coordinate, place: &Place) -> ScoredPlace {
        let w = &self.weights;
        let distance = place
            .coordinate
            .map(|c| distance_km(user, c))
            .unwrap_or(f64::INFINITY);
        let reliability = self.reliability(place.rating_count);

        let score = place.rating * w.rating_weight + place.review_count as f64 * w.review_weight
            + reliability * w.reliability_weight
            - distance * w.distance_penalty;

        ScoredPlace {
            place: place.clone(),
            distance_km: round2(distance),
            reliability: round2(reliability),
            score: round2(score),
        }
    }
}
