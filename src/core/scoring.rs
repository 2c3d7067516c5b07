use std::cmp::Ordering;

use crate::core::distance::distance_km;
use crate::models::{Location, ScoredCandidate, ScoringWeights, WorkerProfile};

/// Calculate a desirability score for a worker relative to the client
///
/// Scoring formula (default weights):
/// score = max(0,
///     100
///     - 2 * distance_km              # closer is better
///     + 5 * rating                   # 25 points for a five-star worker
///     + min(0.5 * review_count, 10)  # capped at 20 reviews
/// )
pub fn calculate_score(worker: &WorkerProfile, client: &Location, weights: &ScoringWeights) -> f64 {
    let distance = distance_km(client.coordinate(), worker.location.coordinate());
    score_at_distance(worker, distance, weights)
}

#[inline]
fn score_at_distance(worker: &WorkerProfile, distance: f64, weights: &ScoringWeights) -> f64 {
    let review_score = (worker.review_count as f64 * weights.review_weight).min(weights.review_cap);

    let score = weights.baseline - distance * weights.distance_penalty
        + worker.rating * weights.rating_weight
        + review_score;

    score.max(0.0)
}

/// Score every worker, keeping the distance for tie-breaking
pub fn score_workers(
    workers: Vec<WorkerProfile>,
    client: &Location,
    weights: &ScoringWeights,
) -> Vec<ScoredCandidate> {
    workers
        .into_iter()
        .map(|worker| {
            let distance = distance_km(client.coordinate(), worker.location.coordinate());
            let score = score_at_distance(&worker, distance, weights);
            ScoredCandidate {
                worker,
                score,
                distance_km: distance,
            }
        })
        .collect()
}

/// Sort by score (descending), then distance (ascending)
///
/// The sort is stable, so full ties keep their input order.
pub fn sort_candidates(candidates: &mut [ScoredCandidate]) {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                a.distance_km
                    .partial_cmp(&b.distance_km)
                    .unwrap_or(Ordering::Equal)
            })
    });
}

/// Rank workers by score and strip the score
pub fn rank_workers(
    workers: Vec<WorkerProfile>,
    client: &Location,
    weights: &ScoringWeights,
) -> Vec<WorkerProfile> {
    let mut scored = score_workers(workers, client, weights);
    sort_candidates(&mut scored);
    scored.into_iter().map(|c| c.worker).collect()
}
