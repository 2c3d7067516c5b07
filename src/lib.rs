//! PSW Match - matching and booking service for Personal Support Workers
//!
//! This library provides the matching engine that finds workers near a client
//! who are free for a requested visit, plus the booking and chat workflow built
//! on top of it.

pub mod assistant;
pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{distance::haversine_distance, Matcher};
pub use models::{MatchRequest, ScoredCandidate, ScoringWeights, WorkerProfile};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let distance = haversine_distance(43.6532, -79.3832, 43.6532, -79.3832);
        assert!(distance.abs() < 1e-9);
        assert_eq!(Matcher::default().weights(), &ScoringWeights::default());
    }
}
