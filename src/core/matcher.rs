use crate::core::{
    availability::{covers, RequestedWindow},
    filters::{holds_certifications, meets_min_rating, offers_service, within_radius},
    scoring::{calculate_score, rank_workers, score_workers, sort_candidates},
};
use crate::models::{Location, MatchRequest, ScoringWeights, WorkerProfile};

/// Number of workers returned when the caller does not ask for a limit
pub const DEFAULT_MATCH_LIMIT: usize = 5;

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    /// Ranked workers, truncated to the limit
    pub matches: Vec<WorkerProfile>,
    /// Size of the roster the request was matched against
    pub total_candidates: usize,
    /// Workers that passed every filter, before truncation
    pub eligible: usize,
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Proximity (always)
/// 2. Availability (always)
/// 3. Service type (when requested)
/// 4. Minimum rating (when requested)
/// 5. Certifications (when requested)
/// 6. Scoring, ranking and truncation
///
/// The matcher holds only configuration, so one instance is shared by every
/// request handler.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    default_limit: usize,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            weights,
            default_limit: DEFAULT_MATCH_LIMIT,
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default())
    }

    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Score a single worker relative to the client
    pub fn score(&self, worker: &WorkerProfile, client: &Location) -> f64 {
        calculate_score(worker, client, &self.weights)
    }

    /// Order workers by descending score
    pub fn rank(&self, workers: Vec<WorkerProfile>, client: &Location) -> Vec<WorkerProfile> {
        rank_workers(workers, client, &self.weights)
    }

    /// Apply every filter the request asks for, keeping roster order
    pub fn filter(&self, request: &MatchRequest, candidates: Vec<WorkerProfile>) -> Vec<WorkerProfile> {
        let mut pool = candidates;

        // Stage 1: Proximity
        let radius_km = request.effective_radius_km();
        pool.retain(|w| within_radius(w, &request.location, radius_km));
        tracing::debug!("{} workers within {}km", pool.len(), radius_km);

        // Stage 2: Availability
        match RequestedWindow::parse(request.date, &request.start_time, &request.end_time) {
            Some(window) => pool.retain(|w| covers(&w.availability, &window)),
            None => {
                tracing::debug!(
                    "Unparsable requested window {}-{}",
                    request.start_time,
                    request.end_time
                );
                pool.clear();
            }
        }
        tracing::debug!(
            "{} workers available on {} {}-{}",
            pool.len(),
            request.date,
            request.start_time,
            request.end_time
        );

        // Stage 3: Service type
        if let Some(service) = request.service_type.as_deref().filter(|s| !s.is_empty()) {
            pool.retain(|w| offers_service(w, service));
            tracing::debug!("{} workers offer {}", pool.len(), service);
        }

        if let Some(preferences) = &request.preferences {
            // Stage 4: Minimum rating
            if let Some(min_rating) = preferences.min_rating.filter(|r| *r > 0.0) {
                pool.retain(|w| meets_min_rating(w, min_rating));
                tracing::debug!("{} workers rated >= {}", pool.len(), min_rating);
            }

            // Stage 5: Certifications
            if !preferences.certifications.is_empty() {
                pool.retain(|w| holds_certifications(w, &preferences.certifications));
                tracing::debug!(
                    "{} workers hold {:?}",
                    pool.len(),
                    preferences.certifications
                );
            }
        }

        pool
    }

    /// Find the best workers for a request
    ///
    /// # Arguments
    /// * `request` - Location, window and optional criteria
    /// * `candidates` - The full worker roster
    /// * `limit` - Maximum number of workers to return (default when `None`)
    ///
    /// # Returns
    /// MatchResult with workers in ranked order; empty when nobody matches
    pub fn find_matches(
        &self,
        request: &MatchRequest,
        candidates: Vec<WorkerProfile>,
        limit: Option<usize>,
    ) -> MatchResult {
        let total_candidates = candidates.len();
        let limit = limit.unwrap_or(self.default_limit);

        let eligible = self.filter(request, candidates);
        let eligible_count = eligible.len();

        // Stage 6: Score, rank, truncate
        let mut scored = score_workers(eligible, &request.location, &self.weights);
        sort_candidates(&mut scored);
        scored.truncate(limit);

        MatchResult {
            matches: scored.into_iter().map(|c| c.worker).collect(),
            total_candidates,
            eligible: eligible_count,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Availability, TimeInterval, WorkerPreferences};
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn create_candidate(id: &str, lat: f64, lon: f64, services: &[&str]) -> WorkerProfile {
        WorkerProfile {
            id: id.to_string(),
            name: format!("Worker {}", id),
            email: String::new(),
            phone: None,
            location: Location::new(lat, lon),
            certifications: vec!["CPR Certification".to_string()],
            rating: 4.5,
            review_count: 20,
            service_types: services.iter().map(|s| s.to_string()).collect(),
            availability: Availability::Slots(vec![TimeInterval {
                date: date(),
                start_time: "08:00".to_string(),
                end_time: "17:00".to_string(),
            }]),
            created_at: None,
            updated_at: None,
        }
    }

    fn create_request() -> MatchRequest {
        MatchRequest {
            location: Location::new(43.6532, -79.3832),
            radius_km: 15.0,
            date: date(),
            start_time: "09:00".to_string(),
            end_time: "12:00".to_string(),
            service_type: None,
            preferences: None,
        }
    }

    #[test]
    fn test_find_matches_basic() {
        let matcher = Matcher::with_default_weights();
        let mut request = create_request();
        request.service_type = Some("General Support".to_string());

        let candidates = vec![
            create_candidate("1", 43.66, -79.39, &["General Support"]), // Match
            create_candidate("2", 45.50, -73.56, &["General Support"]), // Too far
            create_candidate("3", 43.66, -79.39, &["Companion Care"]),  // Wrong service
        ];

        let result = matcher.find_matches(&request, candidates, None);

        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].id, "1");
        assert_eq!(result.total_candidates, 3);
        assert_eq!(result.eligible, 1);
    }

    #[test]
    fn test_respects_limit() {
        let matcher = Matcher::with_default_weights();
        let request = create_request();

        let candidates: Vec<WorkerProfile> = (0..20)
            .map(|i| create_candidate(&i.to_string(), 43.6532 + i as f64 * 0.001, -79.3832, &[]))
            .collect();

        let result = matcher.find_matches(&request, candidates.clone(), None);
        assert_eq!(result.matches.len(), DEFAULT_MATCH_LIMIT);
        assert_eq!(result.eligible, 20);

        let result = matcher.find_matches(&request, candidates, Some(12));
        assert_eq!(result.matches.len(), 12);
    }

    #[test]
    fn test_preferences_applied() {
        let matcher = Matcher::with_default_weights();
        let mut request = create_request();
        request.preferences = Some(WorkerPreferences {
            max_distance: Some(2.0),
            min_rating: Some(4.0),
            certifications: vec!["cpr certification".to_string()],
        });

        let mut low_rated = create_candidate("low", 43.6532, -79.3832, &[]);
        low_rated.rating = 3.0;
        let mut uncertified = create_candidate("uncertified", 43.6532, -79.3832, &[]);
        uncertified.certifications.clear();

        let candidates = vec![
            create_candidate("ok", 43.6532, -79.3832, &[]),
            create_candidate("outside", 43.70, -79.3832, &[]), // ~5km, beyond maxDistance
            low_rated,
            uncertified,
        ];

        let result = matcher.find_matches(&request, candidates, None);
        let ids: Vec<_> = result.matches.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["ok"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let matcher = Matcher::with_default_weights();
        let mut request = create_request();
        request.date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();

        let candidates = vec![create_candidate("1", 43.66, -79.39, &[])];
        let result = matcher.find_matches(&request, candidates, None);

        assert!(result.matches.is_empty());
        assert_eq!(result.total_candidates, 1);
    }

    #[test]
    fn test_matches_sorted_by_score() {
        let matcher = Matcher::with_default_weights();
        let request = create_request();

        let candidates = vec![
            create_candidate("far", 43.72, -79.3832, &[]),
            create_candidate("near", 43.6540, -79.3832, &[]),
        ];

        let result = matcher.find_matches(&request, candidates, None);
        assert_eq!(result.matches[0].id, "near");
        assert!(
            matcher.score(&result.matches[0], &request.location)
                >= matcher.score(&result.matches[1], &request.location)
        );
    }
}
