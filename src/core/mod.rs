// Core algorithm exports
pub mod availability;
pub mod distance;
pub mod filters;
pub mod matcher;
pub mod scoring;

pub use availability::{covers, is_available, RequestedWindow};
pub use distance::{distance_km, haversine_distance};
pub use filters::{
    filter_by_availability, filter_by_certifications, filter_by_min_rating, filter_by_proximity,
    filter_by_service_type,
};
pub use matcher::{MatchResult, Matcher, DEFAULT_MATCH_LIMIT};
pub use scoring::{calculate_score, rank_workers};
