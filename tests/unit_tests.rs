// Unit tests for PSW Match

use chrono::{NaiveDate, Weekday};
use psw_match::assistant::extract_booking_data;
use psw_match::core::{
    calculate_score, distance_km, filter_by_certifications, filter_by_min_rating, filter_by_proximity,
    filter_by_service_type, haversine_distance, is_available, rank_workers,
};
use psw_match::models::{
    Availability, Coordinate, Location, OverrideSlot, ScoringWeights, SlotStatus, TimeInterval, TimeOfDay,
    TimeWindow, WeeklySchedule, WorkerProfile,
};
use std::collections::HashMap;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn create_test_worker(id: &str, lat: f64, lon: f64, rating: f64, review_count: u32) -> WorkerProfile {
    WorkerProfile {
        id: id.to_string(),
        name: format!("Worker {}", id),
        email: format!("{}@example.com", id),
        phone: None,
        location: Location::new(lat, lon),
        certifications: vec!["CPR Certification".to_string(), "First Aid".to_string()],
        rating,
        review_count,
        service_types: vec!["General Support".to_string()],
        availability: Availability::Slots(vec![TimeInterval {
            date: date(2024, 1, 15),
            start_time: "08:00".to_string(),
            end_time: "17:00".to_string(),
        }]),
        created_at: None,
        updated_at: None,
    }
}

fn ids(workers: &[WorkerProfile]) -> Vec<&str> {
    workers.iter().map(|w| w.id.as_str()).collect()
}

#[test]
fn test_haversine_distance_zero() {
    let distance = haversine_distance(43.6532, -79.3832, 43.6532, -79.3832);
    assert_eq!(distance, 0.0);
}

#[test]
fn test_toronto_distance() {
    let distance = distance_km(Coordinate::new(43.6532, -79.3832), Coordinate::new(43.6629, -79.3957));
    assert!(distance > 1.4 && distance < 1.5, "got {}", distance);
}

#[test]
fn test_distance_symmetry() {
    let pairs = [
        ((43.6532, -79.3832), (49.2827, -123.1207)),
        ((90.0, 0.0), (-90.0, 0.0)),
        ((0.0, 179.9), (0.0, -179.9)),
    ];

    for ((lat1, lon1), (lat2, lon2)) in pairs {
        let there = haversine_distance(lat1, lon1, lat2, lon2);
        let back = haversine_distance(lat2, lon2, lat1, lon1);
        assert!((there - back).abs() < 1e-9);
        assert!(there >= 0.0);
    }
}

#[test]
fn test_zero_radius_keeps_exact_location_only() {
    let workers = vec![
        create_test_worker("same", 43.6532, -79.3832, 4.0, 0),
        create_test_worker("near", 43.6533, -79.3832, 4.0, 0),
    ];

    let kept = filter_by_proximity(&workers, &Location::new(43.6532, -79.3832), 0.0);
    assert_eq!(ids(&kept), vec!["same"]);
}

#[test]
fn test_empty_service_type_is_identity() {
    let workers = vec![
        create_test_worker("a", 43.65, -79.38, 4.0, 0),
        create_test_worker("b", 43.66, -79.39, 4.0, 0),
    ];

    assert_eq!(filter_by_service_type(&workers, Some("")), workers);
    assert_eq!(filter_by_service_type(&workers, None), workers);
}

#[test]
fn test_certifications_superset_case_insensitive() {
    let mut lowercase = create_test_worker("lower", 43.65, -79.38, 4.0, 0);
    lowercase.certifications = vec![
        "cpr certification".to_string(),
        "first aid".to_string(),
        "dementia care".to_string(),
    ];
    let mut partial = create_test_worker("partial", 43.65, -79.38, 4.0, 0);
    partial.certifications = vec!["CPR Certification".to_string()];

    let required = vec!["CPR Certification".to_string(), "First Aid".to_string()];
    let kept = filter_by_certifications(&[lowercase, partial], &required);
    assert_eq!(ids(&kept), vec!["lower"]);
}

#[test]
fn test_min_rating_threshold() {
    let workers = vec![
        create_test_worker("low", 43.65, -79.38, 3.9, 0),
        create_test_worker("edge", 43.65, -79.38, 4.5, 0),
        create_test_worker("high", 43.65, -79.38, 4.9, 0),
    ];

    assert_eq!(ids(&filter_by_min_rating(&workers, Some(4.5))), vec!["edge", "high"]);
    assert_eq!(filter_by_min_rating(&workers, Some(0.0)).len(), 3);
}

#[test]
fn test_interval_containment() {
    let calendar = create_test_worker("a", 43.65, -79.38, 4.0, 0).availability;

    assert!(is_available(&calendar, date(2024, 1, 15), "09:00", "12:00"));
    assert!(!is_available(&calendar, date(2024, 1, 15), "07:00", "18:00"));
    assert!(!is_available(&calendar, date(2024, 1, 16), "09:00", "12:00"));
    // Zero-length windows match any containing interval, including its bounds
    assert!(is_available(&calendar, date(2024, 1, 15), "17:00", "17:00"));
    // Reversed windows never match
    assert!(!is_available(&calendar, date(2024, 1, 15), "12:00", "09:00"));
}

#[test]
fn test_weekly_template_with_override() {
    let mut template = HashMap::new();
    template.insert(
        Weekday::Mon,
        vec![TimeWindow {
            start_time: "09:00".to_string(),
            end_time: "17:00".to_string(),
        }],
    );

    let mut overrides = HashMap::new();
    // 2024-01-22 is a Monday the worker has taken off
    overrides.insert(
        date(2024, 1, 22),
        vec![OverrideSlot {
            start_time: "09:00".to_string(),
            end_time: "17:00".to_string(),
            status: SlotStatus::Unavailable,
        }],
    );
    // 2024-01-20 is a Saturday the worker picked up
    overrides.insert(
        date(2024, 1, 20),
        vec![OverrideSlot {
            start_time: "13:00".to_string(),
            end_time: "15:00".to_string(),
            status: SlotStatus::Available,
        }],
    );

    let calendar = Availability::Weekly(WeeklySchedule { template, overrides });

    assert!(is_available(&calendar, date(2024, 1, 15), "09:00", "12:00"));
    assert!(!is_available(&calendar, date(2024, 1, 16), "09:00", "12:00"));
    assert!(!is_available(&calendar, date(2024, 1, 22), "09:00", "12:00"));
    assert!(is_available(&calendar, date(2024, 1, 20), "09:00", "12:00"));
}

#[test]
fn test_score_monotonic() {
    let weights = ScoringWeights::default();
    let client = Location::new(43.6532, -79.3832);

    let near = calculate_score(&create_test_worker("near", 43.66, -79.38, 4.0, 5), &client, &weights);
    let far = calculate_score(&create_test_worker("far", 43.80, -79.38, 4.0, 5), &client, &weights);
    assert!(near >= far);

    let low = calculate_score(&create_test_worker("low", 43.66, -79.38, 3.0, 5), &client, &weights);
    assert!(near >= low);

    let remote = calculate_score(&create_test_worker("remote", -43.65, 100.62, 0.0, 0), &client, &weights);
    assert_eq!(remote, 0.0);
}

#[test]
fn test_rank_is_permutation() {
    let client = Location::new(43.6532, -79.3832);
    let workers = vec![
        create_test_worker("a", 43.70, -79.38, 4.0, 10),
        create_test_worker("b", 43.6532, -79.3832, 4.8, 40),
        create_test_worker("c", 43.66, -79.39, 3.5, 2),
    ];

    let ranked = rank_workers(workers.clone(), &client, &ScoringWeights::default());
    assert_eq!(ranked.len(), workers.len());
    assert_eq!(ranked[0].id, "b");

    let mut ranked_ids = ids(&ranked);
    ranked_ids.sort();
    assert_eq!(ranked_ids, vec!["a", "b", "c"]);
}

#[test]
fn test_time_of_day_parsing() {
    assert_eq!("9:05".parse::<TimeOfDay>().unwrap().minutes(), 545);
    assert!("24:00".parse::<TimeOfDay>().is_err());
    assert!("09:60".parse::<TimeOfDay>().is_err());
    assert!("nine".parse::<TimeOfDay>().is_err());
}

#[test]
fn test_extraction_complete_message() {
    let today = date(2024, 1, 10);
    let data = extract_booking_data(
        "I need companion care in Toronto on January 15 from 9am to 12pm",
        today,
    );

    assert!(data.is_complete);
    assert_eq!(data.confidence, 0.9);
    assert_eq!(data.desired_date, Some(date(2024, 1, 15)));
    assert_eq!(data.desired_start_time.as_deref(), Some("09:00"));
    assert_eq!(data.desired_end_time.as_deref(), Some("12:00"));
    assert_eq!(data.service_type.as_deref(), Some("Companion Care"));
    assert!(data.client_location.is_some());
}
