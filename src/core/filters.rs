use chrono::NaiveDate;

use crate::core::availability::{covers, RequestedWindow};
use crate::core::distance::distance_km;
use crate::models::{Location, WorkerProfile};

/// Check if a worker is within `radius_km` of the client
#[inline]
pub fn within_radius(worker: &WorkerProfile, client: &Location, radius_km: f64) -> bool {
    distance_km(client.coordinate(), worker.location.coordinate()) <= radius_km
}

/// Check if a worker offers the service, ignoring case
///
/// An empty service type matches everyone.
#[inline]
pub fn offers_service(worker: &WorkerProfile, service_type: &str) -> bool {
    if service_type.is_empty() {
        return true;
    }
    worker
        .service_types
        .iter()
        .any(|offered| eq_ignore_case(offered, service_type))
}

/// Check if a worker meets the minimum rating
///
/// A non-positive minimum matches everyone.
#[inline]
pub fn meets_min_rating(worker: &WorkerProfile, min_rating: f64) -> bool {
    min_rating <= 0.0 || worker.rating >= min_rating
}

/// Check if a worker holds every required certification, ignoring case
#[inline]
pub fn holds_certifications(worker: &WorkerProfile, required: &[String]) -> bool {
    required.iter().all(|needed| {
        worker
            .certifications
            .iter()
            .any(|held| eq_ignore_case(held, needed))
    })
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Keep workers within `radius_km` of the client
pub fn filter_by_proximity(
    workers: &[WorkerProfile],
    client: &Location,
    radius_km: f64,
) -> Vec<WorkerProfile> {
    workers
        .iter()
        .filter(|w| within_radius(w, client, radius_km))
        .cloned()
        .collect()
}

/// Keep workers whose calendar covers the requested window
pub fn filter_by_availability(
    workers: &[WorkerProfile],
    date: NaiveDate,
    start_time: &str,
    end_time: &str,
) -> Vec<WorkerProfile> {
    let Some(window) = RequestedWindow::parse(date, start_time, end_time) else {
        tracing::debug!("Unparsable requested window {}-{}, no worker matches", start_time, end_time);
        return Vec::new();
    };

    workers
        .iter()
        .filter(|w| covers(&w.availability, &window))
        .cloned()
        .collect()
}

/// Keep workers offering the service; absent or empty keeps everyone
pub fn filter_by_service_type(
    workers: &[WorkerProfile],
    service_type: Option<&str>,
) -> Vec<WorkerProfile> {
    match service_type {
        Some(service) if !service.is_empty() => workers
            .iter()
            .filter(|w| offers_service(w, service))
            .cloned()
            .collect(),
        _ => workers.to_vec(),
    }
}

/// Keep workers rated at least `min_rating`; absent or non-positive keeps everyone
pub fn filter_by_min_rating(workers: &[WorkerProfile], min_rating: Option<f64>) -> Vec<WorkerProfile> {
    match min_rating {
        Some(min) if min > 0.0 => workers
            .iter()
            .filter(|w| meets_min_rating(w, min))
            .cloned()
            .collect(),
        _ => workers.to_vec(),
    }
}

/// Keep workers holding every required certification; empty keeps everyone
pub fn filter_by_certifications(workers: &[WorkerProfile], required: &[String]) -> Vec<WorkerProfile> {
    if required.is_empty() {
        return workers.to_vec();
    }
    workers
        .iter()
        .filter(|w| holds_certifications(w, required))
        .cloned()
        .collect()
}
