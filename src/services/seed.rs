use chrono::NaiveDate;

use crate::models::{Availability, Location, TimeInterval, WorkerProfile};

struct SeedWorker {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    phone: &'static str,
    location: (f64, f64, &'static str, &'static str),
    certifications: &'static [&'static str],
    rating: f64,
    review_count: u32,
    slots: &'static [(u32, &'static str, &'static str)],
    service_types: &'static [&'static str],
}

// Slots are (day of January 2024, start, end)
const SEED_WORKERS: &[SeedWorker] = &[
    SeedWorker {
        id: "psw-001",
        name: "Sarah Johnson",
        email: "sarah.johnson@example.com",
        phone: "(555) 123-4567",
        location: (43.6532, -79.3832, "M5H 2N2", "King St W, Toronto"),
        certifications: &["CPR Certification", "First Aid", "Dementia Care", "Palliative Care"],
        rating: 4.9,
        review_count: 52,
        slots: &[(15, "08:00", "17:00"), (16, "09:00", "17:00"), (17, "08:00", "14:00")],
        service_types: &["General Support", "Companion Care", "Personal Hygiene", "Medication Management"],
    },
    SeedWorker {
        id: "psw-002",
        name: "Michael Chen",
        email: "m.chen@example.com",
        phone: "(555) 234-5678",
        location: (43.6629, -79.3957, "M5V 3A9", "Bay St, Toronto"),
        certifications: &["CPR Certification", "First Aid", "Mobility Assistance"],
        rating: 4.7,
        review_count: 38,
        slots: &[(15, "10:00", "18:00"), (16, "10:00", "18:00"), (17, "13:00", "21:00")],
        service_types: &["General Support", "Mobility Assistance", "Companion Care", "Household Tasks"],
    },
    SeedWorker {
        id: "psw-003",
        name: "Patricia Rodriguez",
        email: "p.rodriguez@example.com",
        phone: "(555) 345-6789",
        location: (43.6690, -79.4000, "M5W 1A1", "Toronto Downtown"),
        certifications: &["CPR Certification", "First Aid", "Dementia Care", "Alzheimer's Specialist"],
        rating: 4.8,
        review_count: 45,
        slots: &[(15, "07:00", "16:00"), (16, "07:00", "16:00"), (18, "08:00", "17:00")],
        service_types: &["Companion Care", "Personal Hygiene", "Specialized Care", "Dementia Support"],
    },
    SeedWorker {
        id: "psw-004",
        name: "James Wilson",
        email: "j.wilson@example.com",
        phone: "(555) 456-7890",
        location: (43.6426, -79.4081, "M5R 1J1", "Bloor St, Toronto"),
        certifications: &["CPR Certification", "First Aid", "Rehabilitation Support"],
        rating: 4.6,
        review_count: 32,
        slots: &[(15, "09:00", "17:00"), (17, "09:00", "17:00"), (18, "10:00", "18:00")],
        service_types: &["General Support", "Rehabilitation Support", "Exercise Assistance", "Companion Care"],
    },
    SeedWorker {
        id: "psw-005",
        name: "Angela Murphy",
        email: "a.murphy@example.com",
        phone: "(555) 567-8901",
        location: (43.6553, -79.3957, "M5V 2K2", "Downtown Toronto"),
        certifications: &["CPR Certification", "First Aid", "Personal Hygiene Specialist", "Nutrition Support"],
        rating: 4.9,
        review_count: 58,
        slots: &[(15, "06:00", "15:00"), (16, "06:00", "15:00"), (17, "07:00", "16:00")],
        service_types: &["Personal Hygiene", "Medication Management", "Nutrition Support", "General Support"],
    },
];

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// The five downtown Toronto workers used to seed a fresh store
pub fn sample_workers() -> Vec<WorkerProfile> {
    SEED_WORKERS
        .iter()
        .map(|seed| {
            let (latitude, longitude, postal_code, address) = seed.location;
            let slots = seed
                .slots
                .iter()
                .filter_map(|(day, start, end)| {
                    Some(TimeInterval {
                        date: NaiveDate::from_ymd_opt(2024, 1, *day)?,
                        start_time: start.to_string(),
                        end_time: end.to_string(),
                    })
                })
                .collect();

            WorkerProfile {
                id: seed.id.to_string(),
                name: seed.name.to_string(),
                email: seed.email.to_string(),
                phone: Some(seed.phone.to_string()),
                location: Location {
                    latitude,
                    longitude,
                    postal_code: Some(postal_code.to_string()),
                    address: Some(address.to_string()),
                },
                certifications: strings(seed.certifications),
                rating: seed.rating,
                review_count: seed.review_count,
                service_types: strings(seed.service_types),
                availability: Availability::Slots(slots),
                created_at: None,
                updated_at: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_workers() {
        let workers = sample_workers();
        assert_eq!(workers.len(), 5);
        assert_eq!(workers[0].name, "Sarah Johnson");

        for worker in &workers {
            match &worker.availability {
                Availability::Slots(slots) => assert_eq!(slots.len(), 3),
                other => panic!("unexpected calendar {:?}", other),
            }
        }
    }
}
