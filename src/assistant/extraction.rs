use chrono::{Datelike, Duration, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::models::{BookingData, Location, TimeOfDay};

static MONTH_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+(\d{1,2})(?:st|nd|rd|th)?(?:,?\s+(\d{4}))?\b",
    )
    .expect("month date pattern")
});

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").expect("iso date pattern"));

static NUMERIC_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{2}|\d{4})\b").expect("numeric date pattern")
});

static RELATIVE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(today|tomorrow|next\s+(monday|tuesday|wednesday|thursday|friday|saturday|sunday))\b")
        .expect("relative date pattern")
});

static MERIDIEM_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*(am|pm)\s*(?:-|–|to|until|till)\s*(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\b",
    )
    .expect("meridiem range pattern")
});

static CLOCK_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2}):(\d{2})\s*(?:-|–|to|until|till)\s*(\d{1,2}):(\d{2})\b")
        .expect("clock range pattern")
});

static AT_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bat\s+(\d{1,2})(?::(\d{2}))?\s*(am|pm)\b").expect("at time pattern")
});

static POSTAL_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([a-z]\d[a-z])\s?(\d[a-z]\d)\b").expect("postal code pattern")
});

/// Cities the assistant can place without a geocoder
const KNOWN_CITIES: &[(&str, f64, f64)] = &[
    ("Toronto", 43.6532, -79.3832),
    ("Vancouver", 49.2827, -123.1207),
    ("Calgary", 51.0447, -114.0719),
    ("Montreal", 45.5017, -73.5673),
    ("Ottawa", 45.4215, -75.6972),
    ("Winnipeg", 49.8951, -97.1384),
    ("Edmonton", 53.5461, -113.4938),
    ("Quebec", 46.8139, -71.2080),
];

/// Keywords mapped onto the service catalogue, first hit wins
const SERVICE_KEYWORDS: &[(&str, &[&str])] = &[
    ("Companion Care", &["companion", "company", "social", "visit", "friend"]),
    ("Personal Hygiene", &["hygiene", "bath", "shower", "grooming", "dressing"]),
    ("Medication Management", &["medication", "medicine", "pills", "prescription"]),
    ("Mobility Assistance", &["mobility", "walking", "wheelchair", "transfer"]),
    ("Dementia Support", &["dementia", "alzheimer", "memory"]),
    ("Household Tasks", &["clean", "housework", "household", "cook", "meal", "laundry"]),
    ("Rehabilitation Support", &["rehab", "physio", "exercise", "recovery"]),
    ("General Support", &["general support", "caregiv", "elderly", "senior", "assist"]),
];

/// Pull booking details out of a free-text client message
///
/// `today` anchors relative dates ("tomorrow", "next friday") and supplies
/// the year when the message names only a month and day.
pub fn extract_booking_data(message: &str, today: NaiveDate) -> BookingData {
    let mut data = BookingData {
        client_location: extract_location(message),
        desired_date: extract_date(message, today),
        service_type: extract_service_type(message),
        ..Default::default()
    };

    if let Some((start, end)) = extract_times(message) {
        data.desired_start_time = Some(start.to_string());
        data.desired_end_time = end.map(|t| t.to_string());
    }

    let has_location = data.client_location.is_some();
    let has_date = data.desired_date.is_some();
    let has_time = data.desired_start_time.is_some();
    let found = [has_location, has_date, has_time].iter().filter(|f| **f).count();

    data.confidence = match found {
        3 => 0.9,
        2 => 0.6,
        1 => 0.4,
        _ => 0.1,
    };
    data.is_complete = data.has_match_fields();

    data
}

/// Find the first date in the message
pub fn extract_date(message: &str, today: NaiveDate) -> Option<NaiveDate> {
    if let Some(caps) = MONTH_DATE.captures(message) {
        let month = month_number(&caps[1])?;
        let day: u32 = caps[2].parse().ok()?;
        let year = match caps.get(3) {
            Some(y) => y.as_str().parse().ok()?,
            None => today.year(),
        };
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    if let Some(caps) = ISO_DATE.captures(message) {
        let date = NaiveDate::from_ymd_opt(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        );
        if date.is_some() {
            return date;
        }
    }

    if let Some(caps) = NUMERIC_DATE.captures(message) {
        let month: u32 = caps[1].parse().ok()?;
        let day: u32 = caps[2].parse().ok()?;
        let mut year: i32 = caps[3].parse().ok()?;
        if year < 100 {
            year += 2000;
        }
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    let caps = RELATIVE_DATE.captures(message)?;
    let phrase = caps[1].to_lowercase();
    if phrase == "today" {
        return Some(today);
    }
    if phrase == "tomorrow" {
        return today.succ_opt();
    }
    let weekday: Weekday = caps.get(2)?.as_str().parse().ok()?;
    Some(next_weekday(today, weekday))
}

/// The first `weekday` strictly after `today`
fn next_weekday(today: NaiveDate, weekday: Weekday) -> NaiveDate {
    let current = today.weekday().num_days_from_monday() as i64;
    let target = weekday.num_days_from_monday() as i64;
    let mut ahead = (target - current).rem_euclid(7);
    if ahead == 0 {
        ahead = 7;
    }
    today + Duration::days(ahead)
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.get(..3)?.to_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Find a time range (or a single start time) in the message
///
/// Times are normalised to 24-hour clock values.
pub fn extract_times(message: &str) -> Option<(TimeOfDay, Option<TimeOfDay>)> {
    if let Some(caps) = MERIDIEM_RANGE.captures(message) {
        let start_meridiem = caps[3].to_lowercase();
        let start = meridiem_time(&caps, 1, 2, &start_meridiem);
        let end_meridiem = caps
            .get(6)
            .map(|m| m.as_str().to_lowercase())
            .unwrap_or_else(|| start_meridiem.clone());
        let end = meridiem_time(&caps, 4, 5, &end_meridiem);
        if let Some(start) = start {
            return Some((start, end));
        }
    }

    if let Some(caps) = CLOCK_RANGE.captures(message) {
        let start = clock_time(&caps[1], &caps[2]);
        let end = clock_time(&caps[3], &caps[4]);
        if let (Some(start), Some(end)) = (start, end) {
            return Some((start, Some(end)));
        }
    }

    let caps = AT_TIME.captures(message)?;
    let meridiem = caps[3].to_lowercase();
    meridiem_time(&caps, 1, 2, &meridiem).map(|start| (start, None))
}

fn meridiem_time(caps: &Captures<'_>, hour_idx: usize, minute_idx: usize, meridiem: &str) -> Option<TimeOfDay> {
    let hour: u8 = caps.get(hour_idx)?.as_str().parse().ok()?;
    let minute: u8 = match caps.get(minute_idx) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    if hour == 0 || hour > 12 {
        return None;
    }
    let hour = match (meridiem, hour) {
        ("am", 12) => 0,
        ("pm", 12) => 12,
        ("pm", h) => h + 12,
        (_, h) => h,
    };
    TimeOfDay::from_hm(hour, minute)
}

fn clock_time(hour: &str, minute: &str) -> Option<TimeOfDay> {
    TimeOfDay::from_hm(hour.parse().ok()?, minute.parse().ok()?)
}

/// Place the client using the known-city list
pub fn extract_location(message: &str) -> Option<Location> {
    let lower = message.to_lowercase();
    let (city, latitude, longitude) = KNOWN_CITIES
        .iter()
        .find(|(city, _, _)| lower.contains(&city.to_lowercase()))?;

    let postal_code = POSTAL_CODE
        .captures(message)
        .map(|caps| format!("{} {}", &caps[1], &caps[2]).to_uppercase());

    Some(Location {
        latitude: *latitude,
        longitude: *longitude,
        postal_code,
        address: Some(city.to_string()),
    })
}

/// Map service keywords onto a catalogue label
pub fn extract_service_type(message: &str) -> Option<String> {
    let lower = message.to_lowercase();
    SERVICE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(label, _)| label.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        // A Wednesday
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_dates() {
        assert_eq!(extract_date("January 15th 2024 please", today()), Some(date(2024, 1, 15)));
        assert_eq!(extract_date("on jan 15", today()), Some(date(2024, 1, 15)));
        assert_eq!(extract_date("March 3, 2025", today()), Some(date(2025, 3, 3)));
    }

    #[test]
    fn test_numeric_dates() {
        assert_eq!(extract_date("on 1/15/2024", today()), Some(date(2024, 1, 15)));
        assert_eq!(extract_date("on 1-15-24", today()), Some(date(2024, 1, 15)));
        assert_eq!(extract_date("on 2024-01-15", today()), Some(date(2024, 1, 15)));
        assert_eq!(extract_date("on 13/45/2024", today()), None);
    }

    #[test]
    fn test_relative_dates() {
        assert_eq!(extract_date("today works", today()), Some(today()));
        assert_eq!(extract_date("Tomorrow?", today()), Some(date(2024, 1, 11)));
        assert_eq!(extract_date("next Monday", today()), Some(date(2024, 1, 15)));
        // Same weekday jumps a full week
        assert_eq!(extract_date("next wednesday", today()), Some(date(2024, 1, 17)));
    }

    #[test]
    fn test_time_ranges() {
        let (start, end) = extract_times("from 9am - 12pm").unwrap();
        assert_eq!(start.to_string(), "09:00");
        assert_eq!(end.unwrap().to_string(), "12:00");

        let (start, end) = extract_times("9:30 am to 1:15 pm").unwrap();
        assert_eq!(start.to_string(), "09:30");
        assert_eq!(end.unwrap().to_string(), "13:15");

        // End inherits the start meridiem
        let (start, end) = extract_times("2pm to 5").unwrap();
        assert_eq!(start.to_string(), "14:00");
        assert_eq!(end.unwrap().to_string(), "17:00");

        let (start, end) = extract_times("between 09:00 and 12:00 or 09:00-12:00").unwrap();
        assert_eq!(start.to_string(), "09:00");
        assert_eq!(end.unwrap().to_string(), "12:00");
    }

    #[test]
    fn test_single_time() {
        let (start, end) = extract_times("can someone come at 3pm").unwrap();
        assert_eq!(start.to_string(), "15:00");
        assert!(end.is_none());

        let (start, _) = extract_times("at 12 am").unwrap();
        assert_eq!(start.to_string(), "00:00");

        assert!(extract_times("no times here").is_none());
    }

    #[test]
    fn test_location() {
        let location = extract_location("I live in Toronto, M5H 2N2").unwrap();
        assert_eq!(location.address.as_deref(), Some("Toronto"));
        assert_eq!(location.postal_code.as_deref(), Some("M5H 2N2"));
        assert_eq!(location.latitude, 43.6532);

        assert!(extract_location("somewhere in Springfield").is_none());
    }

    #[test]
    fn test_service_type() {
        assert_eq!(
            extract_service_type("my mother needs help with her medication").as_deref(),
            Some("Medication Management")
        );
        assert_eq!(
            extract_service_type("looking for a companion for my dad").as_deref(),
            Some("Companion Care")
        );
        assert_eq!(extract_service_type("hello"), None);
    }

    #[test]
    fn test_full_message() {
        let data = extract_booking_data(
            "I need a PSW in Toronto on January 15 2024 from 9am to 12pm for general support",
            today(),
        );

        assert!(data.is_complete);
        assert_eq!(data.confidence, 0.9);
        assert_eq!(data.desired_date, Some(date(2024, 1, 15)));
        assert_eq!(data.desired_start_time.as_deref(), Some("09:00"));
        assert_eq!(data.desired_end_time.as_deref(), Some("12:00"));
        assert_eq!(data.service_type.as_deref(), Some("General Support"));
    }

    #[test]
    fn test_confidence_levels() {
        assert_eq!(extract_booking_data("hello there", today()).confidence, 0.1);
        assert_eq!(extract_booking_data("I am in Ottawa", today()).confidence, 0.4);
        assert_eq!(extract_booking_data("Ottawa tomorrow", today()).confidence, 0.6);

        let partial = extract_booking_data("Ottawa tomorrow at 3pm", today());
        assert_eq!(partial.confidence, 0.9);
        // No end time yet, so the pipeline cannot run
        assert!(!partial.is_complete);
    }
}
