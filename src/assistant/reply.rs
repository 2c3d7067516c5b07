use chrono::{DateTime, Utc};

use crate::models::{BookingData, WorkerProfile};

pub const WELCOME_MESSAGE: &str = "Hello! I'm your PSW booking assistant. I'm here to help you find and book a Personal Support Worker.

Tell me a bit about what you need:
- Where are you located (city or postal code)?
- When would you like to book? (specific date or general timeframe)
- What time of day works best for you?
- Any specific services or certifications you're looking for?

Feel free to describe your needs in your own words!";

/// Compose the assistant's reply from everything known so far
pub fn booking_reply(data: &BookingData) -> String {
    let location = data
        .client_location
        .as_ref()
        .and_then(|l| l.address.clone().or_else(|| l.postal_code.clone()))
        .unwrap_or_else(|| "your location".to_string());

    if data.has_match_fields() {
        return format!(
            "Great! I found the following details:\n- Location: {}\n- Date: {}\n- Time: {} - {}\n\nLet me search for available PSWs in your area with these requirements.",
            location,
            data.desired_date.map(|d| d.to_string()).unwrap_or_default(),
            data.desired_start_time.as_deref().unwrap_or_default(),
            data.desired_end_time.as_deref().unwrap_or_default(),
        );
    }

    let mut found = Vec::new();
    if data.client_location.is_some() {
        found.push(format!("Location: {}", location));
    }
    if let Some(date) = data.desired_date {
        found.push(format!("Date: {}", date));
    }
    if let Some(start) = &data.desired_start_time {
        found.push(format!("Time: {}", start));
    }
    if let Some(service) = &data.service_type {
        found.push(format!("Service: {}", service));
    }

    let mut missing = Vec::new();
    if data.client_location.is_none() {
        missing.push("location (e.g., city or postal code)");
    }
    if data.desired_date.is_none() {
        missing.push("preferred date");
    }
    if data.desired_start_time.is_none() {
        missing.push("preferred time");
    } else if data.desired_end_time.is_none() {
        missing.push("when the visit should end");
    }

    let found = if found.is_empty() {
        "nothing specific yet".to_string()
    } else {
        found.join(", ")
    };

    format!(
        "Thank you! So far I have: {}\n\nTo help you better, could you please provide: {}?",
        found,
        missing.join(", ")
    )
}

/// One line summarising the suggestions that follow the reply
pub fn suggestions_summary(suggested: &[WorkerProfile]) -> String {
    match suggested.len() {
        0 => "Unfortunately no PSWs are available for that time and place. Would you like to try a different date, time or a wider search radius?".to_string(),
        1 => format!("I found 1 PSW who can help: {}.", suggested[0].name),
        n => {
            let names: Vec<&str> = suggested.iter().map(|w| w.name.as_str()).collect();
            format!("I found {} PSWs who can help: {}.", n, names.join(", "))
        }
    }
}

/// Confirmation text sent once a booking is stored
pub fn confirmation_message(
    worker_name: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    service_type: &str,
    booking_id: &str,
) -> String {
    format!(
        "Great! Your booking has been confirmed!

**Booking Details:**
- **Worker:** {}
- **Date:** {}
- **Time:** {} - {}
- **Service:** {}
- **Booking ID:** {}

If you need to reschedule or cancel, you can do so up to 24 hours before the appointment.

Is there anything else I can help you with?",
        worker_name,
        start.format("%Y-%m-%d"),
        start.format("%H:%M"),
        end.format("%H:%M"),
        service_type,
        booking_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Location;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn test_complete_reply_lists_details() {
        let data = BookingData {
            client_location: Some(Location {
                address: Some("Toronto".to_string()),
                ..Location::new(43.6532, -79.3832)
            }),
            desired_date: NaiveDate::from_ymd_opt(2024, 1, 15),
            desired_start_time: Some("09:00".to_string()),
            desired_end_time: Some("12:00".to_string()),
            ..Default::default()
        };

        let reply = booking_reply(&data);
        assert!(reply.contains("Location: Toronto"));
        assert!(reply.contains("Date: 2024-01-15"));
        assert!(reply.contains("Time: 09:00 - 12:00"));
    }

    #[test]
    fn test_partial_reply_asks_for_missing() {
        let data = BookingData {
            desired_date: NaiveDate::from_ymd_opt(2024, 1, 15),
            desired_start_time: Some("09:00".to_string()),
            ..Default::default()
        };

        let reply = booking_reply(&data);
        assert!(reply.contains("Date: 2024-01-15"));
        assert!(reply.contains("location (e.g., city or postal code)"));
        assert!(reply.contains("when the visit should end"));
        assert!(!reply.contains("preferred date"));
    }

    #[test]
    fn test_confirmation_message() {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();

        let message = confirmation_message("Sarah Johnson", start, end, "General Support", "b-1");
        assert!(message.contains("**Worker:** Sarah Johnson"));
        assert!(message.contains("**Time:** 09:00 - 12:00"));
        assert!(message.contains("**Booking ID:** b-1"));
    }

    #[test]
    fn test_suggestions_summary() {
        assert!(suggestions_summary(&[]).starts_with("Unfortunately"));
    }
}
