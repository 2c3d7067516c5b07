use chrono::{Datelike, NaiveDate};

use crate::models::{Availability, SlotStatus, TimeInterval, TimeOfDay, WeeklySchedule};

/// A requested window on a date, with both ends already parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestedWindow {
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl RequestedWindow {
    /// Parse the request's "HH:MM" strings
    ///
    /// Returns `None` when either time is unparsable; such a request can
    /// never be satisfied.
    pub fn parse(date: NaiveDate, start: &str, end: &str) -> Option<Self> {
        let start = start.parse::<TimeOfDay>().ok()?;
        let end = end.parse::<TimeOfDay>().ok()?;
        Some(Self { date, start, end })
    }
}

/// Check whether a calendar covers the requested window
///
/// Dispatches on the calendar representation:
/// flat intervals need one interval on the date that contains the window;
/// weekly schedules defer to the date's override if there is one, otherwise
/// to the presence of the weekday in the template.
pub fn is_available(
    calendar: &Availability,
    requested_date: NaiveDate,
    requested_start: &str,
    requested_end: &str,
) -> bool {
    match RequestedWindow::parse(requested_date, requested_start, requested_end) {
        Some(window) => covers(calendar, &window),
        None => {
            tracing::debug!(
                "Unparsable requested window {}-{} on {}",
                requested_start,
                requested_end,
                requested_date
            );
            false
        }
    }
}

/// Same as [`is_available`] with the window parsed once up front
#[inline]
pub fn covers(calendar: &Availability, window: &RequestedWindow) -> bool {
    match calendar {
        Availability::Slots(slots) => slots_cover(slots, window),
        Availability::Weekly(schedule) => weekly_covers(schedule, window),
    }
}

fn slots_cover(slots: &[TimeInterval], window: &RequestedWindow) -> bool {
    if window.end < window.start {
        return false;
    }

    slots
        .iter()
        .filter(|slot| slot.date == window.date)
        .any(|slot| match parse_slot(slot) {
            Some((start, end)) => start <= window.start && window.end <= end,
            None => false,
        })
}

fn parse_slot(slot: &TimeInterval) -> Option<(TimeOfDay, TimeOfDay)> {
    match (slot.start_time.parse::<TimeOfDay>(), slot.end_time.parse::<TimeOfDay>()) {
        (Ok(start), Ok(end)) => Some((start, end)),
        _ => {
            tracing::debug!(
                "Skipping slot with unparsable times {:?}-{:?} on {}",
                slot.start_time,
                slot.end_time,
                slot.date
            );
            None
        }
    }
}

// Override slots are checked on status only; their bounds are not compared
// with the requested window.
fn weekly_covers(schedule: &WeeklySchedule, window: &RequestedWindow) -> bool {
    if let Some(slots) = schedule.overrides.get(&window.date) {
        return slots.iter().any(|slot| slot.status == SlotStatus::Available);
    }

    schedule.template.contains_key(&window.date.weekday())
}
