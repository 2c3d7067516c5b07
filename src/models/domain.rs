use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// A point on the globe, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// A coordinate with optional postal details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Location {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[serde(rename = "postalCode", default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            postal_code: None,
            address: None,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// One block of declared availability on a specific date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeInterval {
    #[serde(deserialize_with = "super::time::deserialize_date")]
    pub date: NaiveDate,
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "endTime")]
    pub end_time: String,
}

/// A start/end pair inside the weekly template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "endTime")]
    pub end_time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Booked,
    Unavailable,
}

/// A slot on a date that overrides the weekly template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideSlot {
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "endTime")]
    pub end_time: String,
    pub status: SlotStatus,
}

/// Recurring weekly availability plus per-date exceptions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    #[serde(default)]
    pub template: HashMap<Weekday, Vec<TimeWindow>>,
    #[serde(default)]
    pub overrides: HashMap<NaiveDate, Vec<OverrideSlot>>,
}

/// A worker's availability calendar
///
/// Serialized as either `availableTimeSlots` or `weeklyAvailability`. When a
/// document carries both, the weekly calendar wins. A document with neither
/// reads as an empty slot list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CalendarFields")]
pub enum Availability {
    #[serde(rename = "availableTimeSlots")]
    Slots(Vec<TimeInterval>),
    #[serde(rename = "weeklyAvailability")]
    Weekly(WeeklySchedule),
}

/// Both calendar keys as they may appear on a stored profile
#[derive(Deserialize)]
struct CalendarFields {
    #[serde(rename = "availableTimeSlots", default)]
    slots: Option<Vec<TimeInterval>>,
    #[serde(rename = "weeklyAvailability", default)]
    weekly: Option<WeeklySchedule>,
}

impl From<CalendarFields> for Availability {
    fn from(fields: CalendarFields) -> Self {
        match (fields.weekly, fields.slots) {
            (Some(schedule), _) => Availability::Weekly(schedule),
            (None, Some(slots)) => Availability::Slots(slots),
            (None, None) => Availability::default(),
        }
    }
}

impl Default for Availability {
    fn default() -> Self {
        Availability::Slots(Vec::new())
    }
}

/// Personal Support Worker profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerProfile {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub location: Location,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(rename = "ratings", alias = "rating", default)]
    pub rating: f64,
    #[serde(rename = "reviewCount", default)]
    pub review_count: u32,
    #[serde(rename = "serviceTypes", default)]
    pub service_types: Vec<String>,
    #[serde(flatten)]
    pub availability: Availability,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Optional constraints a client puts on the worker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct WorkerPreferences {
    #[serde(rename = "maxDistance", default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub max_distance: Option<f64>,
    #[serde(rename = "minRating", default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certifications: Vec<String>,
}

/// Input to one run of the matching pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRequest {
    pub location: Location,
    pub radius_km: f64,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub service_type: Option<String>,
    pub preferences: Option<WorkerPreferences>,
}

impl MatchRequest {
    /// Radius actually searched: the request radius, tightened by `maxDistance`
    pub fn effective_radius_km(&self) -> f64 {
        match self.preferences.as_ref().and_then(|p| p.max_distance) {
            Some(max) if max < self.radius_km => max,
            _ => self.radius_km,
        }
    }
}

/// A worker carried through ranking with its transient score
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub worker: WorkerProfile,
    pub score: f64,
    pub distance_km: f64,
}

/// Scoring weights
///
/// `score = baseline - distance_penalty * km + rating_weight * rating
///          + min(review_weight * reviews, review_cap)`, floored at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub baseline: f64,
    pub distance_penalty: f64,
    pub rating_weight: f64,
    pub review_weight: f64,
    pub review_cap: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            baseline: 100.0,
            distance_penalty: 2.0,
            rating_weight: 5.0,
            review_weight: 0.5,
            review_cap: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

/// A confirmed (or pending) appointment between a client and a worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "clientId")]
    pub client_id: String,
    #[serde(rename = "pswId")]
    pub psw_id: String,
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "endTime")]
    pub end_time: DateTime<Utc>,
    #[serde(rename = "serviceType")]
    pub service_type: String,
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Partial update applied to a stored booking
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingUpdate {
    #[serde(rename = "startTime", default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(rename = "endTime", default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(rename = "serviceType", default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Booking {
    pub fn apply(&mut self, update: BookingUpdate) {
        if let Some(start) = update.start_time {
            self.start_time = start;
        }
        if let Some(end) = update.end_time {
            self.end_time = end;
        }
        if let Some(service_type) = update.service_type {
            self.service_type = service_type;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if update.notes.is_some() {
            self.notes = update.notes;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Client,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    #[serde(rename = "conversationId")]
    pub conversation_id: String,
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl ChatMessage {
    pub fn new(conversation_id: &str, sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            conversation_id: conversation_id.to_string(),
            sender,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    Active,
    Completed,
    Archived,
}

/// Booking details gathered from the conversation so far
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingData {
    #[serde(rename = "clientLocation", default, skip_serializing_if = "Option::is_none")]
    pub client_location: Option<Location>,
    #[serde(
        rename = "desiredDate",
        default,
        deserialize_with = "super::time::deserialize_optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub desired_date: Option<NaiveDate>,
    #[serde(rename = "desiredStartTime", default, skip_serializing_if = "Option::is_none")]
    pub desired_start_time: Option<String>,
    #[serde(rename = "desiredEndTime", default, skip_serializing_if = "Option::is_none")]
    pub desired_end_time: Option<String>,
    #[serde(rename = "serviceType", default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(rename = "pswPreferences", default, skip_serializing_if = "Option::is_none")]
    pub psw_preferences: Option<WorkerPreferences>,
    #[serde(rename = "isComplete", default)]
    pub is_complete: bool,
    #[serde(default)]
    pub confidence: f64,
}

impl BookingData {
    /// Overlay a newer extraction; fields the newer one lacks are kept
    pub fn merge(&mut self, update: BookingData) {
        if update.client_location.is_some() {
            self.client_location = update.client_location;
        }
        if update.desired_date.is_some() {
            self.desired_date = update.desired_date;
        }
        if update.desired_start_time.is_some() {
            self.desired_start_time = update.desired_start_time;
        }
        if update.desired_end_time.is_some() {
            self.desired_end_time = update.desired_end_time;
        }
        if update.service_type.is_some() {
            self.service_type = update.service_type;
        }
        if update.psw_preferences.is_some() {
            self.psw_preferences = update.psw_preferences;
        }
        self.confidence = update.confidence;
        self.is_complete = self.has_match_fields();
    }

    /// True when location, date and both times are known
    pub fn has_match_fields(&self) -> bool {
        self.client_location.is_some()
            && self.desired_date.is_some()
            && self.desired_start_time.is_some()
            && self.desired_end_time.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "clientId")]
    pub client_id: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(rename = "extractedData", default)]
    pub extracted_data: BookingData,
    pub status: ConversationStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(client_id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            client_id: client_id.to_string(),
            messages: Vec::new(),
            extracted_data: BookingData::default(),
            status: ConversationStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }
}
