use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::domain::{Location, MatchRequest, WorkerPreferences};
use super::time::{deserialize_date, TimeOfDay};

/// Request for workers available around a location at a given time
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AvailablePswsRequest {
    #[validate(nested)]
    pub location: Location,
    #[validate(range(min = 0.0))]
    pub radius: f64,
    #[serde(rename = "desiredDate", deserialize_with = "deserialize_date")]
    pub desired_date: NaiveDate,
    #[serde(rename = "startTime")]
    #[validate(custom(function = "validate_clock_time"))]
    pub start_time: String,
    #[serde(rename = "endTime")]
    #[validate(custom(function = "validate_clock_time"))]
    pub end_time: String,
    #[serde(rename = "serviceType", default)]
    pub service_type: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub preferences: Option<WorkerPreferences>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl AvailablePswsRequest {
    pub fn to_match_request(&self) -> MatchRequest {
        MatchRequest {
            location: self.location.clone(),
            radius_km: self.radius,
            date: self.desired_date,
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            service_type: self.service_type.clone(),
            preferences: self.preferences.clone(),
        }
    }
}

/// Query string for free-text worker search
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchPswsQuery {
    #[validate(length(min = 1))]
    pub query: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
}

/// Request to confirm a booking with a chosen worker
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConfirmBookingRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "clientId")]
    pub client_id: String,
    #[validate(length(min = 1))]
    #[serde(rename = "pswId")]
    pub psw_id: String,
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "endTime")]
    pub end_time: DateTime<Utc>,
    #[validate(length(min = 1))]
    #[serde(rename = "serviceType")]
    pub service_type: String,
    #[serde(rename = "conversationId", default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListBookingsQuery {
    #[validate(length(min = 1))]
    #[serde(rename = "clientId")]
    pub client_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateConversationRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "clientId")]
    pub client_id: String,
}

/// A client chat message
///
/// `location` lets a browser attach its own coordinates instead of relying
/// on the city named in the text.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "conversationId")]
    pub conversation_id: String,
    #[validate(length(min = 1))]
    #[serde(rename = "clientId")]
    pub client_id: String,
    #[validate(length(min = 1))]
    pub message: String,
    #[serde(default)]
    #[validate(nested)]
    pub location: Option<Location>,
}

fn validate_clock_time(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<TimeOfDay>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("clock_time"))
}
