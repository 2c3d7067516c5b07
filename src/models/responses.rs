use serde::{Deserialize, Serialize};

use super::domain::{Booking, BookingData, ConversationStatus, WorkerProfile};

/// Response for the available workers endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailablePswsResponse {
    #[serde(rename = "pswProfiles")]
    pub psw_profiles: Vec<WorkerProfile>,
    #[serde(rename = "totalCount")]
    pub total_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPswsResponse {
    pub results: Vec<WorkerProfile>,
    #[serde(rename = "totalCount")]
    pub total_count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmationResponse {
    pub booking: Booking,
    #[serde(rename = "confirmationMessage")]
    pub confirmation_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingListResponse {
    pub bookings: Vec<Booking>,
    #[serde(rename = "totalCount")]
    pub total_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationCreatedResponse {
    pub id: String,
    #[serde(rename = "clientId")]
    pub client_id: String,
    pub status: ConversationStatus,
}

/// Reply to a chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(rename = "conversationId")]
    pub conversation_id: String,
    #[serde(rename = "aiMessage")]
    pub ai_message: String,
    #[serde(rename = "extractedData")]
    pub extracted_data: BookingData,
    #[serde(rename = "suggestedPSWs")]
    pub suggested_psws: Vec<WorkerProfile>,
    #[serde(rename = "requiresConfirmation")]
    pub requires_confirmation: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedResponse {
    pub message: String,
    pub added: usize,
}
