use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use validator::Validate;

use super::{not_found, store_failure, validation_failed, AppState};
use crate::assistant::{booking_reply, extract_booking_data, suggestions_summary, WELCOME_MESSAGE};
use crate::models::{
    BookingData, ChatMessage, ChatRequest, ChatResponse, Conversation, ConversationCreatedResponse,
    CreateConversationRequest, MatchRequest, Sender, WorkerPreferences, WorkerProfile,
};

/// Number of workers suggested in a chat reply
const SUGGESTION_LIMIT: usize = 5;

/// Configure all chat routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/chat/conversation", web::post().to(create_conversation))
        .route("/chat/conversation/{conversation_id}", web::get().to(get_conversation))
        .route("/chat/message", web::post().to(send_message));
}

/// Start a conversation with the welcome message already posted
///
/// POST /api/chat/conversation
async fn create_conversation(
    state: web::Data<AppState>,
    req: web::Json<CreateConversationRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let mut conversation = Conversation::new(&req.client_id);
    conversation
        .messages
        .push(ChatMessage::new(&conversation.id, Sender::Ai, WELCOME_MESSAGE));

    match state.store.create_conversation(conversation).await {
        Ok(conversation) => {
            tracing::info!("Created conversation {} for client {}", conversation.id, conversation.client_id);
            HttpResponse::Ok().json(ConversationCreatedResponse {
                id: conversation.id,
                client_id: conversation.client_id,
                status: conversation.status,
            })
        }
        Err(e) => store_failure("Failed to create conversation", e),
    }
}

async fn get_conversation(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let conversation_id = path.into_inner();

    match state.store.get_conversation(&conversation_id).await {
        Ok(Some(conversation)) => HttpResponse::Ok().json(conversation),
        Ok(None) => not_found("Conversation", &conversation_id),
        Err(e) => store_failure("Failed to retrieve conversation", e),
    }
}

/// Process a client chat message
///
/// POST /api/chat/message
///
/// Extracts booking details from the text, merges them into what the
/// conversation already knows and, once location, date and both times are
/// known, suggests the best matching workers.
async fn send_message(state: web::Data<AppState>, req: web::Json<ChatRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let mut conversation = match state.store.get_conversation(&req.conversation_id).await {
        Ok(Some(conversation)) => conversation,
        Ok(None) => return not_found("Conversation", &req.conversation_id),
        Err(e) => return store_failure("Failed to process message", e),
    };

    let mut extracted = extract_booking_data(&req.message, Utc::now().date_naive());
    if let Some(location) = &req.location {
        extracted.client_location = Some(location.clone());
    }
    tracing::debug!(
        "Extracted from message in {}: confidence {}",
        conversation.id,
        extracted.confidence
    );

    let mut booking_data = conversation.extracted_data.clone();
    booking_data.merge(extracted);

    let mut ai_message = booking_reply(&booking_data);
    let suggested = match suggest_workers(&state, &booking_data).await {
        Ok(suggested) => suggested,
        Err(response) => return response,
    };
    if let Some(workers) = &suggested {
        ai_message = format!("{}\n\n{}", ai_message, suggestions_summary(workers));
    }
    let suggested = suggested.unwrap_or_default();

    conversation
        .messages
        .push(ChatMessage::new(&conversation.id, Sender::Client, req.message.clone()));

    let mut reply = ChatMessage::new(&conversation.id, Sender::Ai, ai_message.clone());
    reply.metadata = serde_json::to_value(&booking_data).ok();
    conversation.messages.push(reply);
    conversation.extracted_data = booking_data.clone();

    if let Err(e) = state.store.update_conversation(&conversation).await {
        return store_failure("Failed to process message", e);
    }

    tracing::info!(
        "Replied in conversation {} with {} suggestions",
        conversation.id,
        suggested.len()
    );

    HttpResponse::Ok().json(ChatResponse {
        conversation_id: conversation.id,
        ai_message,
        extracted_data: booking_data,
        requires_confirmation: !suggested.is_empty(),
        suggested_psws: suggested,
    })
}

/// Preferences for chat suggestions; a `maxDistance` of zero or less means
/// the client gave no distance, so the default radius applies
fn suggestion_preferences(preferences: Option<&WorkerPreferences>) -> Option<WorkerPreferences> {
    preferences.cloned().map(|mut p| {
        if p.max_distance.is_some_and(|d| d <= 0.0) {
            p.max_distance = None;
        }
        p
    })
}

/// Run the matcher once the booking details are complete; `None` until then
async fn suggest_workers(
    state: &AppState,
    data: &BookingData,
) -> Result<Option<Vec<WorkerProfile>>, HttpResponse> {
    let (Some(location), Some(date), Some(start_time), Some(end_time)) = (
        &data.client_location,
        data.desired_date,
        &data.desired_start_time,
        &data.desired_end_time,
    ) else {
        return Ok(None);
    };

    let preferences = suggestion_preferences(data.psw_preferences.as_ref());
    let radius_km = preferences
        .as_ref()
        .and_then(|p| p.max_distance)
        .unwrap_or(state.matching.default_radius_km);

    let request = MatchRequest {
        location: location.clone(),
        radius_km,
        date,
        start_time: start_time.clone(),
        end_time: end_time.clone(),
        service_type: data.service_type.clone(),
        preferences,
    };

    let roster = state
        .store
        .list_workers()
        .await
        .map_err(|e| store_failure("Failed to process message", e))?;

    let result = state.matcher.find_matches(&request, roster, Some(SUGGESTION_LIMIT));
    Ok(Some(result.matches))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_max_distance_uses_default_radius() {
        let zero = WorkerPreferences {
            max_distance: Some(0.0),
            min_rating: Some(4.5),
            certifications: Vec::new(),
        };

        let preferences = suggestion_preferences(Some(&zero)).unwrap();
        assert_eq!(preferences.max_distance, None);
        assert_eq!(preferences.min_rating, Some(4.5));
    }

    #[test]
    fn test_positive_max_distance_is_kept() {
        let near = WorkerPreferences {
            max_distance: Some(2.5),
            ..Default::default()
        };

        assert_eq!(suggestion_preferences(Some(&near)).unwrap().max_distance, Some(2.5));
        assert!(suggestion_preferences(None).is_none());
    }
}
