use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use chrono::Utc;
use validator::Validate;

use super::{error_response, not_found, store_failure, validation_failed, AppState};
use crate::assistant::confirmation_message;
use crate::models::{
    Booking, BookingConfirmationResponse, BookingListResponse, BookingStatus, BookingUpdate, ChatMessage,
    ConfirmBookingRequest, ConversationStatus, ListBookingsQuery, Sender,
};

/// Configure all booking routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/booking/confirm", web::post().to(confirm_booking))
        .route("/booking/list", web::get().to(list_bookings))
        .route("/booking/{booking_id}", web::get().to(get_booking))
        .route("/booking/{booking_id}", web::patch().to(update_booking))
        .route("/booking/{booking_id}", web::delete().to(cancel_booking));
}

/// Confirm a booking with the chosen worker
///
/// POST /api/booking/confirm
///
/// Request body:
/// ```json
/// {
///   "clientId": "string",
///   "pswId": "string",
///   "startTime": "2024-01-15T09:00:00Z",
///   "endTime": "2024-01-15T12:00:00Z",
///   "serviceType": "General Support",
///   "conversationId": "string"
/// }
/// ```
async fn confirm_booking(state: web::Data<AppState>, req: web::Json<ConfirmBookingRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }
    if req.end_time <= req.start_time {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Validation failed",
            "endTime must be after startTime",
        );
    }

    let worker = match state.store.get_worker(&req.psw_id).await {
        Ok(Some(worker)) => worker,
        Ok(None) => return not_found("PSW", &req.psw_id),
        Err(e) => return store_failure("Failed to confirm booking", e),
    };

    let now = Utc::now();
    let booking = Booking {
        id: String::new(),
        client_id: req.client_id.clone(),
        psw_id: req.psw_id.clone(),
        start_time: req.start_time,
        end_time: req.end_time,
        service_type: req.service_type.clone(),
        status: BookingStatus::Confirmed,
        notes: req.notes.clone(),
        created_at: now,
        updated_at: now,
    };

    let booking = match state.store.create_booking(booking).await {
        Ok(booking) => booking,
        Err(e) => return store_failure("Failed to confirm booking", e),
    };

    let message = confirmation_message(
        &worker.name,
        booking.start_time,
        booking.end_time,
        &booking.service_type,
        &booking.id,
    );

    if let Some(conversation_id) = &req.conversation_id {
        close_conversation(&state, conversation_id, &message).await;
    }

    tracing::info!(
        "Confirmed booking {} for client {} with {}",
        booking.id,
        booking.client_id,
        worker.name
    );

    HttpResponse::Ok().json(BookingConfirmationResponse {
        booking,
        confirmation_message: message,
    })
}

/// Mark the conversation completed and post the confirmation into it.
/// The booking already exists at this point, so failures are only logged.
async fn close_conversation(state: &AppState, conversation_id: &str, message: &str) {
    let mut conversation = match state.store.get_conversation(conversation_id).await {
        Ok(Some(conversation)) => conversation,
        Ok(None) => {
            tracing::warn!("Booking confirmed for unknown conversation {}", conversation_id);
            return;
        }
        Err(e) => {
            tracing::warn!("Failed to load conversation {}: {}", conversation_id, e);
            return;
        }
    };

    conversation.status = ConversationStatus::Completed;
    conversation
        .messages
        .push(ChatMessage::new(conversation_id, Sender::Ai, message));

    if let Err(e) = state.store.update_conversation(&conversation).await {
        tracing::warn!("Failed to update conversation {}: {}", conversation_id, e);
    }
}

/// GET /api/booking/list?clientId={clientId}
async fn list_bookings(state: web::Data<AppState>, query: web::Query<ListBookingsQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors);
    }

    match state.store.list_client_bookings(&query.client_id).await {
        Ok(bookings) => HttpResponse::Ok().json(BookingListResponse {
            total_count: bookings.len(),
            bookings,
        }),
        Err(e) => store_failure("Failed to retrieve bookings", e),
    }
}

async fn get_booking(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let booking_id = path.into_inner();

    match state.store.get_booking(&booking_id).await {
        Ok(Some(booking)) => HttpResponse::Ok().json(booking),
        Ok(None) => not_found("Booking", &booking_id),
        Err(e) => store_failure("Failed to retrieve booking", e),
    }
}

async fn update_booking(
    state: web::Data<AppState>,
    path: web::Path<String>,
    update: web::Json<BookingUpdate>,
) -> impl Responder {
    let booking_id = path.into_inner();

    match state.store.update_booking(&booking_id, update.into_inner()).await {
        Ok(booking) => {
            tracing::info!("Updated booking {}", booking.id);
            HttpResponse::Ok().json(booking)
        }
        Err(e) => store_failure("Failed to update booking", e),
    }
}

async fn cancel_booking(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let booking_id = path.into_inner();

    match state.store.cancel_booking(&booking_id).await {
        Ok(booking) => {
            tracing::info!("Cancelled booking {}", booking.id);
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Booking cancelled successfully",
                "booking": booking,
            }))
        }
        Err(e) => store_failure("Failed to cancel booking", e),
    }
}
