//! Rule-based booking assistant
//!
//! Turns free-text client messages into [`BookingData`](crate::models::BookingData)
//! and writes the replies shown in the chat.

pub mod extraction;
pub mod reply;

pub use extraction::extract_booking_data;
pub use reply::{booking_reply, confirmation_message, suggestions_summary, WELCOME_MESSAGE};
