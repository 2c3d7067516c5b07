// Model exports
pub mod domain;
pub mod requests;
pub mod responses;
pub mod time;

pub use domain::{
    Availability, Booking, BookingData, BookingStatus, BookingUpdate, ChatMessage, Conversation,
    ConversationStatus, Coordinate, Location, MatchRequest, OverrideSlot, ScoredCandidate,
    ScoringWeights, Sender, SlotStatus, TimeInterval, TimeWindow, WeeklySchedule, WorkerPreferences,
    WorkerProfile,
};
pub use requests::{
    AvailablePswsRequest, ChatRequest, ConfirmBookingRequest, CreateConversationRequest,
    ListBookingsQuery, SearchPswsQuery,
};
pub use responses::{
    AvailablePswsResponse, BookingConfirmationResponse, BookingListResponse, ChatResponse,
    ConversationCreatedResponse, ErrorResponse, HealthResponse, SearchPswsResponse, SeedResponse,
};
pub use time::{parse_date, TimeOfDay, TimeParseError};
