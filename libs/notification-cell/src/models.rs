use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A rendered outbound message, ready for the mail provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// The booking fields notifications are rendered from.
///
/// The assignment cell owns the full booking record; this is the view it
/// hands across the dispatcher boundary.
#[derive(Debug, Clone)]
pub struct BookingNotice {
    pub booking_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub address: String,
    pub service_type: String,
    pub duration_minutes: i32,
    pub scheduled_at: NaiveDateTime,
    pub price: f64,
}

#[derive(Debug, Clone)]
pub struct TherapistContact {
    pub name: String,
    pub email: String,
}
