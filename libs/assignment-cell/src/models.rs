use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use notification_cell::BookingNotice;
use therapist_cell::{Coordinates, Therapist};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParkingOption {
    Free,
    Paid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDetails {
    pub service_type: String,
    pub duration_minutes: i32,
    /// Local date and time of the visit at the customer's address.
    pub scheduled_at: NaiveDateTime,
    pub parking: ParkingOption,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Declined,
    Expired,
    Cancelled,
}

impl BookingStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::Pending)
    }

    pub fn can_transition_to(&self, target: &BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, target),
            (Pending, Confirmed) | (Pending, Declined) | (Pending, Expired) | (Pending, Cancelled)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub customer: Customer,
    pub service: ServiceDetails,
    /// Selected therapist first, remainder by ascending distance. Fixed at
    /// creation; only the cursor moves.
    pub candidate_order: Vec<Therapist>,
    pub current_index: usize,
    pub status: BookingStatus,
    pub winning_therapist: Option<Therapist>,
    pub deadline: Option<DateTime<Utc>>,
    /// Highest candidate index that has been notified; a dispatch for an
    /// index at or below this is a duplicate and must not re-notify.
    pub dispatched_through: Option<usize>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Booking {
    pub fn new(customer: Customer, service: ServiceDetails, candidate_order: Vec<Therapist>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            customer,
            service,
            candidate_order,
            current_index: 0,
            status: BookingStatus::Pending,
            winning_therapist: None,
            deadline: None,
            dispatched_through: None,
            created_at: now,
            updated_at: now,
            resolved_at: None,
        }
    }

    pub fn current_candidate(&self) -> Option<&Therapist> {
        self.candidate_order.get(self.current_index)
    }

    pub fn notice(&self) -> BookingNotice {
        BookingNotice {
            booking_id: self.id,
            customer_name: self.customer.name.clone(),
            customer_email: self.customer.email.clone(),
            address: self.customer.address.clone(),
            service_type: self.service.service_type.clone(),
            duration_minutes: self.service.duration_minutes,
            scheduled_at: self.service.scheduled_at,
            price: self.service.price,
        }
    }

    pub fn snapshot(&self) -> BookingSnapshot {
        BookingSnapshot {
            id: self.id,
            status: self.status,
            current_position: self.current_index,
            candidate_count: self.candidate_order.len(),
            price: self.service.price,
            deadline: self.deadline,
            winning_therapist: self.winning_therapist.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub address: String,
    /// Geocoded service address; absent when geocoding produced nothing.
    pub coordinates: Option<Coordinates>,
    pub service_type: String,
    pub duration_minutes: i32,
    pub scheduled_at: NaiveDateTime,
    pub parking: ParkingOption,
    pub selected_therapist_id: Option<Uuid>,
}

/// The one booking schema exposed at the HTTP boundary. Candidate contact
/// details stay server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSnapshot {
    pub id: Uuid,
    pub status: BookingStatus,
    pub current_position: usize,
    pub candidate_count: usize,
    pub price: f64,
    pub deadline: Option<DateTime<Utc>>,
    pub winning_therapist: Option<Therapist>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RespondAction {
    Accept,
    Decline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RespondOutcome {
    /// The responding therapist won the booking.
    Confirmed,
    /// Declined; the request moved to the next candidate.
    Advanced,
    /// Declined by the last remaining candidate.
    Declined,
    /// The response window lapsed for the last remaining candidate.
    Expired,
    /// The booking was already terminal, or another accept won the race.
    AlreadyResolved,
    /// The responder is no longer the current candidate.
    StaleResponder,
    Cancelled,
}
