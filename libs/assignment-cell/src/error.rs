use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AssignmentError {
    #[error("No therapists available within range")]
    NoCandidatesInRange,

    #[error("Booking not found: {0}")]
    BookingNotFound(Uuid),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
