use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use notification_cell::{NotificationDispatcher, TherapistContact};
use shared_config::AppConfig;
use therapist_cell::{Therapist, TherapistService};

use crate::error::AssignmentError;
use crate::models::{
    Booking, BookingSnapshot, BookingStatus, CreateBookingRequest, Customer, RespondAction,
    RespondOutcome, ServiceDetails,
};
use crate::services::pricing::PricingService;
use crate::token;

/// What exhausted the candidate list decides the terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdvanceCause {
    Decline,
    Timeout,
}

/// Owns every booking's lifecycle.
///
/// The registry is the single authoritative store; each booking sits behind
/// its own async mutex, so all transitions for one booking are serialized
/// no matter which channel they arrive from (HTTP callback, deadline timer,
/// cancellation). The accept check-and-set happens under that lock, which is
/// what makes at-most-one-winner hold.
#[derive(Clone)]
pub struct AssignmentService {
    config: Arc<AppConfig>,
    roster: Arc<TherapistService>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    bookings: Arc<RwLock<HashMap<Uuid, Arc<Mutex<Booking>>>>>,
    pricing: Arc<PricingService>,
}

impl AssignmentService {
    pub fn new(
        config: Arc<AppConfig>,
        roster: Arc<TherapistService>,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            config,
            roster,
            dispatcher,
            bookings: Arc::new(RwLock::new(HashMap::new())),
            pricing: Arc::new(PricingService::new()),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Create a booking and start contacting candidates.
    ///
    /// Fails with `NoCandidatesInRange` before any booking exists when the
    /// address could not be geocoded or nobody is in range; coordinates are
    /// never substituted with a default.
    pub async fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> Result<BookingSnapshot, AssignmentError> {
        if request.customer_name.trim().is_empty() || request.customer_email.trim().is_empty() {
            return Err(AssignmentError::ValidationError(
                "Customer name and email are required".to_string(),
            ));
        }

        let origin = request
            .coordinates
            .ok_or(AssignmentError::NoCandidatesInRange)?;

        let matches = self
            .roster
            .matches_within(origin, self.config.search_radius_km);
        if matches.is_empty() {
            return Err(AssignmentError::NoCandidatesInRange);
        }

        let mut candidates: Vec<Therapist> =
            matches.into_iter().map(|m| m.therapist).collect();

        // The explicitly selected therapist gets first right of refusal;
        // everyone else stays in nearest-first order.
        if let Some(selected_id) = request.selected_therapist_id {
            let position = candidates
                .iter()
                .position(|t| t.id == selected_id)
                .ok_or_else(|| {
                    AssignmentError::ValidationError(
                        "Selected therapist is not available in range".to_string(),
                    )
                })?;
            let selected = candidates.remove(position);
            candidates.insert(0, selected);
        }

        let price = self.pricing.quote(
            request.duration_minutes,
            request.scheduled_at,
            request.parking,
        )?;

        let customer = Customer {
            name: request.customer_name,
            email: request.customer_email,
            phone: request.customer_phone,
            address: request.address,
            coordinates: origin,
        };
        let service = ServiceDetails {
            service_type: request.service_type,
            duration_minutes: request.duration_minutes,
            scheduled_at: request.scheduled_at,
            parking: request.parking,
            price,
        };

        let booking = Booking::new(customer, service, candidates);
        let booking_id = booking.id;
        let cell = Arc::new(Mutex::new(booking));

        {
            let mut bookings = self.bookings.write().await;
            bookings.insert(booking_id, Arc::clone(&cell));
        }

        let mut booking = cell.lock().await;
        info!(
            "Booking {} created for {} with {} candidates",
            booking_id,
            booking.customer.email,
            booking.candidate_order.len()
        );

        let dispatcher = Arc::clone(&self.dispatcher);
        let notice = booking.notice();
        tokio::spawn(async move {
            if let Err(e) = dispatcher.send_customer_acknowledgment(&notice).await {
                warn!("Delivery failure for booking {} acknowledgment: {}", notice.booking_id, e);
            }
        });

        self.arm_candidate(&mut booking);
        Ok(booking.snapshot())
    }

    /// Re-entrant dispatch for the candidate at `index`. A duplicate call for
    /// an index that was already notified is a no-op.
    pub async fn dispatch(&self, booking_id: Uuid, index: usize) -> Result<(), AssignmentError> {
        let cell = self
            .booking_cell(booking_id)
            .await
            .ok_or(AssignmentError::BookingNotFound(booking_id))?;
        let mut booking = cell.lock().await;

        if booking.status != BookingStatus::Pending || booking.current_index != index {
            debug!(
                "Dispatch for booking {} index {} skipped (status {:?}, index {})",
                booking_id, index, booking.status, booking.current_index
            );
            return Ok(());
        }

        self.arm_candidate(&mut booking);
        Ok(())
    }

    /// Deliver a therapist's accept/decline into the state machine.
    pub async fn respond(
        &self,
        booking_id: Uuid,
        therapist_id: Uuid,
        action: RespondAction,
    ) -> Result<RespondOutcome, AssignmentError> {
        let cell = self
            .booking_cell(booking_id)
            .await
            .ok_or(AssignmentError::BookingNotFound(booking_id))?;
        let mut booking = cell.lock().await;

        if booking.status.is_terminal() {
            debug!(
                "Late response from {} for booking {} ({:?})",
                therapist_id, booking_id, booking.status
            );
            return Ok(RespondOutcome::AlreadyResolved);
        }

        let Some(current) = booking.current_candidate().cloned() else {
            return Ok(RespondOutcome::AlreadyResolved);
        };

        if current.id != therapist_id {
            info!(
                "Stale response from {} for booking {} (current candidate is {})",
                therapist_id, booking_id, current.id
            );
            return Ok(RespondOutcome::StaleResponder);
        }

        match action {
            RespondAction::Accept => {
                let now = Utc::now();
                booking.status = BookingStatus::Confirmed;
                booking.winning_therapist = Some(current.clone());
                booking.deadline = None;
                booking.resolved_at = Some(now);
                booking.updated_at = now;

                info!("Booking {} confirmed by {}", booking_id, current.name);

                let dispatcher = Arc::clone(&self.dispatcher);
                let notice = booking.notice();
                let contact = contact_for(&current);
                tokio::spawn(async move {
                    if let Err(e) = dispatcher
                        .send_customer_confirmation(&notice, &contact)
                        .await
                    {
                        warn!(
                            "Delivery failure for booking {} confirmation: {}",
                            notice.booking_id, e
                        );
                    }
                });

                Ok(RespondOutcome::Confirmed)
            }
            RespondAction::Decline => {
                info!(
                    "Candidate {} ({}) declined booking {}",
                    booking.current_index, current.name, booking_id
                );
                Ok(self.advance(&mut booking, AdvanceCause::Decline))
            }
        }
    }

    /// Customer abandons the booking.
    pub async fn cancel(&self, booking_id: Uuid) -> Result<RespondOutcome, AssignmentError> {
        let cell = self
            .booking_cell(booking_id)
            .await
            .ok_or(AssignmentError::BookingNotFound(booking_id))?;
        let mut booking = cell.lock().await;

        if booking.status.is_terminal() {
            return Ok(RespondOutcome::AlreadyResolved);
        }

        let now = Utc::now();
        booking.status = BookingStatus::Cancelled;
        booking.deadline = None;
        booking.resolved_at = Some(now);
        booking.updated_at = now;

        info!("Booking {} cancelled by customer", booking_id);
        Ok(RespondOutcome::Cancelled)
    }

    pub async fn get_booking(&self, booking_id: Uuid) -> Option<BookingSnapshot> {
        let cell = self.booking_cell(booking_id).await?;
        let booking = cell.lock().await;
        Some(booking.snapshot())
    }

    // Private helpers

    async fn booking_cell(&self, booking_id: Uuid) -> Option<Arc<Mutex<Booking>>> {
        let bookings = self.bookings.read().await;
        bookings.get(&booking_id).cloned()
    }

    /// Notify the current candidate and arm their response deadline.
    ///
    /// Caller holds the booking lock. Idempotent per `(booking, index)`:
    /// an index that was already dispatched is never re-notified. The send
    /// and the timer are spawned; neither holds the lock, and a failed send
    /// still leaves the deadline armed so the booking advances on timeout.
    fn arm_candidate(&self, booking: &mut Booking) {
        let booking_id = booking.id;
        let index = booking.current_index;

        if booking.dispatched_through.is_some_and(|d| d >= index) {
            debug!(
                "Candidate {} of booking {} already notified, skipping duplicate dispatch",
                index, booking_id
            );
            return;
        }
        let Some(therapist) = booking.current_candidate().cloned() else {
            return;
        };

        let now = Utc::now();
        booking.dispatched_through = Some(index);
        booking.deadline =
            Some(now + chrono::Duration::seconds(self.config.response_deadline_secs as i64));
        booking.updated_at = now;

        let response_token =
            token::generate(&self.config.response_token_secret, booking_id, therapist.id);
        let accept_url = self.respond_url(booking_id, therapist.id, "accept", &response_token);
        let decline_url = self.respond_url(booking_id, therapist.id, "decline", &response_token);

        info!(
            "Dispatching booking {} to candidate {} ({}), {}s response window",
            booking_id, index, therapist.name, self.config.response_deadline_secs
        );

        let dispatcher = Arc::clone(&self.dispatcher);
        let notice = booking.notice();
        let contact = contact_for(&therapist);
        tokio::spawn(async move {
            if let Err(e) = dispatcher
                .send_therapist_request(&notice, &contact, &accept_url, &decline_url)
                .await
            {
                warn!(
                    "Delivery failure for booking {} candidate {}: {}",
                    notice.booking_id, index, e
                );
            }
        });

        let service = self.clone();
        let window = self.config.response_window();
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            service.handle_timeout(booking_id, index).await;
        });
    }

    /// Deadline timer fired for `(booking, index)`. A timer that outlived its
    /// candidate does nothing, which is what makes cancellation race-safe.
    async fn handle_timeout(&self, booking_id: Uuid, index: usize) {
        let Some(cell) = self.booking_cell(booking_id).await else {
            return;
        };
        let mut booking = cell.lock().await;

        if booking.status != BookingStatus::Pending || booking.current_index != index {
            debug!(
                "Deadline timer for booking {} index {} is stale, ignoring",
                booking_id, index
            );
            return;
        }

        info!(
            "No response from candidate {} for booking {} within the window",
            index, booking_id
        );
        self.advance(&mut booking, AdvanceCause::Timeout);
    }

    /// Move the cursor past the current candidate. Caller holds the lock.
    fn advance(&self, booking: &mut Booking, cause: AdvanceCause) -> RespondOutcome {
        let next = booking.current_index + 1;
        let now = Utc::now();

        if next < booking.candidate_order.len() {
            booking.current_index = next;
            booking.deadline = None;
            booking.updated_at = now;
            self.arm_candidate(booking);
            return RespondOutcome::Advanced;
        }

        let (status, outcome, reason) = match cause {
            AdvanceCause::Decline => (
                BookingStatus::Declined,
                RespondOutcome::Declined,
                "declined by all candidates",
            ),
            AdvanceCause::Timeout => (
                BookingStatus::Expired,
                RespondOutcome::Expired,
                "no response from any candidate",
            ),
        };

        booking.status = status;
        booking.deadline = None;
        booking.resolved_at = Some(now);
        booking.updated_at = now;

        info!("Booking {} exhausted all candidates: {}", booking.id, reason);

        let dispatcher = Arc::clone(&self.dispatcher);
        let notice = booking.notice();
        tokio::spawn(async move {
            if let Err(e) = dispatcher.send_customer_decline(&notice).await {
                warn!(
                    "Delivery failure for booking {} decline notice: {}",
                    notice.booking_id, e
                );
            }
            if let Err(e) = dispatcher.send_admin_notice(&notice, reason).await {
                warn!(
                    "Delivery failure for booking {} admin notice: {}",
                    notice.booking_id, e
                );
            }
        });

        outcome
    }

    fn respond_url(&self, booking_id: Uuid, therapist_id: Uuid, action: &str, token: &str) -> String {
        format!(
            "{}/bookings/{}/respond?therapist_id={}&action={}&token={}",
            self.config.public_base_url, booking_id, therapist_id, action, token
        )
    }
}

fn contact_for(therapist: &Therapist) -> TherapistContact {
    TherapistContact {
        name: therapist.name.clone(),
        email: therapist.email.clone(),
    }
}
