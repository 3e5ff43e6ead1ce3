use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use shared_models::error::AppError;

use crate::error::AssignmentError;
use crate::models::{CreateBookingRequest, RespondAction};
use crate::services::assignment::AssignmentService;
use crate::token;

/// Accept/decline parameters, identical for the email-link (query) and the
/// JSON variants. Anything that fails to parse never reaches the machine.
#[derive(Debug, Deserialize)]
pub struct RespondParams {
    pub therapist_id: Uuid,
    pub action: RespondAction,
    pub token: String,
}

/// Create a booking and start the assignment round.
pub async fn create_booking(
    State(service): State<Arc<AssignmentService>>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<Value>, AppError> {
    info!("Booking request from {}", request.customer_email);

    let snapshot = service
        .create_booking(request)
        .await
        .map_err(domain_error)?;

    Ok(Json(json!({
        "success": true,
        "booking": snapshot,
    })))
}

/// Status polling endpoint for the customer-facing page.
pub async fn get_booking(
    State(service): State<Arc<AssignmentService>>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    match service.get_booking(booking_id).await {
        Some(snapshot) => Ok(Json(json!({ "booking": snapshot }))),
        None => Err(AppError::NotFound(format!(
            "Booking {} not found",
            booking_id
        ))),
    }
}

/// Target of the accept/decline links in therapist email.
pub async fn respond_from_link(
    State(service): State<Arc<AssignmentService>>,
    Path(booking_id): Path<Uuid>,
    Query(params): Query<RespondParams>,
) -> Result<Json<Value>, AppError> {
    respond_inner(service, booking_id, params).await
}

/// JSON variant of the response callback for non-mail clients.
pub async fn respond(
    State(service): State<Arc<AssignmentService>>,
    Path(booking_id): Path<Uuid>,
    Json(params): Json<RespondParams>,
) -> Result<Json<Value>, AppError> {
    respond_inner(service, booking_id, params).await
}

/// Customer abandons a pending booking.
pub async fn cancel_booking(
    State(service): State<Arc<AssignmentService>>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    info!("Cancel request for booking {}", booking_id);

    let outcome = service.cancel(booking_id).await.map_err(domain_error)?;

    Ok(Json(json!({ "outcome": outcome })))
}

async fn respond_inner(
    service: Arc<AssignmentService>,
    booking_id: Uuid,
    params: RespondParams,
) -> Result<Json<Value>, AppError> {
    // The token is the authorization; verify before touching any state.
    if !token::verify(
        &service.config().response_token_secret,
        booking_id,
        params.therapist_id,
        &params.token,
    ) {
        return Err(AppError::Auth("Invalid response link".to_string()));
    }

    info!(
        "Response for booking {} from therapist {}: {:?}",
        booking_id, params.therapist_id, params.action
    );

    let outcome = service
        .respond(booking_id, params.therapist_id, params.action)
        .await
        .map_err(domain_error)?;

    Ok(Json(json!({ "outcome": outcome })))
}

fn domain_error(error: AssignmentError) -> AppError {
    match error {
        AssignmentError::NoCandidatesInRange => {
            AppError::UnprocessableEntity("No therapists available within range".to_string())
        }
        AssignmentError::BookingNotFound(id) => {
            AppError::NotFound(format!("Booking {} not found", id))
        }
        AssignmentError::ValidationError(msg) => AppError::BadRequest(msg),
    }
}
