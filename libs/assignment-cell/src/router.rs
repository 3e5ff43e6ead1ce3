use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{
    cancel_booking, create_booking, get_booking, respond, respond_from_link,
};
use crate::services::assignment::AssignmentService;

pub fn create_booking_router(state: Arc<AssignmentService>) -> Router {
    Router::new()
        .route("/", post(create_booking))
        .route("/{booking_id}", get(get_booking))
        .route("/{booking_id}/respond", get(respond_from_link).post(respond))
        .route("/{booking_id}/cancel", post(cancel_booking))
        .with_state(state)
}
