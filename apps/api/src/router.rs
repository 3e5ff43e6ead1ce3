use std::sync::Arc;

use axum::{routing::get, Router};

use assignment_cell::{create_booking_router, AssignmentService};
use shared_config::AppConfig;
use therapist_cell::{therapist_routes, TherapistService, TherapistState};

pub fn create_router(
    config: Arc<AppConfig>,
    roster: Arc<TherapistService>,
    assignment: Arc<AssignmentService>,
) -> Router {
    let therapist_state = Arc::new(TherapistState { config, roster });

    Router::new()
        .route("/", get(|| async { "Massage booking API is running!" }))
        .nest("/bookings", create_booking_router(assignment))
        .nest("/therapists", therapist_routes(therapist_state))
}
