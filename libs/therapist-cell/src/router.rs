use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers::{search_therapists, TherapistState};

pub fn therapist_routes(state: Arc<TherapistState>) -> Router {
    Router::new()
        .route("/", get(search_therapists))
        .with_state(state)
}
