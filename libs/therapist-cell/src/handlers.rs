use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::Coordinates;
use crate::services::roster::TherapistService;

/// Router state for the therapist cell.
pub struct TherapistState {
    pub config: Arc<AppConfig>,
    pub roster: Arc<TherapistService>,
}

#[derive(Debug, Deserialize)]
pub struct TherapistSearchQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub radius_km: Option<f64>,
}

/// List available therapists in range of the given coordinates, nearest first.
pub async fn search_therapists(
    State(state): State<Arc<TherapistState>>,
    Query(query): Query<TherapistSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let (lat, lon) = match (query.lat, query.lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => {
            return Err(AppError::BadRequest(
                "lat and lon query parameters are required".to_string(),
            ))
        }
    };

    let radius_km = query.radius_km.unwrap_or(state.config.search_radius_km);
    let matches = state
        .roster
        .matches_within(Coordinates { lat, lon }, radius_km);

    info!(
        "Therapist search at ({}, {}) radius {} km: {} matches",
        lat,
        lon,
        radius_km,
        matches.len()
    );

    Ok(Json(json!({
        "count": matches.len(),
        "radius_km": radius_km,
        "therapists": matches,
    })))
}
