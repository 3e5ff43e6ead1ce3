use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Therapist {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub location: Coordinates,
    pub available: bool,
    pub hourly_rate: f64,
}

/// A roster entry paired with its distance from a customer's address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TherapistMatch {
    pub therapist: Therapist,
    pub distance_km: f64,
}
