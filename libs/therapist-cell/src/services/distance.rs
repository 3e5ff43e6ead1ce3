use crate::models::{Coordinates, Therapist, TherapistMatch};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points, in kilometers.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = lat_b - lat_a;
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Retain available therapists within `radius_km` of `origin`, nearest first.
///
/// The sort is stable: therapists at equal distance keep their roster order.
pub fn filter_and_order(
    origin: Coordinates,
    roster: &[Therapist],
    radius_km: f64,
) -> Vec<TherapistMatch> {
    let mut matches: Vec<TherapistMatch> = roster
        .iter()
        .filter(|t| t.available)
        .map(|t| TherapistMatch {
            therapist: t.clone(),
            distance_km: haversine_km(origin, t.location),
        })
        .filter(|m| m.distance_km <= radius_km)
        .collect();

    matches.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    matches
}
