use std::fs;
use std::path::Path;

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::RosterError;
use crate::models::{Coordinates, Therapist, TherapistMatch};
use crate::services::distance;

/// In-memory therapist roster, loaded once at startup.
///
/// The roster is read-only reference data; bookings copy the entries they
/// need into their own candidate list.
pub struct TherapistService {
    roster: Vec<Therapist>,
}

impl TherapistService {
    pub fn new(roster: Vec<Therapist>) -> Self {
        Self { roster }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RosterError> {
        let path = path.as_ref();
        debug!("Loading therapist roster from {}", path.display());

        let raw = fs::read_to_string(path).map_err(|source| RosterError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let roster: Vec<Therapist> = serde_json::from_str(&raw)?;

        info!("Loaded {} therapists from {}", roster.len(), path.display());
        Ok(Self::new(roster))
    }

    pub fn all(&self) -> &[Therapist] {
        &self.roster
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    pub fn find(&self, id: Uuid) -> Option<&Therapist> {
        self.roster.iter().find(|t| t.id == id)
    }

    /// Available therapists within `radius_km` of `origin`, nearest first.
    pub fn matches_within(&self, origin: Coordinates, radius_km: f64) -> Vec<TherapistMatch> {
        distance::filter_and_order(origin, &self.roster, radius_km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_file_parses_roster() {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        write!(
            file,
            r#"[
                {{
                    "id": "6b9f62f2-02f9-4a14-9e8b-2f6d6fbb6d51",
                    "name": "Anna Nguyen",
                    "email": "anna@example.com",
                    "location": {{"lat": -37.80, "lon": 144.96}},
                    "available": true,
                    "hourly_rate": 110.0
                }}
            ]"#
        )
        .expect("Failed to write roster fixture");

        let service = TherapistService::from_file(file.path()).expect("Roster should parse");
        assert_eq!(service.len(), 1);
        assert_eq!(service.all()[0].name, "Anna Nguyen");
    }

    #[test]
    fn test_from_file_missing_path() {
        let result = TherapistService::from_file("does/not/exist.json");
        assert!(matches!(result, Err(RosterError::Io { .. })));
    }

    #[test]
    fn test_from_file_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        write!(file, "not json").expect("Failed to write fixture");

        let result = TherapistService::from_file(file.path());
        assert!(matches!(result, Err(RosterError::Parse(_))));
    }

    #[test]
    fn test_find_by_id() {
        let therapist = Therapist {
            id: Uuid::new_v4(),
            name: "Ben Carter".to_string(),
            email: "ben@example.com".to_string(),
            location: Coordinates {
                lat: -37.81,
                lon: 144.96,
            },
            available: true,
            hourly_rate: 95.0,
        };
        let id = therapist.id;
        let service = TherapistService::new(vec![therapist]);

        assert!(service.find(id).is_some());
        assert!(service.find(Uuid::new_v4()).is_none());
    }
}
