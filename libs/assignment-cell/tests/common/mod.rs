#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;
use uuid::Uuid;

use assignment_cell::{AssignmentService, CreateBookingRequest, ParkingOption};
use notification_cell::{
    BookingNotice, NotificationDispatcher, NotificationError, TherapistContact,
};
use shared_config::AppConfig;
use therapist_cell::{Coordinates, Therapist, TherapistService};

// Melbourne CBD
pub const ORIGIN: Coordinates = Coordinates {
    lat: -37.8136,
    lon: 144.9631,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    TherapistRequest { to: String, accept_url: String },
    Acknowledgment { to: String },
    Confirmation { to: String, therapist: String },
    Decline { to: String },
    AdminNotice { reason: String },
}

/// Test dispatcher that records every send, optionally failing the
/// therapist-request sends to exercise delivery-failure semantics.
pub struct RecordingDispatcher {
    messages: Mutex<Vec<Sent>>,
    fail_therapist_requests: bool,
}

impl RecordingDispatcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            messages: Mutex::new(Vec::new()),
            fail_therapist_requests: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            messages: Mutex::new(Vec::new()),
            fail_therapist_requests: true,
        })
    }

    pub async fn messages(&self) -> Vec<Sent> {
        self.messages.lock().await.clone()
    }

    /// Emails of contacted therapists, in dispatch order.
    pub async fn therapist_requests(&self) -> Vec<String> {
        self.messages
            .lock()
            .await
            .iter()
            .filter_map(|m| match m {
                Sent::TherapistRequest { to, .. } => Some(to.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn send_therapist_request(
        &self,
        _notice: &BookingNotice,
        therapist: &TherapistContact,
        accept_url: &str,
        _decline_url: &str,
    ) -> Result<(), NotificationError> {
        self.messages.lock().await.push(Sent::TherapistRequest {
            to: therapist.email.clone(),
            accept_url: accept_url.to_string(),
        });
        if self.fail_therapist_requests {
            return Err(NotificationError::Provider {
                status: 503,
                message: "provider unavailable".to_string(),
            });
        }
        Ok(())
    }

    async fn send_customer_acknowledgment(
        &self,
        notice: &BookingNotice,
    ) -> Result<(), NotificationError> {
        self.messages.lock().await.push(Sent::Acknowledgment {
            to: notice.customer_email.clone(),
        });
        Ok(())
    }

    async fn send_customer_confirmation(
        &self,
        notice: &BookingNotice,
        therapist: &TherapistContact,
    ) -> Result<(), NotificationError> {
        self.messages.lock().await.push(Sent::Confirmation {
            to: notice.customer_email.clone(),
            therapist: therapist.name.clone(),
        });
        Ok(())
    }

    async fn send_customer_decline(&self, notice: &BookingNotice) -> Result<(), NotificationError> {
        self.messages.lock().await.push(Sent::Decline {
            to: notice.customer_email.clone(),
        });
        Ok(())
    }

    async fn send_admin_notice(
        &self,
        _notice: &BookingNotice,
        reason: &str,
    ) -> Result<(), NotificationError> {
        self.messages.lock().await.push(Sent::AdminNotice {
            reason: reason.to_string(),
        });
        Ok(())
    }
}

pub fn test_config(deadline_secs: u64) -> Arc<AppConfig> {
    Arc::new(AppConfig {
        public_base_url: "http://localhost:3000".to_string(),
        response_token_secret: "test-secret-key-must-be-long-enough".to_string(),
        response_deadline_secs: deadline_secs,
        search_radius_km: 10.0,
        roster_path: "unused".to_string(),
        mail_api_url: String::new(),
        mail_api_key: String::new(),
        mail_from: "bookings@rejuvenators.example".to_string(),
        admin_email: "ops@rejuvenators.example".to_string(),
    })
}

pub fn therapist(name: &str, km_north: f64, available: bool) -> Therapist {
    Therapist {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        location: Coordinates {
            // one degree of latitude is ~111 km
            lat: ORIGIN.lat + km_north / 111.0,
            lon: ORIGIN.lon,
        },
        available,
        hourly_rate: 100.0,
    }
}

/// Anna (~2 km) and Ben (~5 km) available, Clara (~1 km) unavailable.
pub fn test_roster() -> Vec<Therapist> {
    vec![
        therapist("Anna", 2.0, true),
        therapist("Ben", 5.0, true),
        therapist("Clara", 1.0, false),
    ]
}

pub fn make_service(
    roster: Vec<Therapist>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    deadline_secs: u64,
) -> AssignmentService {
    AssignmentService::new(
        test_config(deadline_secs),
        Arc::new(TherapistService::new(roster)),
        dispatcher,
    )
}

pub fn booking_request(
    coordinates: Option<Coordinates>,
    selected_therapist_id: Option<Uuid>,
) -> CreateBookingRequest {
    CreateBookingRequest {
        customer_name: "Dana Wu".to_string(),
        customer_email: "dana@example.com".to_string(),
        customer_phone: "+61 400 000 000".to_string(),
        address: "12 Collins St, Melbourne".to_string(),
        coordinates,
        service_type: "Relaxation massage".to_string(),
        duration_minutes: 60,
        // Wednesday mid-morning: no weekend or after-hours loadings
        scheduled_at: NaiveDate::from_ymd_opt(2026, 8, 12)
            .expect("valid date")
            .and_hms_opt(10, 0, 0)
            .expect("valid time"),
        parking: ParkingOption::Free,
        selected_therapist_id,
    }
}
