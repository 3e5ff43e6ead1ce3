use std::env;
use std::time::Duration;
use tracing::warn;

const DEFAULT_RESPONSE_DEADLINE_SECS: u64 = 120;
const DEFAULT_SEARCH_RADIUS_KM: f64 = 10.0;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub public_base_url: String,
    pub response_token_secret: String,
    pub response_deadline_secs: u64,
    pub search_radius_km: f64,
    pub roster_path: String,
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub mail_from: String,
    pub admin_email: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("PUBLIC_BASE_URL not set, using http://localhost:3000");
                    "http://localhost:3000".to_string()
                }),
            response_token_secret: env::var("RESPONSE_TOKEN_SECRET")
                .unwrap_or_else(|_| {
                    warn!("RESPONSE_TOKEN_SECRET not set, response links will not survive restarts");
                    "insecure-development-secret".to_string()
                }),
            response_deadline_secs: env::var("RESPONSE_DEADLINE_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RESPONSE_DEADLINE_SECS),
            search_radius_km: env::var("SEARCH_RADIUS_KM")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SEARCH_RADIUS_KM),
            roster_path: env::var("ROSTER_PATH")
                .unwrap_or_else(|_| "data/therapists.json".to_string()),
            mail_api_url: env::var("MAIL_API_URL")
                .unwrap_or_else(|_| {
                    warn!("MAIL_API_URL not set, outbound mail disabled");
                    String::new()
                }),
            mail_api_key: env::var("MAIL_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("MAIL_API_KEY not set, outbound mail disabled");
                    String::new()
                }),
            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "bookings@rejuvenators.example".to_string()),
            admin_email: env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| {
                    warn!("ADMIN_EMAIL not set, admin notices disabled");
                    String::new()
                }),
        };

        if !config.is_mail_configured() {
            warn!("Mail provider not fully configured - notifications will be logged only");
        }

        config
    }

    pub fn is_mail_configured(&self) -> bool {
        !self.mail_api_url.is_empty() && !self.mail_api_key.is_empty()
    }

    pub fn response_window(&self) -> Duration {
        Duration::from_secs(self.response_deadline_secs)
    }
}
