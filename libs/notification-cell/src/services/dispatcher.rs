use async_trait::async_trait;
use tracing::{debug, info};

use shared_config::AppConfig;

use crate::error::NotificationError;
use crate::models::{BookingNotice, OutboundMessage, TherapistContact};
use crate::services::mailer::MailClient;

/// Outbound messaging seam of the assignment flow.
///
/// The state machine calls these fire-and-forget; delivery outcome never
/// blocks a booking transition.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn send_therapist_request(
        &self,
        notice: &BookingNotice,
        therapist: &TherapistContact,
        accept_url: &str,
        decline_url: &str,
    ) -> Result<(), NotificationError>;

    async fn send_customer_acknowledgment(
        &self,
        notice: &BookingNotice,
    ) -> Result<(), NotificationError>;

    async fn send_customer_confirmation(
        &self,
        notice: &BookingNotice,
        therapist: &TherapistContact,
    ) -> Result<(), NotificationError>;

    async fn send_customer_decline(&self, notice: &BookingNotice) -> Result<(), NotificationError>;

    async fn send_admin_notice(
        &self,
        notice: &BookingNotice,
        reason: &str,
    ) -> Result<(), NotificationError>;
}

/// Renders booking mails and posts them through the mail API.
pub struct MailDispatcher {
    client: MailClient,
    from: String,
    admin_email: String,
}

impl MailDispatcher {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: MailClient::new(config),
            from: config.mail_from.clone(),
            admin_email: config.admin_email.clone(),
        }
    }

    fn booking_summary(notice: &BookingNotice) -> String {
        format!(
            "{} minute {} at {} on {}. Total price ${:.2}.",
            notice.duration_minutes,
            notice.service_type,
            notice.address,
            notice.scheduled_at.format("%A %-d %B %Y, %H:%M"),
            notice.price,
        )
    }
}

#[async_trait]
impl NotificationDispatcher for MailDispatcher {
    async fn send_therapist_request(
        &self,
        notice: &BookingNotice,
        therapist: &TherapistContact,
        accept_url: &str,
        decline_url: &str,
    ) -> Result<(), NotificationError> {
        let message = OutboundMessage {
            to: therapist.email.clone(),
            subject: "New Booking Request".to_string(),
            body: format!(
                "Hi {},\n\nA new booking has come in for you:\n{}\n\n\
                 Accept: {}\nDecline: {}\n\n\
                 If we do not hear from you before the response window closes, \
                 the request moves to the next therapist.",
                therapist.name,
                Self::booking_summary(notice),
                accept_url,
                decline_url,
            ),
        };
        self.client.send(&self.from, &message).await
    }

    async fn send_customer_acknowledgment(
        &self,
        notice: &BookingNotice,
    ) -> Result<(), NotificationError> {
        let message = OutboundMessage {
            to: notice.customer_email.clone(),
            subject: "Booking Request Received".to_string(),
            body: format!(
                "Thank you for your booking, {}!\n\n{}\n\n\
                 We are contacting therapists in your area now and will confirm shortly.",
                notice.customer_name,
                Self::booking_summary(notice),
            ),
        };
        self.client.send(&self.from, &message).await
    }

    async fn send_customer_confirmation(
        &self,
        notice: &BookingNotice,
        therapist: &TherapistContact,
    ) -> Result<(), NotificationError> {
        let message = OutboundMessage {
            to: notice.customer_email.clone(),
            subject: "Booking Confirmed".to_string(),
            body: format!(
                "Good news, {} - your booking is confirmed!\n\n{}\n\n\
                 {} will contact you soon to arrange arrival details.",
                notice.customer_name,
                Self::booking_summary(notice),
                therapist.name,
            ),
        };
        self.client.send(&self.from, &message).await
    }

    async fn send_customer_decline(&self, notice: &BookingNotice) -> Result<(), NotificationError> {
        let message = OutboundMessage {
            to: notice.customer_email.clone(),
            subject: "Booking Update".to_string(),
            body: format!(
                "Hi {},\n\nUnfortunately no therapist could take your booking:\n{}\n\n\
                 Any payment hold has been released in full. \
                 You are welcome to try another date or time.",
                notice.customer_name,
                Self::booking_summary(notice),
            ),
        };
        self.client.send(&self.from, &message).await
    }

    async fn send_admin_notice(
        &self,
        notice: &BookingNotice,
        reason: &str,
    ) -> Result<(), NotificationError> {
        if self.admin_email.is_empty() {
            debug!(
                "Admin email not configured, skipping notice for booking {}",
                notice.booking_id
            );
            return Ok(());
        }

        let message = OutboundMessage {
            to: self.admin_email.clone(),
            subject: format!("Booking {} needs attention", notice.booking_id),
            body: format!(
                "Booking {} for {} ({}) ended without a therapist: {}.\n\n{}",
                notice.booking_id,
                notice.customer_name,
                notice.customer_email,
                reason,
                Self::booking_summary(notice),
            ),
        };
        self.client.send(&self.from, &message).await
    }
}

/// Dispatcher used when no mail provider is configured: logs and succeeds.
pub struct LogDispatcher;

#[async_trait]
impl NotificationDispatcher for LogDispatcher {
    async fn send_therapist_request(
        &self,
        notice: &BookingNotice,
        therapist: &TherapistContact,
        accept_url: &str,
        _decline_url: &str,
    ) -> Result<(), NotificationError> {
        info!(
            "[mail disabled] therapist request for booking {} -> {} ({}), accept at {}",
            notice.booking_id, therapist.name, therapist.email, accept_url
        );
        Ok(())
    }

    async fn send_customer_acknowledgment(
        &self,
        notice: &BookingNotice,
    ) -> Result<(), NotificationError> {
        info!(
            "[mail disabled] acknowledgment for booking {} -> {}",
            notice.booking_id, notice.customer_email
        );
        Ok(())
    }

    async fn send_customer_confirmation(
        &self,
        notice: &BookingNotice,
        therapist: &TherapistContact,
    ) -> Result<(), NotificationError> {
        info!(
            "[mail disabled] confirmation for booking {} -> {} (therapist {})",
            notice.booking_id, notice.customer_email, therapist.name
        );
        Ok(())
    }

    async fn send_customer_decline(&self, notice: &BookingNotice) -> Result<(), NotificationError> {
        info!(
            "[mail disabled] decline notice for booking {} -> {}",
            notice.booking_id, notice.customer_email
        );
        Ok(())
    }

    async fn send_admin_notice(
        &self,
        notice: &BookingNotice,
        reason: &str,
    ) -> Result<(), NotificationError> {
        info!(
            "[mail disabled] admin notice for booking {}: {}",
            notice.booking_id, reason
        );
        Ok(())
    }
}
