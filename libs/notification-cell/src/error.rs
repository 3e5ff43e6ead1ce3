use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Mail provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    #[error("Mail transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
