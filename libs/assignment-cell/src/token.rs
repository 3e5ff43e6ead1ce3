use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Capability token authorizing exactly one therapist to answer exactly one
/// booking. Embedded in the accept/decline links mailed to the therapist.
pub fn generate(secret: &str, booking_id: Uuid, therapist_id: Uuid) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(signing_input(booking_id, therapist_id).as_bytes());
    URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
}

/// Constant-time verification; any failure is a plain rejection.
pub fn verify(secret: &str, booking_id: Uuid, therapist_id: Uuid, token: &str) -> bool {
    let signature = match URL_SAFE_NO_PAD.decode(token) {
        Ok(sig) => sig,
        Err(e) => {
            debug!("Failed to decode response token: {}", e);
            return false;
        }
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return false,
    };
    mac.update(signing_input(booking_id, therapist_id).as_bytes());
    mac.verify_slice(&signature).is_ok()
}

fn signing_input(booking_id: Uuid, therapist_id: Uuid) -> String {
    format!("{}:{}", booking_id, therapist_id)
}
