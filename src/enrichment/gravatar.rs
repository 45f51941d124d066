use sha2::{Digest, Sha256};

/// Hex digest of the canonicalized email (trimmed, lowercased), as the
/// avatar service expects it.
#[must_use]
pub fn email_digest(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.trim().to_lowercase().as_bytes());
    hex::encode(hasher.finalize())
}

/// Derive the avatar image URL for an email. Pure, no network.
#[must_use]
pub fn derive_image_link(base_url: &str, email: &str) -> String {
    format!(
        "{}/avatar/{}",
        base_url.trim_end_matches('/'),
        email_digest(email)
    )
}

/// Profile URL probed to check that the email has an avatar account.
#[must_use]
pub fn profile_url(base_url: &str, email: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), email_digest(email))
}
