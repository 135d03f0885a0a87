//! Salted pseudonymous identity for a source user.

use crate::error::ProofError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chatproof_rs_protocol::DataSource;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 over `"<SOURCE>|<user>"` keyed by `salt`, base64 encoded.
///
/// Deterministic for a given salt, and one-way.
pub fn salted_identity(source: DataSource, user: &str, salt: &str) -> Result<String, ProofError> {
    let mut mac = HmacSha256::new_from_slice(salt.as_bytes())
        .map_err(|err| ProofError::Identity(err.to_string()))?;
    mac.update(source.as_str().to_ascii_uppercase().as_bytes());
    mac.update(b"|");
    mac.update(user.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn identity_is_deterministic_and_salted() {
        let first = salted_identity(DataSource::Telegram, "1234", "salt").expect("identity");
        let again = salted_identity(DataSource::Telegram, "1234", "salt").expect("identity");
        let other_salt = salted_identity(DataSource::Telegram, "1234", "pepper").expect("identity");
        let other_user = salted_identity(DataSource::Telegram, "1235", "salt").expect("identity");

        assert_eq!(first, again);
        assert_ne!(first, other_salt);
        assert_ne!(first, other_user);
        assert!(!first.contains("1234"));
    }

    #[test]
    fn identity_is_a_base64_sha256_digest() {
        let id = salted_identity(DataSource::Telegram, "u", "s").expect("identity");
        let decoded = STANDARD.decode(&id).expect("base64");
        assert_eq!(decoded.len(), 32);
    }
}
