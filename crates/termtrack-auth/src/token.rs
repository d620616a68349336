//! Opaque session token generation and hashing.
//!
//! Tokens are random UUIDs handed to the client once; only their
//! SHA-256 hash is stored server-side.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Generate a new opaque session token.
pub fn generate_session_token() -> String {
    Uuid::new_v4().to_string()
}

/// SHA-256 hash of a raw session token, hex-encoded.
///
/// This is the value stored in the database as `session.token_hash`.
pub fn hash_session_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique() {
        assert_ne!(generate_session_token(), generate_session_token());
    }

    #[test]
    fn tokens_are_uuids() {
        let token = generate_session_token();
        assert!(Uuid::parse_str(&token).is_ok());
    }

    #[test]
    fn token_hash_is_deterministic() {
        let raw = "some-session-token";
        assert_eq!(hash_session_token(raw), hash_session_token(raw));
    }

    #[test]
    fn different_tokens_different_hashes() {
        let h1 = hash_session_token("token-a");
        let h2 = hash_session_token("token-b");
        assert_ne!(h1, h2);
    }
}
