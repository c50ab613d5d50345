//! Refresh-token entity and fingerprinting.

pub mod model;

pub use model::RefreshTokenRecord;

use sha2::{Digest, Sha256};

/// Computes the SHA-256 hex fingerprint of a raw token string.
///
/// Stores persist only this fingerprint; the raw token value exists
/// solely in the client's hands.
pub fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_and_hex() {
        let a = hash_token("some-token");
        let b = hash_token("some-token");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn distinct_tokens_have_distinct_hashes() {
        assert_ne!(hash_token("token-a"), hash_token("token-b"));
    }
}
