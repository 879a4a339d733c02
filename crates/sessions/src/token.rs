//! Opaque session token generation.
//!
//! Tokens come from the operating system CSPRNG. There is no fallback
//! source: if the OS cannot supply entropy the call fails with
//! `Error::Entropy` and the caller gives up.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use tc_domain::error::{Error, Result};

/// Entropy drawn per token when the caller does not say otherwise.
pub const DEFAULT_TOKEN_BYTES: usize = 32;

/// Optional one-way digest applied to normalize token length and format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenDigest {
    Sha256,
}

/// Generate an opaque token from `byte_length` bytes of OS entropy.
///
/// The raw bytes are URL-safe base64 encoded. With `TokenDigest::Sha256`
/// the encoded string is hashed and the hex digest returned instead, giving
/// a fixed 64-character token regardless of `byte_length`.
pub fn generate(byte_length: usize, digest: Option<TokenDigest>) -> Result<String> {
    let mut raw = vec![0u8; byte_length];
    OsRng
        .try_fill_bytes(&mut raw)
        .map_err(|err| Error::Entropy(err.to_string()))?;

    let encoded = URL_SAFE.encode(&raw);
    Ok(match digest {
        Some(TokenDigest::Sha256) => hex::encode(Sha256::digest(encoded.as_bytes())),
        None => encoded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn digested_tokens_are_64_hex_chars() {
        let token = generate(DEFAULT_TOKEN_BYTES, Some(TokenDigest::Sha256)).unwrap();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn plain_tokens_are_url_safe() {
        let token = generate(DEFAULT_TOKEN_BYTES, None).unwrap();
        // 32 bytes of padded base64.
        assert_eq!(token.len(), 44);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '=')));
    }

    #[test]
    fn tokens_are_distinct() {
        let mut seen = HashSet::new();
        for _ in 0..256 {
            assert!(seen.insert(generate(DEFAULT_TOKEN_BYTES, Some(TokenDigest::Sha256)).unwrap()));
        }
    }

    #[test]
    fn custom_byte_length_changes_plain_output() {
        let token = generate(16, None).unwrap();
        // 16 bytes of padded base64.
        assert_eq!(token.len(), 24);
    }
}
