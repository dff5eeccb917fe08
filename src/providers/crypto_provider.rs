use hmac::{Hmac, Mac};
use rand::seq::SliceRandom;
use rand::Rng;
use sha2::Sha256;

use crate::errors::InternalError;

type HmacSha256 = Hmac<Sha256>;

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Cryptographic operations provider
///
/// HMAC-SHA256 fingerprints for refresh tokens and secure password generation
/// for administrator accounts created from the CLI.
pub struct CryptoProvider;

impl CryptoProvider {
    pub fn new() -> Self {
        Self
    }

    /// Compute HMAC-SHA256 of a token and return it as a hexadecimal string
    ///
    /// # Arguments
    /// * `key` - The secret key for HMAC computation
    /// * `token` - The token to fingerprint
    pub fn hmac_sha256_token(&self, key: &str, token: &str) -> Result<String, InternalError> {
        let mut mac = HmacSha256::new_from_slice(key.as_bytes())
            .map_err(|e| InternalError::crypto("hmac_init", e.to_string()))?;
        mac.update(token.as_bytes());
        Ok(format!("{:x}", mac.finalize().into_bytes()))
    }

    /// Generate a cryptographically secure random password
    ///
    /// 20 characters with at least one uppercase letter, lowercase letter, digit
    /// and symbol, so the result passes the strictest default password policy.
    pub fn generate_secure_password(&self) -> String {
        const PASSWORD_LENGTH: usize = 20;
        let classes = [UPPERCASE, LOWERCASE, DIGITS, SYMBOLS];
        let all: Vec<u8> = classes.concat();

        let mut rng = rand::rng();
        let mut chars: Vec<u8> = classes
            .iter()
            .map(|class| class[rng.random_range(0..class.len())])
            .collect();
        while chars.len() < PASSWORD_LENGTH {
            chars.push(all[rng.random_range(0..all.len())]);
        }
        chars.shuffle(&mut rng);

        chars.into_iter().map(char::from).collect()
    }
}

impl Default for CryptoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hmac_sha256_token_consistency() {
        let crypto = CryptoProvider::new();

        let hash1 = crypto.hmac_sha256_token("test-secret-key", "test-token-12345").unwrap();
        let hash2 = crypto.hmac_sha256_token("test-secret-key", "test-token-12345").unwrap();

        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hmac_sha256_token_different_keys_produce_different_hashes() {
        let crypto = CryptoProvider::new();

        let hash1 = crypto.hmac_sha256_token("key1", "test-token-12345").unwrap();
        let hash2 = crypto.hmac_sha256_token("key2", "test-token-12345").unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_hmac_sha256_token_hex_format() {
        let hash = CryptoProvider::new().hmac_sha256_token("key", "token").unwrap();

        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        // 32 bytes = 64 hex characters
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn test_generate_secure_password_covers_every_character_class() {
        let crypto = CryptoProvider::new();

        for _ in 0..50 {
            let password = crypto.generate_secure_password();
            assert_eq!(password.len(), 20);
            assert!(password.chars().any(|c| c.is_ascii_uppercase()));
            assert!(password.chars().any(|c| c.is_ascii_lowercase()));
            assert!(password.chars().any(|c| c.is_ascii_digit()));
            assert!(password.bytes().any(|b| SYMBOLS.contains(&b)));
        }
    }

    #[test]
    fn test_generate_secure_password_uniqueness() {
        let crypto = CryptoProvider::new();
        assert_ne!(crypto.generate_secure_password(), crypto.generate_secure_password());
    }
}
