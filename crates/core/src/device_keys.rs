//! Device API key generation and hashing.
//!
//! Bedside units authenticate with a per-device key sent in the `x-api-key`
//! header. Only the SHA-256 hex digest is stored; the plaintext is returned
//! once at registration (or regeneration) for flashing onto the unit.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of the generated key string (alphanumeric characters).
pub const KEY_LENGTH: usize = 48;

/// Leading characters kept as a human-visible prefix for identification.
pub const KEY_PREFIX_LENGTH: usize = 8;

/// The result of generating a new device key.
pub struct GeneratedDeviceKey {
    /// The plaintext key (shown exactly once, never stored).
    pub plaintext: String,
    /// The first [`KEY_PREFIX_LENGTH`] characters, for display in listings.
    pub prefix: String,
    /// SHA-256 hex digest of the plaintext (stored in the database).
    pub hash: String,
}

/// Generate a new random device key.
pub fn generate_device_key() -> GeneratedDeviceKey {
    let key: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(KEY_LENGTH)
        .map(char::from)
        .collect();

    let prefix = key[..KEY_PREFIX_LENGTH].to_string();
    let hash = hash_device_key(&key);

    GeneratedDeviceKey {
        plaintext: key,
        prefix,
        hash,
    }
}

/// Compute the SHA-256 hex digest of a device key.
///
/// Used at creation (to store the hash) and at authentication (to look the
/// device up by the hash of the presented key).
pub fn hash_device_key(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_key_has_expected_shape() {
        let key = generate_device_key();
        assert_eq!(key.plaintext.len(), KEY_LENGTH);
        assert!(key.plaintext.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(&key.plaintext[..KEY_PREFIX_LENGTH], key.prefix);
    }

    #[test]
    fn hash_is_stable_and_hex() {
        let key = generate_device_key();
        assert_eq!(key.hash, hash_device_key(&key.plaintext));
        assert_eq!(key.hash.len(), 64);
        assert!(key.hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn distinct_keys_hash_differently() {
        let a = generate_device_key();
        let b = generate_device_key();
        assert_ne!(a.plaintext, b.plaintext);
        assert_ne!(a.hash, b.hash);
    }
}
