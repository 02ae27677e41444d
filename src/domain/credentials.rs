use anyhow::anyhow;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use std::fmt;

/// The salted one-way encoding of a password, in PHC string format. Only this value is ever
/// stored; the raw secret never leaves the request that carried it.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedPassword(String);

impl EncodedPassword {
    /// Wraps an encoded password that was previously produced by [PasswordEncoder::encode]
    /// and read back from storage
    pub fn from_stored(encoded: String) -> Self {
        Self(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EncodedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncodedPassword(<redacted>)")
    }
}

/// Encodes and verifies passwords with Argon2id. Holds no state, so one instance can be shared
/// freely across concurrent requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct PasswordEncoder;

impl PasswordEncoder {
    /// Hashes a raw password with a freshly generated salt. Expensive on purpose, so callers
    /// should run every cheaper rejection check first.
    pub fn encode(&self, raw_password: &str) -> Result<EncodedPassword, anyhow::Error> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(raw_password.as_bytes(), &salt)
            .map(|hash| EncodedPassword(hash.to_string()))
            .map_err(|err| anyhow!("failed to hash password: {err}"))
    }

    /// Checks whether `raw_password` is the secret that produced `encoded`.
    /// The raw value always comes first; the encoded value is a distinct type so the two
    /// can't be swapped by accident.
    pub fn matches(&self, raw_password: &str, encoded: &EncodedPassword) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(encoded.as_str()) else {
            return false;
        };

        Argon2::default()
            .verify_password(raw_password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}
