//! Security Utilities
//!
//! Password hashing and confirmation-code generation.

use bcrypt::{hash, verify, DEFAULT_COST};
use rand::{rngs::OsRng, RngCore};

/// Default bcrypt cost for password hashing
pub const DEFAULT_BCRYPT_COST: u32 = DEFAULT_COST;

/// Length of a confirmation code in hex characters
pub const CONFIRMATION_CODE_LENGTH: usize = 32;

/// Generate a one-time confirmation code for account activation
///
/// Draws 16 bytes from the operating system CSPRNG and hex-encodes them,
/// yielding exactly 32 lowercase hex characters. The code gates account
/// activation, so a general-purpose PRNG is not acceptable here.
pub fn generate_confirmation_code() -> String {
    let mut bytes = [0u8; CONFIRMATION_CODE_LENGTH / 2];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash_password_with_cost(password, DEFAULT_BCRYPT_COST)
}

/// Hash a password with custom bcrypt cost
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password, cost)
}

/// Verify a password against its hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}

/// Timing-safe string comparison to prevent timing attacks
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (byte_a, byte_b) in a.bytes().zip(b.bytes()) {
        result |= byte_a ^ byte_b;
    }
    result == 0
}
