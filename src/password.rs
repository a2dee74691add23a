//! Password hashing.
//!
//! Thin wrapper over bcrypt with a fixed work factor. Hashing is strictly
//! one-way: there is no decryption path, only verification. Empty input is
//! rejected upstream by required-field validation, not here.

/// Fixed bcrypt cost parameter for all stored digests.
const HASH_COST: u32 = 10;

/// Produces a salted bcrypt digest of the plaintext.
pub fn hash_password(plain: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(plain, HASH_COST)
}

/// Verifies a plaintext password against a stored digest.
///
/// A malformed digest is treated as a verification failure; the error is
/// logged because it indicates store corruption rather than a bad password.
pub fn verify_password(plain: &str, digest: &str) -> bool {
    bcrypt::verify(plain, digest).unwrap_or_else(|e| {
        tracing::error!("password verify error: {:?}", e);
        false
    })
}
