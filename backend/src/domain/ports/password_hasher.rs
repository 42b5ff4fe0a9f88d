//! Port abstraction for password hashing.
//!
//! Hashing is CPU work with no await points, so the port is synchronous.
//! Keeping it behind a trait lets service tests swap in a transparent stub
//! instead of paying for a real key derivation per test case.

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing a new password failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// A stored hash could not be parsed for verification.
        Verify { message: String } => "password verification failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Derive a self-describing hash for a new password.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Check a candidate password against a stored hash.
    ///
    /// Returns `false` for a clean mismatch; errors are reserved for hashes
    /// that cannot be parsed at all.
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHashError>;
}
