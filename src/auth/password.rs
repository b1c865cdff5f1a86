// SPDX-License-Identifier: AGPL-3.0-or-later

//! Password hashing.
//!
//! bcrypt with the default cost factor (12). Hashing is intentionally
//! expensive; callers on the async runtime should wrap these in
//! `tokio::task::spawn_blocking`.

use bcrypt::{hash, verify, DEFAULT_COST};

use super::AuthError;

/// Hash a plaintext password. The plaintext is never logged or returned.
pub fn hash_password(plaintext: &str) -> Result<String, AuthError> {
    hash(plaintext, DEFAULT_COST).map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
}

/// Verify a plaintext against a stored hash.
///
/// A structurally invalid hash counts as "not matched" rather than an error;
/// a credential check must never crash the request.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> bool {
    verify(plaintext, stored_hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_never_equals_plaintext() {
        let hashed = hash_password("Abcd1234").unwrap();
        assert_ne!(hashed, "Abcd1234");
    }

    #[test]
    fn hashes_are_salted_but_both_verify() {
        let first = hash_password("Abcd1234").unwrap();
        let second = hash_password("Abcd1234").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("Abcd1234", &first));
        assert!(verify_password("Abcd1234", &second));
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let hashed = hash_password("Abcd1234").unwrap();
        assert!(!verify_password("Abcd1235", &hashed));
    }

    #[test]
    fn malformed_hash_is_not_matched() {
        assert!(!verify_password("Abcd1234", "not-a-bcrypt-hash"));
    }
}
