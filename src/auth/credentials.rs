use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::error::Error;

/// Hashes a password with argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut rand::thread_rng());

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(Error::credential_error)?;

    Ok(hash.to_string())
}

/// Checks a password against a stored hash. A mismatch is `false`, never an
/// error; an unparseable hash also counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[test]
fn hashed_passwords_verify() {
    let hash = hash_password("test123").unwrap();

    assert!(verify_password("test123", &hash));
    assert!(!verify_password("test124", &hash));
}

#[test]
fn hashes_are_salted() {
    let first = hash_password("test123").unwrap();
    let second = hash_password("test123").unwrap();

    assert_ne!(first, second);
}

#[test]
fn hashes_do_not_contain_the_password() {
    let hash = hash_password("test123").unwrap();

    assert!(!hash.contains("test123"));
}

#[test]
fn garbage_hashes_never_verify() {
    assert!(!verify_password("test123", "not-a-phc-string"));
    assert!(!verify_password("test123", ""));
}
