//! Credential storage. Passwords are kept only as salted Argon2id PHC
//! strings; verification goes through the argon2 verifier, which compares
//! in constant time.

use std::sync::LazyLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

pub const MIN_LENGTH: usize = 6;

/// Hashed with the live parameters, so checking against it costs the same
/// as checking a real account.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash("ticketdesk-placeholder-credential").ok());

fn hasher() -> Result<Argon2<'static>, String> {
    let params = Params::new(19 * 1024, 2, 1, None).map_err(|e| format!("Invalid params: {e}"))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

pub fn hash(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| format!("Hashing failed: {e}"))
}

/// A stored hash that fails to parse never matches.
pub fn matches(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        tracing::warn!("Stored credential is not a valid password hash");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Run a full verification and discard the result. Used when no account
/// matches, so lookups of unknown emails take as long as wrong passwords.
pub fn verify_placeholder(password: &str) {
    if let Some(stored) = DUMMY_HASH.as_deref() {
        let _ = matches(password, stored);
    }
}

pub fn check_strength(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_LENGTH {
        return Err(format!("Password must be at least {MIN_LENGTH} characters"));
    }
    Ok(())
}
