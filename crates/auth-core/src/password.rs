// ============================
// crates/auth-core/src/password.rs
// ============================
//! Password hashing and verification.
use serde::Deserialize;

/// bcrypt cost factor. Fixed so hashing stays deliberately slow.
pub const HASH_COST: u32 = 12;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Password complexity requirements
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordRequirements {
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    #[serde(default = "default_true")]
    pub require_uppercase: bool,
    #[serde(default = "default_true")]
    pub require_lowercase: bool,
    #[serde(default = "default_true")]
    pub require_digit: bool,
    #[serde(default)]
    pub require_special: bool,
}

fn default_min_length() -> usize {
    MIN_PASSWORD_LENGTH
}

fn default_true() -> bool {
    true
}

impl Default for PasswordRequirements {
    fn default() -> Self {
        Self {
            min_length: MIN_PASSWORD_LENGTH,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_special: false,
        }
    }
}

/// Hash a password using bcrypt with the fixed cost factor.
/// The salt is generated per call and embedded in the output.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let hash = bcrypt::hash(plain, HASH_COST)?;
    Ok(hash)
}

/// Verify a password against a hash.
///
/// A malformed hash verifies as `false` rather than surfacing a
/// distinguishable error.
pub fn verify_password(hash: &str, plain: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}

/// Check if a password meets the complexity requirements
pub fn validate_password_strength(password: &str, requirements: &PasswordRequirements) -> bool {
    if password.len() < requirements.min_length {
        return false;
    }

    if requirements.require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
        return false;
    }

    if requirements.require_lowercase && !password.chars().any(|c| c.is_lowercase()) {
        return false;
    }

    if requirements.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }

    if requirements.require_special && !password.chars().any(|c| !c.is_alphanumeric()) {
        return false;
    }

    true
}
