// crates/auth-core/src/error.rs

//! Central error type for the authentication core.
use thiserror::Error;

/// Authentication error taxonomy.
///
/// `InvalidCredentials` deliberately covers both "no such email" and "wrong
/// password" so callers cannot be used as a user-enumeration oracle.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account temporarily locked after too many failed login attempts")]
    AccountLocked,

    #[error("account is inactive or suspended")]
    AccountInactive,

    #[error("email is already in use")]
    EmailInUse,

    #[error("password does not meet the strength requirements")]
    WeakPassword,

    #[error("user not found")]
    UserNotFound,

    #[error("invalid token")]
    InvalidToken,

    #[error("token has expired")]
    TokenExpired,

    #[error("wrong token type")]
    WrongTokenType,

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "AUTH_001",
            AuthError::AccountLocked => "AUTH_002",
            AuthError::AccountInactive => "AUTH_003",
            AuthError::EmailInUse => "REG_001",
            AuthError::WeakPassword => "PWD_001",
            AuthError::UserNotFound => "USER_001",
            AuthError::InvalidToken => "TOKEN_001",
            AuthError::TokenExpired => "TOKEN_002",
            AuthError::WrongTokenType => "TOKEN_003",
            AuthError::Configuration(_) => "CFG_001",
            AuthError::Internal(_) => "INT_001",
        }
    }

    /// Get a sanitized message suitable for returning to clients.
    ///
    /// Token failures collapse into one generic message; the lockout message
    /// stays distinct because the lockout itself is the security control.
    pub fn sanitized_message(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "Invalid email or password",
            AuthError::AccountLocked => {
                "Account temporarily locked due to too many failed login attempts"
            },
            AuthError::AccountInactive => "Account is inactive or suspended",
            AuthError::EmailInUse => "Email is already in use",
            AuthError::WeakPassword => "Password does not meet the strength requirements",
            AuthError::UserNotFound => "User not found",
            AuthError::InvalidToken
            | AuthError::TokenExpired
            | AuthError::WrongTokenType => "Invalid or expired token",
            AuthError::Configuration(_) | AuthError::Internal(_) => {
                "An internal server error occurred"
            },
        }
    }
}
