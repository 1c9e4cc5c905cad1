// ============================
// crates/auth-core/src/lib.rs
// ============================
//! Authentication and session core for the TripLog backend.
//!
//! Credential verification, brute-force lockout and the access/refresh token
//! lifecycle. Persistence ([`UserRecordStore`]) and email delivery
//! ([`Notifier`]) are injected collaborators; HTTP transport and UI live
//! entirely outside this crate.

pub mod config;
pub mod error;
pub mod lockout;
pub mod notify;
pub mod password;
pub mod service;
pub mod store;
pub mod token;

pub use config::Settings;
pub use error::AuthError;
pub use lockout::LockoutPolicy;
pub use notify::{AccountSeeder, Notifier};
pub use password::{
    hash_password, validate_password_strength, verify_password, PasswordRequirements,
};
pub use service::{AuthService, AuthSession, AuthTokens};
pub use store::{AccountStatus, NewUser, PublicUser, Role, UserRecord, UserRecordStore};
pub use token::{AccessClaims, Claims, TokenCodec, TokenKind};
