// ============================
// crates/auth-core/src/config.rs
// ============================
//! Configuration management.
//!
//! Signing secrets and policy knobs are loaded once at startup and passed in
//! explicitly; business logic never reads the environment. A missing secret
//! fails the load, not the first token issuance.
use anyhow::{ensure, Context, Result};
use chrono::Duration;
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;

use crate::lockout::{LockoutPolicy, DEFAULT_LOCKOUT_WINDOW_SECS, DEFAULT_MAX_ATTEMPTS};
use crate::password::PasswordRequirements;
use crate::token::TokenCodec;

/// Access token lifetime: 7 days. Unusually long for an access token, but it
/// is the established policy default; tune via `access_token_ttl_secs`.
const DEFAULT_ACCESS_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Refresh token lifetime: 30 days.
const DEFAULT_REFRESH_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Password reset token lifetime: 1 hour.
const DEFAULT_RESET_TTL_SECS: i64 = 60 * 60;

/// Authentication settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Secret for signing access (and reset) tokens. Required.
    pub access_token_secret: String,
    /// Secret for signing refresh tokens. Required, independent of the
    /// access secret.
    pub refresh_token_secret: String,
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_secs: i64,
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_secs: i64,
    #[serde(default = "default_reset_ttl")]
    pub reset_token_ttl_secs: i64,
    #[serde(default = "default_max_attempts")]
    pub max_login_attempts: u32,
    #[serde(default = "default_lockout_window")]
    pub lockout_window_secs: i64,
    /// Password requirements
    #[serde(default)]
    pub password_requirements: PasswordRequirements,
}

fn default_access_ttl() -> i64 {
    DEFAULT_ACCESS_TTL_SECS
}

fn default_refresh_ttl() -> i64 {
    DEFAULT_REFRESH_TTL_SECS
}

fn default_reset_ttl() -> i64 {
    DEFAULT_RESET_TTL_SECS
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_lockout_window() -> i64 {
    DEFAULT_LOCKOUT_WINDOW_SECS
}

impl Settings {
    /// Load settings from `auth.toml` overlaid with `TRIPLOG_`-prefixed
    /// environment variables.
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("auth.toml"))
            .merge(Env::prefixed("TRIPLOG_"));
        Self::from_figment(figment)
    }

    /// Load settings from an explicit figment, for callers composing their
    /// own providers (and for tests that must not read ambient state).
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let settings: Settings = figment
            .extract()
            .context("failed to load authentication settings")?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            !self.access_token_secret.is_empty(),
            "access_token_secret must be set (TRIPLOG_ACCESS_TOKEN_SECRET)"
        );
        ensure!(
            !self.refresh_token_secret.is_empty(),
            "refresh_token_secret must be set (TRIPLOG_REFRESH_TOKEN_SECRET)"
        );
        ensure!(self.max_login_attempts > 0, "max_login_attempts must be > 0");
        Ok(())
    }

    /// Lockout policy derived from these settings.
    pub fn lockout_policy(&self) -> LockoutPolicy {
        LockoutPolicy::new(
            self.max_login_attempts,
            Duration::seconds(self.lockout_window_secs),
        )
    }

    /// Build the token codec. Fails on an empty secret.
    pub fn token_codec(&self) -> Result<TokenCodec, crate::error::AuthError> {
        TokenCodec::new(
            &self.access_token_secret,
            &self.refresh_token_secret,
            Duration::seconds(self.access_token_ttl_secs),
            Duration::seconds(self.refresh_token_ttl_secs),
            Duration::seconds(self.reset_token_ttl_secs),
        )
    }
}
