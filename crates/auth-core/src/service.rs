// ============================
// crates/auth-core/src/service.rs
// ============================
//! Orchestration of credential checks, lockout and token issuance.
use std::sync::Arc;

use chrono::Utc;
use metrics::counter;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::AuthError;
use crate::lockout::LockoutPolicy;
use crate::notify::{AccountSeeder, Notifier};
use crate::password::{
    hash_password, validate_password_strength, verify_password, PasswordRequirements,
};
use crate::store::{AccountStatus, NewUser, PublicUser, Role, UserRecord, UserRecordStore};
use crate::token::{AccessClaims, TokenCodec};

/// A freshly issued access/refresh pair.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Result of a successful register or login.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicUser,
}

/// The authentication service.
///
/// Holds its collaborators explicitly; nothing is read from ambient
/// globals. The store and the optional side-effect hooks are trait objects
/// so tests can inject doubles.
pub struct AuthService {
    store: Arc<dyn UserRecordStore>,
    codec: TokenCodec,
    lockout: LockoutPolicy,
    password_requirements: PasswordRequirements,
    notifier: Option<Arc<dyn Notifier>>,
    seeder: Option<Arc<dyn AccountSeeder>>,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn UserRecordStore>,
        codec: TokenCodec,
        lockout: LockoutPolicy,
        password_requirements: PasswordRequirements,
    ) -> Self {
        Self {
            store,
            codec,
            lockout,
            password_requirements,
            notifier: None,
            seeder: None,
        }
    }

    /// Attach an email collaborator. Absent, welcome/reset mail is skipped.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Attach a default-data seeding hook for new accounts.
    pub fn with_seeder(mut self, seeder: Arc<dyn AccountSeeder>) -> Self {
        self.seeder = Some(seeder);
        self
    }

    /// Register a new account and log it straight in.
    ///
    /// Seeding and the welcome email are best-effort: their failure is
    /// logged and never fails the registration.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let email = normalize_email(email);

        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailInUse);
        }

        self.check_password_strength(password)?;
        let password_hash = hash_password(password)?;

        let user = self
            .store
            .create(NewUser {
                name: name.to_string(),
                email,
                password_hash,
                role: Role::User,
                status: AccountStatus::Active,
            })
            .await?;

        counter!("auth.register").increment(1);
        debug!(user_id = %user.id, "account registered");

        if let Some(seeder) = &self.seeder {
            if let Err(err) = seeder.seed_defaults(user.id).await {
                warn!(user_id = %user.id, error = %err, "failed to seed default entries");
            }
        }
        if let Some(notifier) = &self.notifier {
            if let Err(err) = notifier.send_welcome(&user.email, &user.name).await {
                warn!(user_id = %user.id, error = %err, "failed to send welcome email");
            }
        }

        self.session_for(&user)
    }

    /// Authenticate with email and password.
    ///
    /// The lockout check runs before the status check, which runs before the
    /// password comparison, so a locked account never costs a hash and an
    /// unknown email is indistinguishable from a wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let email = normalize_email(email);

        let Some(user) = self.store.find_by_email(&email).await? else {
            counter!("auth.login.failure").increment(1);
            return Err(AuthError::InvalidCredentials);
        };

        let now = Utc::now();
        if self
            .lockout
            .is_locked(user.failed_login_count, user.last_failed_login_at, now)
        {
            counter!("auth.login.locked").increment(1);
            warn!(user_id = %user.id, "login refused, account locked");
            return Err(AuthError::AccountLocked);
        }

        if user.status != AccountStatus::Active {
            return Err(AuthError::AccountInactive);
        }

        if !verify_password(&user.password_hash, password) {
            // Single atomic update: increment and timestamp together.
            self.store.record_failed_login(user.id, now).await?;
            counter!("auth.login.failure").increment(1);
            return Err(AuthError::InvalidCredentials);
        }

        self.store.clear_failed_logins(user.id).await?;
        self.store.touch_last_activity(user.id, now).await?;

        counter!("auth.login.success").increment(1);
        debug!(user_id = %user.id, "login succeeded");

        self.session_for(&user)
    }

    /// Exchange a refresh token for a fresh access/refresh pair.
    ///
    /// The old refresh token is not revoked; expiry is the only termination
    /// mechanism for stateless tokens.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, AuthError> {
        let subject = self.codec.verify_refresh(refresh_token)?;

        let user = self
            .store
            .find_by_id(subject)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if user.status != AccountStatus::Active {
            return Err(AuthError::AccountInactive);
        }

        counter!("auth.token.refreshed").increment(1);
        self.tokens_for(&user)
    }

    /// Change a password, verifying the current one first.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_password(&user.password_hash, current_password) {
            return Err(AuthError::InvalidCredentials);
        }

        self.check_password_strength(new_password)?;
        let password_hash = hash_password(new_password)?;

        self.store
            .update_password_hash(user_id, &password_hash)
            .await?;
        self.store.touch_last_activity(user_id, Utc::now()).await?;

        debug!(user_id = %user_id, "password changed");
        Ok(())
    }

    /// Start a password reset. Succeeds silently for unknown addresses so
    /// the endpoint cannot be used to enumerate accounts.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let email = normalize_email(email);

        let Some(user) = self.store.find_by_email(&email).await? else {
            return Ok(());
        };

        let reset_token = self.codec.issue_reset(user.id)?;

        if let Some(notifier) = &self.notifier {
            if let Err(err) = notifier
                .send_password_reset(&user.email, &user.name, &reset_token)
                .await
            {
                warn!(user_id = %user.id, error = %err, "failed to send password reset email");
            }
        }

        Ok(())
    }

    /// Complete a password reset with a token from `request_password_reset`.
    ///
    /// A successful credential change also clears any lockout state.
    pub async fn reset_password(
        &self,
        reset_token: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let subject = self.codec.verify_reset(reset_token)?;

        self.check_password_strength(new_password)?;

        let user = self
            .store
            .find_by_id(subject)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        let password_hash = hash_password(new_password)?;
        self.store
            .update_password_hash(user.id, &password_hash)
            .await?;
        self.store.clear_failed_logins(user.id).await?;
        self.store.touch_last_activity(user.id, Utc::now()).await?;

        debug!(user_id = %user.id, "password reset completed");
        Ok(())
    }

    /// Mark an account inactive.
    ///
    /// Outstanding access tokens stay valid until expiry; `refresh` re-checks
    /// status, so exposure is bounded by the access TTL.
    pub async fn deactivate_account(&self, user_id: Uuid) -> Result<(), AuthError> {
        self.store
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.store
            .update_status(user_id, AccountStatus::Inactive)
            .await?;
        self.store.touch_last_activity(user_id, Utc::now()).await?;

        debug!(user_id = %user_id, "account deactivated");
        Ok(())
    }

    /// Verify an access token and return its claims, for request middleware.
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, AuthError> {
        self.codec.verify_access(token)
    }

    /// Look up a user's public projection.
    pub async fn get_user(&self, user_id: Uuid) -> Result<PublicUser, AuthError> {
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        Ok(user.public())
    }

    fn check_password_strength(&self, password: &str) -> Result<(), AuthError> {
        if !validate_password_strength(password, &self.password_requirements) {
            return Err(AuthError::WeakPassword);
        }
        Ok(())
    }

    fn tokens_for(&self, user: &UserRecord) -> Result<AuthTokens, AuthError> {
        Ok(AuthTokens {
            access_token: self.codec.issue_access(user)?,
            refresh_token: self.codec.issue_refresh(user.id)?,
        })
    }

    fn session_for(&self, user: &UserRecord) -> Result<AuthSession, AuthError> {
        let tokens = self.tokens_for(user)?;
        Ok(AuthSession {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            user: user.public(),
        })
    }
}

/// Emails are unique case-insensitively; every lookup and write goes through
/// this normalization.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
