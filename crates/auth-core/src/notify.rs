// ============================
// crates/auth-core/src/notify.rs
// ============================
//! Outbound side-effect collaborators.
//!
//! Both traits are optional, constructor-injected dependencies of the
//! service. Their failures are logged and swallowed; they never fail the
//! operation they ride on.
use async_trait::async_trait;
use uuid::Uuid;

/// Email delivery, implemented outside this crate.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_welcome(&self, email: &str, name: &str) -> anyhow::Result<()>;

    /// Deliver a password reset token to the account's address.
    async fn send_password_reset(
        &self,
        email: &str,
        name: &str,
        reset_token: &str,
    ) -> anyhow::Result<()>;
}

/// Seeds a freshly registered account with default platform entries
/// (vehicles, expense categories and the like live outside this core).
#[async_trait]
pub trait AccountSeeder: Send + Sync {
    async fn seed_defaults(&self, user_id: Uuid) -> anyhow::Result<()>;
}
