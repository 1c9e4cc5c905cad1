// ============================
// crates/auth-core/src/store.rs
// ============================
//! User records and the storage interface consumed by the auth core.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Guest,
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
}

/// The stored user record.
///
/// `failed_login_count` and `last_failed_login_at` must always change
/// together; the store operations below make that the storage layer's
/// responsibility, not the caller's.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    /// Unique, stored lowercase.
    pub email: String,
    /// Never logged, never returned to callers.
    pub password_hash: String,
    pub role: Role,
    pub status: AccountStatus,
    pub failed_login_count: u32,
    pub last_failed_login_at: Option<DateTime<Utc>>,
    pub last_activity_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Projection safe to hand to callers.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            status: self.status,
            role: self.role,
        }
    }
}

/// Public view of a user: everything except credentials and counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub status: AccountStatus,
    pub role: Role,
}

/// Fields for creating a user record. The store assigns the id and stamps
/// `created_at` / `last_activity_at`; counters start zeroed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    /// Already normalized to lowercase by the caller.
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub status: AccountStatus,
}

/// Storage interface for user records. Implemented outside this crate.
///
/// Email arguments are expected pre-normalized (lowercase, trimmed); the
/// service normalizes before every lookup or write.
#[async_trait]
pub trait UserRecordStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRecord>>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRecord>>;

    async fn create(&self, user: NewUser) -> anyhow::Result<UserRecord>;

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> anyhow::Result<()>;

    async fn update_status(&self, id: Uuid, status: AccountStatus) -> anyhow::Result<()>;

    /// Record one failed login: increment the counter and set the timestamp
    /// as a single atomic update. Two concurrent failures must both count.
    async fn record_failed_login(&self, id: Uuid, at: DateTime<Utc>) -> anyhow::Result<()>;

    /// Clear the failure counter and timestamp together.
    async fn clear_failed_logins(&self, id: Uuid) -> anyhow::Result<()>;

    async fn touch_last_activity(&self, id: Uuid, at: DateTime<Utc>) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"guest\"").unwrap(),
            Role::Guest
        );
    }

    #[test]
    fn test_public_projection_omits_hash() {
        let user = UserRecord {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: "$2b$12$secret".to_string(),
            role: Role::User,
            status: AccountStatus::Active,
            failed_login_count: 0,
            last_failed_login_at: None,
            last_activity_at: Utc::now(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&user.public()).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("password"));
        assert!(json.contains("ana@example.com"));
    }
}
