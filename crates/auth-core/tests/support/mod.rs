//! In-memory test doubles for the injected collaborators.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use triplog_auth::{
    AccountSeeder, AccountStatus, AuthService, LockoutPolicy, NewUser, Notifier,
    PasswordRequirements, TokenCodec, UserRecord, UserRecordStore,
};

/// In-memory user store. Each mutation happens under a single write-lock
/// acquisition, which is what makes the failure-counter updates atomic.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn get(&self, id: Uuid) -> Option<UserRecord> {
        self.users.read().await.get(&id).cloned()
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Force a failure state, for lockout-window scenarios.
    pub async fn set_failures(&self, id: Uuid, count: u32, last: Option<DateTime<Utc>>) {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).expect("unknown user in test");
        user.failed_login_count = count;
        user.last_failed_login_at = last;
    }
}

#[async_trait]
impl UserRecordStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRecord>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create(&self, user: NewUser) -> anyhow::Result<UserRecord> {
        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            status: user.status,
            failed_login_count: 0,
            last_failed_login_at: None,
            last_activity_at: now,
            created_at: now,
        };
        self.users.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> anyhow::Result<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| anyhow::anyhow!("no such user"))?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn update_status(&self, id: Uuid, status: AccountStatus) -> anyhow::Result<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| anyhow::anyhow!("no such user"))?;
        user.status = status;
        Ok(())
    }

    async fn record_failed_login(&self, id: Uuid, at: DateTime<Utc>) -> anyhow::Result<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| anyhow::anyhow!("no such user"))?;
        user.failed_login_count += 1;
        user.last_failed_login_at = Some(at);
        Ok(())
    }

    async fn clear_failed_logins(&self, id: Uuid) -> anyhow::Result<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| anyhow::anyhow!("no such user"))?;
        user.failed_login_count = 0;
        user.last_failed_login_at = None;
        Ok(())
    }

    async fn touch_last_activity(&self, id: Uuid, at: DateTime<Utc>) -> anyhow::Result<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| anyhow::anyhow!("no such user"))?;
        user.last_activity_at = at;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PasswordResetMail {
    pub email: String,
    pub name: String,
    pub token: String,
}

/// Notifier that records every delivery.
#[derive(Default)]
pub struct RecordingNotifier {
    pub welcomes: Mutex<Vec<(String, String)>>,
    pub resets: Mutex<Vec<PasswordResetMail>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_welcome(&self, email: &str, name: &str) -> anyhow::Result<()> {
        self.welcomes
            .lock()
            .await
            .push((email.to_string(), name.to_string()));
        Ok(())
    }

    async fn send_password_reset(
        &self,
        email: &str,
        name: &str,
        reset_token: &str,
    ) -> anyhow::Result<()> {
        self.resets.lock().await.push(PasswordResetMail {
            email: email.to_string(),
            name: name.to_string(),
            token: reset_token.to_string(),
        });
        Ok(())
    }
}

/// Notifier that always fails, to prove failures are swallowed.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send_welcome(&self, _email: &str, _name: &str) -> anyhow::Result<()> {
        anyhow::bail!("smtp relay is down")
    }

    async fn send_password_reset(
        &self,
        _email: &str,
        _name: &str,
        _reset_token: &str,
    ) -> anyhow::Result<()> {
        anyhow::bail!("smtp relay is down")
    }
}

/// Seeder that records the accounts it provisioned.
#[derive(Default)]
pub struct RecordingSeeder {
    pub seeded: Mutex<Vec<Uuid>>,
}

#[async_trait]
impl AccountSeeder for RecordingSeeder {
    async fn seed_defaults(&self, user_id: Uuid) -> anyhow::Result<()> {
        self.seeded.lock().await.push(user_id);
        Ok(())
    }
}

/// Seeder that always fails.
pub struct FailingSeeder;

#[async_trait]
impl AccountSeeder for FailingSeeder {
    async fn seed_defaults(&self, _user_id: Uuid) -> anyhow::Result<()> {
        anyhow::bail!("default platform data unavailable")
    }
}

pub fn test_codec() -> TokenCodec {
    TokenCodec::new(
        "integration-access-secret",
        "integration-refresh-secret",
        Duration::days(7),
        Duration::days(30),
        Duration::hours(1),
    )
    .unwrap()
}

/// Codec whose access tokens are already expired when issued.
pub fn expired_access_codec() -> TokenCodec {
    TokenCodec::new(
        "integration-access-secret",
        "integration-refresh-secret",
        Duration::hours(-1),
        Duration::days(30),
        Duration::hours(1),
    )
    .unwrap()
}

pub fn service(store: Arc<InMemoryUserStore>) -> AuthService {
    AuthService::new(
        store,
        test_codec(),
        LockoutPolicy::default(),
        PasswordRequirements::default(),
    )
}
